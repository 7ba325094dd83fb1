//! Lexer action table entries.
//!
//! Lexer ATNs carry a list of actions referenced by index from action
//! transitions. Executing them belongs to the lexer; the ATN only stores
//! them.

use crate::token::TokenType;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerAction {
    /// `-> channel(n)`
    Channel(i32),
    /// Embedded action code of a rule.
    Custom { rule_index: usize, action_index: usize },
    /// `-> mode(n)`
    Mode(usize),
    /// `-> more`
    More,
    /// `-> popMode`
    PopMode,
    /// `-> pushMode(n)`
    PushMode(usize),
    /// `-> skip`
    Skip,
    /// `-> type(n)`
    Type(TokenType),
}

impl LexerAction {
    /// Whether the action depends on the input position at which it runs.
    #[inline]
    pub fn is_position_dependent(&self) -> bool {
        matches!(self, LexerAction::Custom { .. })
    }
}
