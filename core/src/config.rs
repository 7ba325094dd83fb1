//! ATN configuration.
//!
//! An ATN's grammar kind and maximum token type are fixed when it is
//! created. [`AtnConfig`] carries both so the values can be assembled in
//! const contexts and passed around before the ATN itself exists.
//!
//! # Example
//!
//! ```
//! use atnkit_core::config::{AtnConfig, GrammarType};
//!
//! let config = AtnConfig::new()
//!     .with_grammar_type(GrammarType::Lexer)
//!     .with_max_token_type(42);
//!
//! assert_eq!(config.grammar_type, GrammarType::Lexer);
//! assert_eq!(config.max_token_type, 42);
//! ```

use crate::token::TokenType;

/// Which kind of recognizer an ATN was generated for.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GrammarType {
    /// Lexer ATN: carries mode start states, rule token types and actions.
    Lexer,
    /// Parser ATN.
    #[default]
    Parser,
}

/// Construction parameters for an [`Atn`](crate::Atn).
///
/// # Default Values
///
/// | Setting | Default |
/// |---------|---------|
/// | `grammar_type` | [`GrammarType::Parser`] |
/// | `max_token_type` | `0` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtnConfig {
    /// The kind of recognizer the ATN drives.
    pub grammar_type: GrammarType,

    /// The maximum value for any symbol recognized by a transition.
    ///
    /// Wildcard and not-set transitions expand to sets bounded by this value.
    pub max_token_type: TokenType,
}

impl Default for AtnConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl AtnConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        grammar_type: GrammarType::Parser,
        max_token_type: 0,
    };

    /// Creates a new configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the grammar type.
    #[inline]
    pub const fn with_grammar_type(mut self, grammar_type: GrammarType) -> Self {
        self.grammar_type = grammar_type;
        self
    }

    /// Sets the maximum token type.
    #[inline]
    pub const fn with_max_token_type(mut self, max_token_type: TokenType) -> Self {
        self.max_token_type = max_token_type;
        self
    }

    /// Returns `true` for lexer ATNs.
    #[inline]
    pub const fn is_lexer(&self) -> bool {
        matches!(self.grammar_type, GrammarType::Lexer)
    }
}
