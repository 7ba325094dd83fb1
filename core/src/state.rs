//! Nodes of the ATN graph.
//!
//! Every state, whatever its kind, carries its state number, the index of
//! the rule it belongs to, its outgoing transitions and a lazily computed
//! cache of the token types reachable from it without leaving its rule.

use std::sync::OnceLock;

use crate::interval_set::IntervalSet;
use crate::transition::Transition;

/// State number of a state that has not been added to an ATN yet.
pub const INVALID_STATE_NUMBER: usize = usize::MAX;

/// The flavor of decision a [`DecisionState`] makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    /// Start of a `( ... | ... )` block.
    BasicBlockStart,
    /// Start of the block inside a `( ... )+` loop.
    PlusBlockStart,
    /// Start of the block inside a `( ... )*` loop.
    StarBlockStart,
    /// Entry of a `( ... )*` loop: enter the block or skip it.
    StarLoopEntry,
    /// Bottom of a `( ... )+` loop: iterate again or exit.
    PlusLoopBack,
    /// Lexer mode entry: chooses among the mode's token rules.
    TokensStart,
}

/// Data carried by states that choose among several alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionState {
    pub kind: DecisionKind,
    /// Position in the owning ATN's decision registry, once defined.
    pub decision: Option<usize>,
    pub non_greedy: bool,
}

impl DecisionState {
    pub fn new(kind: DecisionKind) -> Self {
        Self {
            kind,
            decision: None,
            non_greedy: false,
        }
    }
}

/// The capabilities of an [`AtnState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKind {
    Basic,
    RuleStart {
        /// The matching rule-stop state, linked by
        /// [`Atn::define_rule`](crate::Atn::define_rule).
        stop_state: Option<usize>,
        left_recursive: bool,
    },
    RuleStop,
    BlockEnd,
    StarLoopBack,
    LoopEnd,
    Decision(DecisionState),
}

/// A node of the ATN.
#[derive(Debug, Clone)]
pub struct AtnState {
    state_number: usize,
    rule_index: usize,
    kind: StateKind,
    transitions: Vec<Transition>,
    epsilon_only_transitions: bool,
    next_token_within_rule: OnceLock<IntervalSet>,
}

impl AtnState {
    pub fn new(kind: StateKind, rule_index: usize) -> Self {
        Self {
            state_number: INVALID_STATE_NUMBER,
            rule_index,
            kind,
            transitions: Vec::new(),
            epsilon_only_transitions: false,
            next_token_within_rule: OnceLock::new(),
        }
    }

    pub fn basic(rule_index: usize) -> Self {
        Self::new(StateKind::Basic, rule_index)
    }

    pub fn rule_start(rule_index: usize) -> Self {
        Self::new(
            StateKind::RuleStart {
                stop_state: None,
                left_recursive: false,
            },
            rule_index,
        )
    }

    pub fn rule_stop(rule_index: usize) -> Self {
        Self::new(StateKind::RuleStop, rule_index)
    }

    pub fn decision(kind: DecisionKind, rule_index: usize) -> Self {
        Self::new(StateKind::Decision(DecisionState::new(kind)), rule_index)
    }

    /// Entry state of a lexer mode.
    pub fn tokens_start() -> Self {
        Self::decision(DecisionKind::TokensStart, 0)
    }

    /// Position of this state in its ATN, or [`INVALID_STATE_NUMBER`] if it
    /// has not been added to one.
    #[inline]
    pub fn state_number(&self) -> usize {
        self.state_number
    }

    #[inline]
    pub(crate) fn set_state_number(&mut self, state_number: usize) {
        self.state_number = state_number;
    }

    #[inline]
    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    #[inline]
    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn kind_mut(&mut self) -> &mut StateKind {
        &mut self.kind
    }

    #[inline]
    pub fn is_rule_stop(&self) -> bool {
        matches!(self.kind, StateKind::RuleStop)
    }

    #[inline]
    pub fn as_decision(&self) -> Option<&DecisionState> {
        match &self.kind {
            StateKind::Decision(decision) => Some(decision),
            _ => None,
        }
    }

    /// Decision number, if this is a registered decision state.
    #[inline]
    pub fn decision_number(&self) -> Option<usize> {
        self.as_decision().and_then(|d| d.decision)
    }

    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    #[inline]
    pub fn transition(&self, idx: usize) -> Option<&Transition> {
        self.transitions.get(idx)
    }

    /// True when every outgoing transition is epsilon-like. A state without
    /// transitions reports `false`.
    #[inline]
    pub fn only_has_epsilon_transitions(&self) -> bool {
        self.epsilon_only_transitions
    }

    /// Appends a transition, dropping this state's cached lookahead.
    pub fn add_transition(&mut self, transition: Transition) {
        self.next_token_within_rule.take();
        if self.transitions.is_empty() {
            self.epsilon_only_transitions = transition.is_epsilon();
        } else if self.epsilon_only_transitions != transition.is_epsilon() {
            self.epsilon_only_transitions = false;
        }
        self.transitions.push(transition);
    }

    /// Cached rule-local lookahead, if it has been computed.
    #[inline]
    pub fn next_token_within_rule(&self) -> Option<&IntervalSet> {
        self.next_token_within_rule.get()
    }

    #[inline]
    pub(crate) fn clear_next_token_within_rule(&mut self) {
        self.next_token_within_rule.take();
    }

    /// Returns the cached rule-local lookahead, computing and publishing it
    /// with `init` on first use. Concurrent first callers block until the
    /// single winner has published a fully built, frozen set.
    pub(crate) fn next_token_within_rule_or_init<F>(&self, init: F) -> &IntervalSet
    where
        F: FnOnce() -> IntervalSet,
    {
        self.next_token_within_rule.get_or_init(|| {
            let mut set = init();
            set.freeze();
            set
        })
    }
}
