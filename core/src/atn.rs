//! The ATN container.
//!
//! [`Atn`] owns every state in an arena indexed by state number. Removing a
//! state leaves a hole in its slot instead of shifting later states, so
//! numbers handed out by [`Atn::add_state`] stay valid for the life of the
//! ATN.
//!
//! Construction goes through `&mut self`; lookahead queries go through
//! `&self` and may run concurrently from many threads once construction is
//! finished. Queries cache rule-local lookahead on each state, and any
//! structural change made after a query clears every cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Error;
use crate::config::{AtnConfig, GrammarType};
use crate::lexer_action::LexerAction;
use crate::state::{AtnState, DecisionKind, StateKind};
use crate::token::TokenType;
use crate::transition::Transition;

/// An augmented transition network.
#[derive(Debug)]
pub struct Atn {
    config: AtnConfig,
    states: Vec<Option<AtnState>>,
    decision_to_state: Vec<usize>,
    rule_to_start_state: Vec<usize>,
    rule_to_stop_state: Vec<usize>,
    mode_name_to_start_state: HashMap<String, usize>,
    mode_to_start_state: Vec<usize>,
    rule_to_token_type: Vec<Option<TokenType>>,
    lexer_actions: Vec<LexerAction>,
    /// Set once any state has cached its rule-local lookahead.
    lookahead_cached: AtomicBool,
}

impl Clone for Atn {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            states: self.states.clone(),
            decision_to_state: self.decision_to_state.clone(),
            rule_to_start_state: self.rule_to_start_state.clone(),
            rule_to_stop_state: self.rule_to_stop_state.clone(),
            mode_name_to_start_state: self.mode_name_to_start_state.clone(),
            mode_to_start_state: self.mode_to_start_state.clone(),
            rule_to_token_type: self.rule_to_token_type.clone(),
            lexer_actions: self.lexer_actions.clone(),
            lookahead_cached: AtomicBool::new(self.lookahead_cached.load(Ordering::Relaxed)),
        }
    }
}

impl Atn {
    /// Creates an empty ATN for a grammar of the given kind.
    pub fn new(grammar_type: GrammarType, max_token_type: TokenType) -> Self {
        Self::with_config(
            AtnConfig::new()
                .with_grammar_type(grammar_type)
                .with_max_token_type(max_token_type),
        )
    }

    pub fn with_config(config: AtnConfig) -> Self {
        Self {
            config,
            states: Vec::new(),
            decision_to_state: Vec::new(),
            rule_to_start_state: Vec::new(),
            rule_to_stop_state: Vec::new(),
            mode_name_to_start_state: HashMap::new(),
            mode_to_start_state: Vec::new(),
            rule_to_token_type: Vec::new(),
            lexer_actions: Vec::new(),
            lookahead_cached: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn config(&self) -> &AtnConfig {
        &self.config
    }

    #[inline]
    pub fn grammar_type(&self) -> GrammarType {
        self.config.grammar_type
    }

    #[inline]
    pub fn max_token_type(&self) -> TokenType {
        self.config.max_token_type
    }

    /// Number of state slots, removed ones included. Valid state numbers are
    /// `0..num_states()`.
    #[inline]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// The state numbered `state_number`, unless it is out of range or has
    /// been removed.
    #[inline]
    pub fn state(&self, state_number: usize) -> Option<&AtnState> {
        self.states.get(state_number).and_then(Option::as_ref)
    }

    /// Mutable access to a state. Clears all cached lookahead, since the
    /// caller may change the state's transitions.
    pub fn state_mut(&mut self, state_number: usize) -> Option<&mut AtnState> {
        self.invalidate_lookahead();
        self.states.get_mut(state_number).and_then(Option::as_mut)
    }

    /// Iterates over the states still present, in state-number order.
    pub fn states(&self) -> impl Iterator<Item = &AtnState> {
        self.states.iter().flatten()
    }

    /// Appends `state`, assigning it the next state number.
    pub fn add_state(&mut self, mut state: AtnState) -> usize {
        let state_number = self.states.len();
        state.set_state_number(state_number);
        state.clear_next_token_within_rule();
        self.states.push(Some(state));
        state_number
    }

    /// Appends an empty slot so that later states keep their numbering.
    pub fn add_placeholder(&mut self) -> usize {
        self.states.push(None);
        self.states.len() - 1
    }

    /// Clears the slot at `state_number` without renumbering other states.
    pub fn remove_state(&mut self, state_number: usize) -> Option<AtnState> {
        let removed = self.states.get_mut(state_number).and_then(Option::take);
        if removed.is_some() {
            log::debug!("removed ATN state {}", state_number);
            self.invalidate_lookahead();
        }
        removed
    }

    /// Appends a transition to the state numbered `from`.
    pub fn add_transition(&mut self, from: usize, transition: Transition) -> Result<(), Error> {
        self.state_mut(from)
            .ok_or(Error::UnknownState { state_number: from })?
            .add_transition(transition);
        Ok(())
    }

    /// Registers the decision state numbered `state_number` and returns its
    /// decision number.
    pub fn define_decision_state(&mut self, state_number: usize) -> Result<usize, Error> {
        let decision = self.decision_to_state.len();
        let state = self
            .state_mut(state_number)
            .ok_or(Error::UnknownState { state_number })?;
        let StateKind::Decision(info) = state.kind_mut() else {
            return Err(Error::UnexpectedStateKind {
                state_number,
                expected: "decision state",
            });
        };
        info.decision = Some(decision);
        self.decision_to_state.push(state_number);
        log::debug!("state {} defines decision {}", state_number, decision);
        Ok(decision)
    }

    /// The state registered for `decision`.
    ///
    /// Returns `None` when the registry is empty, the decision is out of
    /// range, or the state has since been removed.
    pub fn get_decision_state(&self, decision: usize) -> Option<&AtnState> {
        self.decision_to_state
            .get(decision)
            .and_then(|&state_number| self.state(state_number))
    }

    #[inline]
    pub fn num_decisions(&self) -> usize {
        self.decision_to_state.len()
    }

    /// Registers a rule by its start and stop states and returns its rule
    /// index. The start state is linked to the stop state.
    pub fn define_rule(&mut self, start_state: usize, stop_state: usize) -> Result<usize, Error> {
        match self.state(stop_state).map(AtnState::kind) {
            Some(StateKind::RuleStop) => {}
            Some(_) => {
                return Err(Error::UnexpectedStateKind {
                    state_number: stop_state,
                    expected: "rule stop state",
                });
            }
            None => return Err(Error::UnknownState { state_number: stop_state }),
        }

        let start = self
            .state_mut(start_state)
            .ok_or(Error::UnknownState { state_number: start_state })?;
        let StateKind::RuleStart { stop_state: link, .. } = start.kind_mut() else {
            return Err(Error::UnexpectedStateKind {
                state_number: start_state,
                expected: "rule start state",
            });
        };
        *link = Some(stop_state);

        let rule_index = self.rule_to_start_state.len();
        self.rule_to_start_state.push(start_state);
        self.rule_to_stop_state.push(stop_state);
        log::debug!(
            "rule {} spans states {}..{}",
            rule_index,
            start_state,
            stop_state
        );
        Ok(rule_index)
    }

    #[inline]
    pub fn rule_start_state(&self, rule_index: usize) -> Option<&AtnState> {
        self.rule_to_start_state
            .get(rule_index)
            .and_then(|&s| self.state(s))
    }

    #[inline]
    pub fn rule_stop_state(&self, rule_index: usize) -> Option<&AtnState> {
        self.rule_to_stop_state
            .get(rule_index)
            .and_then(|&s| self.state(s))
    }

    #[inline]
    pub fn num_rules(&self) -> usize {
        self.rule_to_start_state.len()
    }

    /// Registers a lexer mode entered at `start_state` and returns its index.
    pub fn define_mode(&mut self, name: impl Into<String>, start_state: usize) -> Result<usize, Error> {
        let state = self
            .state(start_state)
            .ok_or(Error::UnknownState { state_number: start_state })?;
        if !matches!(
            state.as_decision().map(|d| d.kind),
            Some(DecisionKind::TokensStart)
        ) {
            return Err(Error::UnexpectedStateKind {
                state_number: start_state,
                expected: "tokens start state",
            });
        }

        let name = name.into();
        let mode = self.mode_to_start_state.len();
        self.mode_to_start_state.push(start_state);
        log::debug!("mode {} ({}) starts at state {}", mode, name, start_state);
        self.mode_name_to_start_state.insert(name, start_state);
        Ok(mode)
    }

    #[inline]
    pub fn mode_start_state(&self, mode: usize) -> Option<&AtnState> {
        self.mode_to_start_state
            .get(mode)
            .and_then(|&s| self.state(s))
    }

    #[inline]
    pub fn mode_start_state_by_name(&self, name: &str) -> Option<&AtnState> {
        self.mode_name_to_start_state
            .get(name)
            .and_then(|&s| self.state(s))
    }

    /// Records the token type a lexer rule emits.
    pub fn set_rule_token_type(&mut self, rule_index: usize, token_type: TokenType) {
        if self.rule_to_token_type.len() <= rule_index {
            self.rule_to_token_type.resize(rule_index + 1, None);
        }
        self.rule_to_token_type[rule_index] = Some(token_type);
    }

    #[inline]
    pub fn rule_token_type(&self, rule_index: usize) -> Option<TokenType> {
        self.rule_to_token_type.get(rule_index).copied().flatten()
    }

    /// Appends a lexer action and returns its index.
    pub fn add_lexer_action(&mut self, action: LexerAction) -> usize {
        self.lexer_actions.push(action);
        self.lexer_actions.len() - 1
    }

    #[inline]
    pub fn lexer_actions(&self) -> &[LexerAction] {
        &self.lexer_actions
    }

    pub(crate) fn mark_lookahead_cached(&self) {
        self.lookahead_cached.store(true, Ordering::Relaxed);
    }

    /// Drops every cached rule-local set. A closure may run through any
    /// state, so a change anywhere can stale every cache.
    fn invalidate_lookahead(&mut self) {
        if core::mem::take(self.lookahead_cached.get_mut()) {
            for state in self.states.iter_mut().flatten() {
                state.clear_next_token_within_rule();
            }
            log::debug!("structural change cleared cached lookahead");
        }
    }
}
