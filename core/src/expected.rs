//! Next-token and expected-token queries.
//!
//! [`Atn::next_tokens_no_context`] is the workhorse: the rule-local
//! lookahead of a state, computed once and cached on the state.
//! [`Atn::get_expected_tokens`] builds the full follow set for a parse
//! position by reusing that cache once per frame of the caller's invocation
//! stack, rather than running one closure over the whole stack.
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/expected_tokens.mmd"))]

use std::borrow::Cow;

use crate::Error;
use crate::atn::Atn;
use crate::context::RuleContext;
use crate::interval_set::IntervalSet;
use crate::ll1::Ll1Analyzer;
use crate::state::AtnState;
use crate::token::{EOF, EPSILON};

impl Atn {
    /// Token types that can follow `state` while staying inside its rule,
    /// with [`EPSILON`] included if the rule can end first.
    ///
    /// The set is computed on first use, frozen, and cached on the state.
    /// Concurrent first calls publish exactly one value.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownState`] if `state` is not one of this ATN's states,
    /// e.g. a state never added or one borrowed from another ATN.
    pub fn next_tokens_no_context<'a>(
        &'a self,
        state: &'a AtnState,
    ) -> Result<&'a IntervalSet, Error> {
        let state_number = state.state_number();
        let owned = self
            .state(state_number)
            .filter(|s| core::ptr::eq(*s, state))
            .ok_or(Error::UnknownState { state_number })?;
        Ok(self.rule_local_tokens(owned))
    }

    /// Cached rule-local lookahead of a state known to belong to this ATN.
    fn rule_local_tokens<'a>(&'a self, state: &'a AtnState) -> &'a IntervalSet {
        state.next_token_within_rule_or_init(|| {
            self.mark_lookahead_cached();
            let set = Ll1Analyzer::new(self).look_within_rule(state);
            log::trace!(
                "cached rule-local lookahead of state {}: {}",
                state.state_number(),
                set
            );
            set
        })
    }

    /// Token types that can follow `state` given the invocation context
    /// `ctx`, continuing past the end of the rule into its callers.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidContext`] if a frame of `ctx` does not name a rule
    /// invocation in this ATN.
    pub fn next_tokens_in_context(
        &self,
        state: &AtnState,
        ctx: &RuleContext,
    ) -> Result<IntervalSet, Error> {
        Ll1Analyzer::new(self).look(state, None, Some(ctx))
    }

    /// Dispatches to [`next_tokens_no_context`](Self::next_tokens_no_context)
    /// when `ctx` is `None` and to
    /// [`next_tokens_in_context`](Self::next_tokens_in_context) otherwise.
    ///
    /// # Errors
    ///
    /// The errors of whichever query runs.
    pub fn next_tokens<'a>(
        &'a self,
        state: &'a AtnState,
        ctx: Option<&RuleContext>,
    ) -> Result<Cow<'a, IntervalSet>, Error> {
        match ctx {
            None => self.next_tokens_no_context(state).map(Cow::Borrowed),
            Some(ctx) => self.next_tokens_in_context(state, ctx).map(Cow::Owned),
        }
    }

    /// Token types that may legally appear next at state `state_number`
    /// when the parse is inside the invocation chain `ctx`.
    ///
    /// When the rule containing the state cannot end there, its rule-local
    /// set is returned as is. Otherwise the chain is unwound one frame at a
    /// time, adding what can follow each call site, until a caller's
    /// continuation cannot be empty. [`EOF`] is added only if the walk
    /// unwinds past the outermost frame, or `ctx` is `None`, with the rule
    /// end still reachable.
    ///
    /// Predicates are not evaluated; every one is assumed to pass.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStateNumber`] if `state_number` is negative, not
    ///   below [`num_states`](Self::num_states), or names a removed state.
    /// - [`Error::InvalidContext`] if a frame's invoking state is not a rule
    ///   invocation in this ATN.
    pub fn get_expected_tokens(
        &self,
        state_number: i32,
        ctx: Option<&RuleContext>,
    ) -> Result<IntervalSet, Error> {
        let state = usize::try_from(state_number)
            .ok()
            .and_then(|n| self.state(n))
            .ok_or(Error::InvalidStateNumber {
                state_number,
                num_states: self.num_states(),
            })?;

        let mut following = self.rule_local_tokens(state);
        if !following.contains(EPSILON) {
            return Ok(following.clone());
        }

        let mut expected = IntervalSet::copy_of(following);
        expected.remove_one(EPSILON)?;

        let mut frame = ctx;
        while let Some(current) = frame {
            let Some(invoking_state) = current.invoking_state() else {
                break;
            };
            if !following.contains(EPSILON) {
                break;
            }

            let follow_state = self.follow_state_of(invoking_state)?;
            following = self.rule_local_tokens(follow_state);
            log::trace!(
                "frame invoked at {} resumes at {}: {}",
                invoking_state,
                follow_state.state_number(),
                following
            );
            expected.add_set(following)?;
            expected.remove_one(EPSILON)?;
            frame = current.parent();
        }

        if following.contains(EPSILON) {
            expected.add_one(EOF)?;
        }
        Ok(expected)
    }

    /// The state a caller resumes at after the rule invoked from
    /// `invoking_state` returns.
    pub(crate) fn follow_state_of(&self, invoking_state: usize) -> Result<&AtnState, Error> {
        self.state(invoking_state)
            .and_then(|s| s.transition(0))
            .and_then(|t| t.follow_state())
            .and_then(|follow| self.state(follow))
            .ok_or(Error::InvalidContext { invoking_state })
    }
}
