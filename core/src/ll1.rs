//! LL(1) lookahead over the ATN.
//!
//! [`Ll1Analyzer::look`] computes the epsilon closure of a state and
//! collects the token types labelling the transitions it reaches. Rule
//! transitions are entered and rule stop states pop back to the return
//! point recorded when the rule was entered. When a rule stop is reached
//! with no return point left:
//!
//! - without an invocation context the walk stays inside the starting rule
//!   and records [`EPSILON`];
//! - with a context that has been fully unwound it records [`EOF`], except
//!   in [`Ll1Analyzer::decision_lookahead`], which records nothing.

use std::collections::HashSet;
use std::sync::Arc;

use bit_set::BitSet;

use crate::Error;
use crate::atn::Atn;
use crate::context::RuleContext;
use crate::interval_set::{Interval, IntervalSet};
use crate::state::AtnState;
use crate::token::{EOF, EPSILON, MIN_USER_TOKEN_TYPE};
use crate::transition::TransitionKind;

/// Return points accumulated while walking the ATN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LookContext {
    /// No context: stop at the end of the current rule.
    Local,
    /// The outermost rule: its end is the end of input.
    Empty,
    /// Resume at `state` when the current rule returns.
    Return {
        state: usize,
        parent: Arc<LookContext>,
    },
}

impl LookContext {
    /// Translates an invocation chain into return points, innermost first.
    fn from_rule_context(atn: &Atn, ctx: &RuleContext) -> Result<Self, Error> {
        let follows = ctx
            .frames()
            .map_while(RuleContext::invoking_state)
            .map(|invoking| atn.follow_state_of(invoking).map(AtnState::state_number))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(follows
            .into_iter()
            .rev()
            .fold(LookContext::Empty, |parent, state| LookContext::Return {
                state,
                parent: Arc::new(parent),
            }))
    }
}

/// Computes LL(1) lookahead sets for an [`Atn`].
#[derive(Debug, Clone, Copy)]
pub struct Ll1Analyzer<'a> {
    atn: &'a Atn,
}

impl<'a> Ll1Analyzer<'a> {
    pub fn new(atn: &'a Atn) -> Self {
        Self { atn }
    }

    /// Token types that can follow `state`.
    ///
    /// The walk stops at `stop_state` when given, as if it were the end of
    /// the rule. Predicates are assumed to pass.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidContext`] if a frame of `ctx` does not name a rule
    /// invocation in this ATN.
    pub fn look(
        &self,
        state: &AtnState,
        stop_state: Option<usize>,
        ctx: Option<&RuleContext>,
    ) -> Result<IntervalSet, Error> {
        let look_ctx = match ctx {
            Some(ctx) => LookContext::from_rule_context(self.atn, ctx)?,
            None => LookContext::Local,
        };
        let mut walk = Walk::new(self.atn, stop_state, true);
        walk.visit(state.state_number(), look_ctx);
        Ok(walk.set)
    }

    /// Token types reachable from `state` without leaving its rule.
    /// [`EPSILON`] is included if the end of the rule is reachable.
    pub fn look_within_rule(&self, state: &AtnState) -> IntervalSet {
        let mut walk = Walk::new(self.atn, None, true);
        walk.visit(state.state_number(), LookContext::Local);
        walk.set
    }

    /// LL(1) lookahead of each alternative of a decision state.
    ///
    /// Reaching the end of the rule contributes nothing: neither
    /// [`EPSILON`] nor [`EOF`] appears in these sets. An alternative's entry
    /// is `None` when its set is empty or when a semantic predicate was
    /// reached, since the set alone cannot decide that alternative.
    pub fn decision_lookahead(&self, state: &AtnState) -> Vec<Option<IntervalSet>> {
        state
            .transitions()
            .iter()
            .map(|t| {
                let mut walk = Walk::new(self.atn, None, false);
                walk.see_thru_preds = false;
                walk.visit(t.target(), LookContext::Empty);
                if walk.set.is_empty() || walk.hit_pred {
                    None
                } else {
                    Some(walk.set)
                }
            })
            .collect()
    }
}

struct Walk<'a> {
    atn: &'a Atn,
    stop_state: Option<usize>,
    add_eof: bool,
    see_thru_preds: bool,
    hit_pred: bool,
    set: IntervalSet,
    busy: HashSet<(usize, LookContext)>,
    called_rules: BitSet,
}

impl<'a> Walk<'a> {
    fn new(atn: &'a Atn, stop_state: Option<usize>, add_eof: bool) -> Self {
        Self {
            atn,
            stop_state,
            add_eof,
            see_thru_preds: true,
            hit_pred: false,
            set: IntervalSet::new(),
            busy: HashSet::new(),
            called_rules: BitSet::new(),
        }
    }

    fn visit(&mut self, state_number: usize, ctx: LookContext) {
        if !self.busy.insert((state_number, ctx.clone())) {
            return;
        }
        let atn = self.atn;
        let Some(state) = atn.state(state_number) else {
            return;
        };

        if self.stop_state == Some(state_number) || state.is_rule_stop() {
            match ctx {
                LookContext::Local => {
                    self.set.insert(Interval::new(EPSILON, EPSILON));
                    return;
                }
                LookContext::Empty if self.add_eof => {
                    self.set.insert(Interval::new(EOF, EOF));
                    return;
                }
                _ => {}
            }
        }

        if state.is_rule_stop() {
            if let LookContext::Return { state: resume, parent } = &ctx {
                let rule = state.rule_index();
                let was_called = self.called_rules.remove(rule);
                self.visit(*resume, LookContext::clone(parent));
                if was_called {
                    self.called_rules.insert(rule);
                }
                return;
            }
        }

        for transition in state.transitions() {
            match transition.kind() {
                TransitionKind::Rule { follow_state, .. } => {
                    let Some(callee) = atn.state(transition.target()) else {
                        continue;
                    };
                    let rule = callee.rule_index();
                    if self.called_rules.contains(rule) {
                        continue;
                    }
                    let callee_ctx = LookContext::Return {
                        state: *follow_state,
                        parent: Arc::new(ctx.clone()),
                    };
                    self.called_rules.insert(rule);
                    self.visit(transition.target(), callee_ctx);
                    self.called_rules.remove(rule);
                }
                TransitionKind::Predicate { .. } | TransitionKind::PrecedencePredicate { .. } => {
                    if self.see_thru_preds {
                        self.visit(transition.target(), ctx.clone());
                    } else {
                        self.hit_pred = true;
                    }
                }
                _ if transition.is_epsilon() => {
                    self.visit(transition.target(), ctx.clone());
                }
                TransitionKind::Wildcard => {
                    self.set
                        .insert(Interval::new(MIN_USER_TOKEN_TYPE, atn.max_token_type()));
                }
                TransitionKind::NotSet(excluded) => {
                    let allowed = excluded.complement(MIN_USER_TOKEN_TYPE, atn.max_token_type());
                    self.set.insert_set(&allowed);
                }
                _ => {
                    if let Some(label) = transition.label() {
                        self.set.insert_set(&label);
                    }
                }
            }
        }
    }
}
