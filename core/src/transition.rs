//! Edges of the ATN graph.
//!
//! Transitions reference their target by state number. Only a few kinds
//! matter to lookahead computation: epsilon-like kinds are followed without
//! consuming input, rule transitions push a return point, and the labelled
//! kinds contribute token types.

use crate::interval_set::IntervalSet;
use crate::token::TokenType;

/// The behavior of a [`Transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    /// Unconditional move that consumes nothing.
    Epsilon {
        /// Set on the return edge of a left-recursive rule's precedence loop.
        outermost_precedence_return: Option<usize>,
    },
    /// Matches a single token type.
    Atom(TokenType),
    /// Matches every token type in `[start, stop]`.
    Range { start: TokenType, stop: TokenType },
    /// Matches any member of the set.
    Set(IntervalSet),
    /// Matches any token type in the vocabulary that is not in the set.
    NotSet(IntervalSet),
    /// Matches any token type in the vocabulary.
    Wildcard,
    /// Invokes another rule. The transition target is the callee's start
    /// state; `follow_state` is where the caller resumes once it returns.
    Rule {
        rule_index: usize,
        follow_state: usize,
        precedence: i32,
    },
    /// Semantic predicate; lookahead treats it as passable.
    Predicate {
        rule_index: usize,
        pred_index: usize,
        is_ctx_dependent: bool,
    },
    /// Precedence predicate of a left-recursive rule.
    PrecedencePredicate { precedence: i32 },
    /// Embedded action; consumes nothing.
    Action {
        rule_index: usize,
        action_index: Option<usize>,
        is_ctx_dependent: bool,
    },
}

/// An outgoing edge of an ATN state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    target: usize,
    kind: TransitionKind,
}

impl Transition {
    #[inline]
    pub fn new(target: usize, kind: TransitionKind) -> Self {
        Self { target, kind }
    }

    pub fn epsilon(target: usize) -> Self {
        Self::new(
            target,
            TransitionKind::Epsilon {
                outermost_precedence_return: None,
            },
        )
    }

    pub fn atom(target: usize, label: TokenType) -> Self {
        Self::new(target, TransitionKind::Atom(label))
    }

    pub fn range(target: usize, start: TokenType, stop: TokenType) -> Self {
        Self::new(target, TransitionKind::Range { start, stop })
    }

    pub fn set(target: usize, set: IntervalSet) -> Self {
        Self::new(target, TransitionKind::Set(set))
    }

    pub fn not_set(target: usize, set: IntervalSet) -> Self {
        Self::new(target, TransitionKind::NotSet(set))
    }

    pub fn wildcard(target: usize) -> Self {
        Self::new(target, TransitionKind::Wildcard)
    }

    /// A call of rule `rule_index` whose start state is `rule_start`.
    pub fn rule(rule_start: usize, rule_index: usize, follow_state: usize, precedence: i32) -> Self {
        Self::new(
            rule_start,
            TransitionKind::Rule {
                rule_index,
                follow_state,
                precedence,
            },
        )
    }

    pub fn predicate(target: usize, rule_index: usize, pred_index: usize, is_ctx_dependent: bool) -> Self {
        Self::new(
            target,
            TransitionKind::Predicate {
                rule_index,
                pred_index,
                is_ctx_dependent,
            },
        )
    }

    pub fn precedence_predicate(target: usize, precedence: i32) -> Self {
        Self::new(target, TransitionKind::PrecedencePredicate { precedence })
    }

    pub fn action(target: usize, rule_index: usize, action_index: Option<usize>, is_ctx_dependent: bool) -> Self {
        Self::new(
            target,
            TransitionKind::Action {
                rule_index,
                action_index,
                is_ctx_dependent,
            },
        )
    }

    /// State number this transition leads to.
    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    #[inline]
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    /// Returns true for kinds that never consume input.
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self.kind,
            TransitionKind::Epsilon { .. }
                | TransitionKind::Rule { .. }
                | TransitionKind::Predicate { .. }
                | TransitionKind::PrecedencePredicate { .. }
                | TransitionKind::Action { .. }
        )
    }

    /// Resumption state of a rule transition.
    #[inline]
    pub fn follow_state(&self) -> Option<usize> {
        match self.kind {
            TransitionKind::Rule { follow_state, .. } => Some(follow_state),
            _ => None,
        }
    }

    /// The token types this transition is labelled with.
    ///
    /// Not-set transitions return the excluded set; callers complement it
    /// against the vocabulary.
    pub fn label(&self) -> Option<IntervalSet> {
        match &self.kind {
            TransitionKind::Atom(label) => Some(IntervalSet::of(*label)),
            TransitionKind::Range { start, stop } => Some(IntervalSet::of_range(*start, *stop)),
            TransitionKind::Set(set) | TransitionKind::NotSet(set) => Some(IntervalSet::copy_of(set)),
            _ => None,
        }
    }

    /// Whether `symbol` can be consumed along this transition, given the
    /// vocabulary `[min_vocab, max_vocab]`.
    pub fn matches(&self, symbol: TokenType, min_vocab: TokenType, max_vocab: TokenType) -> bool {
        match &self.kind {
            TransitionKind::Atom(label) => *label == symbol,
            TransitionKind::Range { start, stop } => (*start..=*stop).contains(&symbol),
            TransitionKind::Set(set) => set.contains(symbol),
            TransitionKind::NotSet(set) => {
                (min_vocab..=max_vocab).contains(&symbol) && !set.contains(symbol)
            }
            TransitionKind::Wildcard => (min_vocab..=max_vocab).contains(&symbol),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_epsilon_like_kinds() {
        assert!(Transition::epsilon(1).is_epsilon());
        assert!(Transition::rule(1, 0, 2, 0).is_epsilon());
        assert!(Transition::predicate(1, 0, 0, false).is_epsilon());
        assert!(Transition::precedence_predicate(1, 2).is_epsilon());
        assert!(Transition::action(1, 0, None, false).is_epsilon());
        assert!(!Transition::atom(1, 3).is_epsilon());
        assert!(!Transition::wildcard(1).is_epsilon());
    }

    #[test]
    fn test_follow_state_only_on_rule() {
        assert_eq!(Transition::rule(4, 1, 9, 0).follow_state(), Some(9));
        assert_eq!(Transition::epsilon(4).follow_state(), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Transition::atom(0, 3).label(), Some(IntervalSet::of(3)));
        assert_eq!(
            Transition::range(0, 3, 6).label(),
            Some(IntervalSet::of_range(3, 6))
        );
        assert_eq!(Transition::wildcard(0).label(), None);
        assert_eq!(Transition::epsilon(0).label(), None);
    }

    #[test]
    fn test_label_of_frozen_set_is_mutable() {
        let mut set = IntervalSet::of(2);
        set.freeze();
        let label = Transition::set(0, set).label();
        assert!(label.is_some_and(|l| !l.is_read_only()));
    }

    #[test_case(Transition::atom(0, 3), 3, true; "atom hit")]
    #[test_case(Transition::atom(0, 3), 4, false; "atom miss")]
    #[test_case(Transition::range(0, 2, 4), 4, true; "range upper bound")]
    #[test_case(Transition::set(0, IntervalSet::from_iter([2, 7])), 7, true; "set hit")]
    #[test_case(Transition::not_set(0, IntervalSet::of(2)), 2, false; "not set excluded")]
    #[test_case(Transition::not_set(0, IntervalSet::of(2)), 3, true; "not set included")]
    #[test_case(Transition::not_set(0, IntervalSet::of(2)), 11, false; "not set outside vocabulary")]
    #[test_case(Transition::wildcard(0), 10, true; "wildcard in vocabulary")]
    #[test_case(Transition::wildcard(0), 0, false; "wildcard below vocabulary")]
    #[test_case(Transition::epsilon(0), 1, false; "epsilon never matches")]
    fn test_matches(t: Transition, symbol: TokenType, expected: bool) {
        assert_eq!(t.matches(symbol, 1, 10), expected);
    }
}
