//! Core error types for atnkit.

use thiserror::Error;

/// Core atnkit error type.
///
/// Every variant reports a programming or integration error rather than a
/// runtime condition of the input being parsed, so none of them should be
/// retried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A state number outside the ATN's state collection, or one whose slot
    /// has been removed, was passed to a lookahead query.
    #[error("invalid state number {state_number}: ATN has {num_states} state slots")]
    InvalidStateNumber {
        /// The offending state number.
        state_number: i32,
        /// Number of state slots (including removed ones) in the ATN.
        num_states: usize,
    },

    /// An interval set was modified after it was frozen.
    ///
    /// Rule-local lookahead sets are frozen when they are cached on their
    /// state. Hitting this error means a caller tried to mutate a shared
    /// cached set; copy it with [`IntervalSet::copy_of`] first.
    ///
    /// [`IntervalSet::copy_of`]: crate::IntervalSet::copy_of
    #[error("cannot modify a frozen interval set")]
    FrozenSetMutation,

    /// A rule invocation context names an invoking state that does not exist
    /// or does not start with a rule transition.
    ///
    /// This happens when a context chain built against one ATN is used to
    /// query another.
    #[error("invalid invocation context: state {invoking_state} is not a rule invocation")]
    InvalidContext {
        /// Invoking state recorded in the offending frame.
        invoking_state: usize,
    },

    /// A construction primitive referenced a state that is not in the ATN.
    #[error("unknown state {state_number}")]
    UnknownState {
        /// The missing state number.
        state_number: usize,
    },

    /// A construction primitive was given a state of the wrong kind.
    #[error("state {state_number} is not a {expected}")]
    UnexpectedStateKind {
        /// The state that was rejected.
        state_number: usize,
        /// Human-readable name of the required kind.
        expected: &'static str,
    },
}
