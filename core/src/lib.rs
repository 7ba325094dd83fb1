//! Runtime core of an ATN-driven parser.
//!
//! - [`Atn`]: the grammar's state/transition graph, owned as an arena of
//!   states addressed by state number, plus the decision and rule registries.
//! - [`IntervalSet`]: compact sets of token types.
//! - [`RuleContext`]: the invocation stack active when a query is issued.
//! - [`Atn::get_expected_tokens`]: the set of token types that may legally
//!   appear next at a parse position, for error messages and lookahead.
//!
//! # Example
//!
//! ```
//! use atnkit_core::{Atn, AtnState, GrammarType, IntervalSet, RuleContext, Transition, EOF};
//!
//! // s : r 'C' ;   r : 'A'? ;
//! const A: i32 = 1;
//! const C: i32 = 2;
//!
//! let mut atn = Atn::new(GrammarType::Parser, 2);
//! let s_start = atn.add_state(AtnState::rule_start(0));
//! let call = atn.add_state(AtnState::basic(0));
//! let after = atn.add_state(AtnState::basic(0));
//! let s_stop = atn.add_state(AtnState::rule_stop(0));
//! let r_start = atn.add_state(AtnState::rule_start(1));
//! let r_end = atn.add_state(AtnState::basic(1));
//! let r_stop = atn.add_state(AtnState::rule_stop(1));
//! atn.define_rule(s_start, s_stop)?;
//! atn.define_rule(r_start, r_stop)?;
//!
//! atn.add_transition(s_start, Transition::epsilon(call))?;
//! atn.add_transition(call, Transition::rule(r_start, 1, after, 0))?;
//! atn.add_transition(after, Transition::atom(s_stop, C))?;
//! atn.add_transition(r_start, Transition::atom(r_end, A))?;
//! atn.add_transition(r_start, Transition::epsilon(r_end))?;
//! atn.add_transition(r_end, Transition::epsilon(r_stop))?;
//!
//! // Inside `r`, called from `s`: either 'A' or whatever follows the call.
//! let ctx = RuleContext::root().push(call);
//! let expected = atn.get_expected_tokens(r_start as i32, Some(&ctx))?;
//! assert_eq!(expected, IntervalSet::from_iter([A, C]));
//!
//! // Without a caller, the end of `r` is the end of input.
//! let expected = atn.get_expected_tokens(r_end as i32, None)?;
//! assert_eq!(expected, IntervalSet::of(EOF));
//! # Ok::<(), atnkit_core::Error>(())
//! ```

mod atn;
pub mod config;
mod context;
mod error;
mod expected;
mod interval_set;
mod lexer_action;
mod ll1;
mod state;
pub mod token;
mod transition;

pub use atn::Atn;
pub use config::{AtnConfig, GrammarType};
pub use context::{Frames, RuleContext};
pub use error::Error;
pub use interval_set::{Interval, IntervalSet};
pub use lexer_action::LexerAction;
pub use ll1::Ll1Analyzer;
pub use state::{AtnState, DecisionKind, DecisionState, INVALID_STATE_NUMBER, StateKind};
pub use token::{EOF, EPSILON, MIN_USER_TOKEN_TYPE, TokenType};
pub use transition::{Transition, TransitionKind};
