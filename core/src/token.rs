//! Reserved token types.
//!
//! Token types are plain `i32` values. Two values are reserved and take part
//! in the same interval algebra as user token types:
//!
//! - [`EPSILON`]: the enclosing rule may end here without consuming input.
//! - [`EOF`]: end of input is valid here.

/// A token type as recognized by transitions in an ATN.
pub type TokenType = i32;

/// End of input.
pub const EOF: TokenType = -1;

/// The rule containing the queried state can end without consuming input.
pub const EPSILON: TokenType = 0;

/// Smallest token type a grammar may assign to a user token.
pub const MIN_USER_TOKEN_TYPE: TokenType = 1;
