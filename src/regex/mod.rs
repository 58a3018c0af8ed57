//! Byte-oriented pattern engine.
//!
//! A pattern is validated, compiled into a token tree held in a region, and
//! matched against a whole input:
//!
//! | Syntax  | Meaning                                          |
//! |---------|--------------------------------------------------|
//! | `x`     | The byte `x`                                     |
//! | `\x`    | The byte `x`, even if it is a metacharacter      |
//! | `.`     | Any byte                                         |
//! | `a-z`   | Any byte in the inclusive range (letters/digits) |
//! | `(...)` | Group, all parts in order                        |
//! | `[...]` | Class, the first member that matches             |
//! | `x\|y`  | Either branch, the first that matches            |
//! | `*`     | Zero or more                                     |
//! | `+`     | One or more                                      |
//! | `?`     | Zero or one                                      |
//!
//! Quantifiers are greedy with a lookahead: before consuming more, a
//! repetition checks whether the rest of its branch already reaches the end
//! of the input and stops there if so. There is no general backtracking.

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod validate;

pub use ast::{Quantifier, Regex, Token, TokenId, TokenKind};
pub use error::Error;
pub use matcher::{Matcher, match_full};
pub use parser::{Compiler, DEFAULT_CAPACITY, compile};
pub use validate::{Context, MAX_NESTING, validate, validate_in};
