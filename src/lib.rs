pub mod regex;
pub mod region;

pub use regex::{Compiler, Error, Regex, compile, match_full, validate};
