//! Output formats
//!
//! - [`tokens`]: the token file format, written and read back
//! - [`tree`]: XML rendering of a parsed compilation unit
//! - [`source`]: source rendering that reproduces the parsed tokens

pub mod source;
pub mod tokens;
pub mod tree;
