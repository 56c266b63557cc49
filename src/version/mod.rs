//! Version handling for documentation directories
//!
//! Version directory names are parsed as PEP 440 versions. Two
//! representations travel together:
//!
//! - the *literal* directory name, which is what gets served and linked
//! - the *parsed* version, which is what gets ordered and compared
//!
//! ```text
//!  "2.0.0-beta"  ──parse──▶  Version(2.0.0b0)  ──public──▶  "2.0.0b0"
//!   (literal)                  (ordering)                   (exact match)
//! ```

pub mod parser;

pub use parser::{DocVersion, parse_version, public_form};
