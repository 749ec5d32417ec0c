//! initree-core: section-based INI reader with source tracking
//!
//! This crate parses a line-oriented INI dialect into a tree of named
//! sections of key/value pairs, recording for every value which source it
//! came from. Keys and unquoted values are case-folded to lowercase; quoted
//! values keep their case; a key with no `=` becomes a flag set to "TRUE".
//!
//! # Example
//!
//! ```rust
//! use initree_core::Options;
//!
//! let ini = r#"
//! [solver]
//! type = "PETSC" ; backend
//! restart
//! "#;
//!
//! let options = Options::from_text(ini, "run.ini").unwrap();
//! let solver = options.get_section("solver").unwrap();
//! assert_eq!(solver.get("type"), Some("PETSC"));
//! assert!(solver.get_bool("restart").unwrap());
//! assert_eq!(solver.origin("type"), Some("run.ini"));
//! ```

pub mod error;
pub mod options;
pub mod reader;

pub use error::{Error, ErrorKind, Result};
pub use options::{Entry, Options};
