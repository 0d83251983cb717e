//! Command handlers
//!
//! One module per subcommand, each exposing an `execute_*` entry point plus
//! the pure helpers it is built from.

pub mod candidates;
pub mod check_syntax;
pub mod config;
pub mod verify;

pub use candidates::{element_candidates, execute_candidates, CandidateRow, ElementCandidates};
pub use check_syntax::execute_check_syntax;
pub use config::{execute_config, load_resolver_config};
pub use verify::{execute_verify, VerifyOutput};
