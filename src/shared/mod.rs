/// Shared kernel - error taxonomy, result alias and file helpers
pub mod error;
pub mod result;
pub mod security;

pub use error::{ExitCode, TreeError};
pub use result::Result;
