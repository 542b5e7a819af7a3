//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
///
/// `rustpix-tpx` and `rustpix-core` have no fallible operations of their
/// own (see each crate's `lib.rs`), so this enum carries only what
/// `rustpix-io` itself can actually raise: I/O failure and invalid
/// configuration at pipeline construction. A stream ending inside a batch
/// is not an error here either — it surfaces as `Diagnostics::truncated`.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An unknown `peak_fitter` string or other structurally invalid
    /// configuration value; fatal at pipeline construction.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
