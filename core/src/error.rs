//! Structured error types for reagent
//!
//! Fatal conditions that cross the library boundary. Transport-level
//! failures are wrapped with `anyhow` context at the call site; the
//! variants here carry the cases callers may want to match on.

use thiserror::Error;

/// Primary error type for reagent operations
#[derive(Error, Debug)]
pub enum ReagentError {
    /// Provider spec used a scheme the factory does not recognize
    #[error("unknown provider scheme: {0}")]
    UnknownProviderScheme(String),

    /// Provider requires an API key and none was supplied
    #[error("missing API key for provider '{0}'")]
    MissingApiKey(String),

    /// Provider returned a non-success HTTP status
    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}
