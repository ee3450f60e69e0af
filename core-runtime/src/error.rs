//! Runtime errors raised while configuring the core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid settings, log filters, or a second logging initialization.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A platform capability was not injected and no default is compiled in.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
