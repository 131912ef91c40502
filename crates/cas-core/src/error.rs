//! Configuration error types.
//!
//! Configuration errors are fatal at startup: a [`ConfigError`] means the
//! handshake must not become operational.

use thiserror::Error;

/// Errors raised while building or loading a [`crate::CasConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The CAS server URL was not provided.
    #[error("server URL must be provided")]
    MissingServer,

    /// The login path was empty.
    #[error("login path must be provided")]
    MissingLoginPath,

    /// The logout path was empty.
    #[error("logout path must be provided")]
    MissingLogoutPath,

    /// No service validate path was configured and none could be defaulted.
    #[error("service validate path must be provided")]
    MissingValidatePath,

    /// The state secret was empty.
    #[error("state secret must be provided")]
    MissingStateSecret,

    /// Both `renew` and `gateway` were set.
    #[error("the gateway parameter is not compatible with the renew parameter")]
    RenewGatewayConflict,

    /// The protocol version tag was not one of `1.0`, `2.0`, `3.0`.
    #[error("unsupported CAS protocol version: {0}")]
    UnsupportedProtocolVersion(String),

    /// A required environment variable was not set.
    #[error("environment variable {0} is required")]
    MissingEnv(&'static str),

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for environment variable {name}: {value}")]
    InvalidEnv {
        /// The variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}
