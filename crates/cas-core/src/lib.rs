//! # cas-core
//!
//! Configuration, protocol defaults, and shared error types for the CAS
//! (Central Authentication Service) client.
//!
//! This crate provides the foundational types used by the protocol crate:
//!
//! - [`config`] - Immutable handshake configuration with builder and
//!   environment loading
//! - [`defaults`] - CAS protocol constants (paths, scheme, issuer)
//! - [`error`] - Configuration error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod defaults;
pub mod error;

pub use config::{CasConfig, CasConfigBuilder, ProtocolVersion};
pub use error::ConfigError;
