//! Handshake configuration.
//!
//! [`CasConfig`] is created once at startup, validated, and shared read-only
//! for the life of the process. Configuration can be assembled through the
//! builder or loaded from `CAS_*` environment variables.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;

/// CAS protocol version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// CAS 1.0 - plain text validation responses.
    #[serde(rename = "1.0")]
    V1,
    /// CAS 2.0 - XML validation responses.
    #[serde(rename = "2.0")]
    V2,
    /// CAS 3.0 - XML validation responses with attribute release.
    #[serde(rename = "3.0")]
    V3,
}

impl ProtocolVersion {
    /// Parses a protocol version tag (`"1.0"`, `"2.0"` or `"3.0"`).
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        match tag {
            "1.0" => Ok(Self::V1),
            "2.0" => Ok(Self::V2),
            "3.0" => Ok(Self::V3),
            other => Err(ConfigError::UnsupportedProtocolVersion(other.to_string())),
        }
    }

    /// Returns the version tag string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V2 => "2.0",
            Self::V3 => "3.0",
        }
    }

    /// Default service ticket validation path for this version.
    #[must_use]
    pub const fn default_service_validate_path(&self) -> &'static str {
        match self {
            Self::V1 => defaults::VALIDATE_PATH,
            Self::V2 => defaults::SERVICE_VALIDATE_PATH,
            Self::V3 => defaults::P3_SERVICE_VALIDATE_PATH,
        }
    }

    /// Default proxy ticket validation path for this version, if any.
    #[must_use]
    pub const fn default_proxy_validate_path(&self) -> Option<&'static str> {
        match self {
            Self::V1 => None,
            Self::V2 => Some(defaults::PROXY_VALIDATE_PATH),
            Self::V3 => Some(defaults::P3_PROXY_VALIDATE_PATH),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable CAS handshake configuration.
///
/// Built once at startup via [`CasConfig::builder`] or
/// [`CasConfig::from_env`]; safe for unsynchronized concurrent reads.
#[derive(Clone)]
pub struct CasConfig {
    /// CAS server base URL, without a trailing slash.
    pub server: String,

    /// Explicit service base URL for this application. When absent the
    /// service URL is derived from the inbound request.
    pub service: Option<String>,

    /// CAS protocol version.
    pub protocol_version: ProtocolVersion,

    /// Credential requestor / acceptor path on the CAS server.
    pub login_path: String,

    /// Logout path on the CAS server.
    pub logout_path: String,

    /// Service ticket validation path on the CAS server.
    pub service_validate_path: String,

    /// Service/proxy ticket validation path on the CAS server, if the
    /// protocol version supports proxy validation.
    pub proxy_validate_path: Option<String>,

    /// Callback path on the application side.
    pub callback_path: String,

    /// Bypass single sign-on and force credential entry.
    pub renew: bool,

    /// Never prompt for credentials; only succeed on an existing session.
    pub gateway: bool,

    /// Issuer label stamped on attribute claims.
    pub claims_issuer: String,

    /// Timeout applied to the backchannel validation call.
    pub backchannel_timeout: Duration,

    state_secret: Vec<u8>,
}

impl CasConfig {
    /// Starts building a configuration.
    #[must_use]
    pub fn builder() -> CasConfigBuilder {
        CasConfigBuilder::default()
    }

    /// Loads configuration from `CAS_*` environment variables.
    ///
    /// `CAS_SERVER` and `CAS_STATE_SECRET` are required; every other
    /// variable falls back to the builder default. A `.env` file is loaded
    /// if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut builder = Self::builder()
            .server(require_env("CAS_SERVER")?)
            .state_secret(require_env("CAS_STATE_SECRET")?.into_bytes());

        if let Ok(service) = std::env::var("CAS_SERVICE") {
            builder = builder.service(service);
        }
        if let Ok(version) = std::env::var("CAS_PROTOCOL_VERSION") {
            builder = builder.protocol_version(version);
        }
        if let Ok(path) = std::env::var("CAS_LOGIN_PATH") {
            builder = builder.login_path(path);
        }
        if let Ok(path) = std::env::var("CAS_LOGOUT_PATH") {
            builder = builder.logout_path(path);
        }
        if let Ok(path) = std::env::var("CAS_SERVICE_VALIDATE_PATH") {
            builder = builder.service_validate_path(path);
        }
        if let Ok(path) = std::env::var("CAS_PROXY_VALIDATE_PATH") {
            builder = builder.proxy_validate_path(path);
        }
        if let Ok(path) = std::env::var("CAS_CALLBACK_PATH") {
            builder = builder.callback_path(path);
        }
        if let Ok(issuer) = std::env::var("CAS_CLAIMS_ISSUER") {
            builder = builder.claims_issuer(issuer);
        }
        builder = builder.renew(bool_env("CAS_RENEW")?);
        builder = builder.gateway(bool_env("CAS_GATEWAY")?);
        if let Ok(secs) = std::env::var("CAS_BACKCHANNEL_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "CAS_BACKCHANNEL_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            builder = builder.backchannel_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// The secret keying the state codec.
    #[must_use]
    pub fn state_secret(&self) -> &[u8] {
        &self.state_secret
    }
}

impl fmt::Debug for CasConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CasConfig")
            .field("server", &self.server)
            .field("service", &self.service)
            .field("protocol_version", &self.protocol_version)
            .field("login_path", &self.login_path)
            .field("logout_path", &self.logout_path)
            .field("service_validate_path", &self.service_validate_path)
            .field("proxy_validate_path", &self.proxy_validate_path)
            .field("callback_path", &self.callback_path)
            .field("renew", &self.renew)
            .field("gateway", &self.gateway)
            .field("claims_issuer", &self.claims_issuer)
            .field("backchannel_timeout", &self.backchannel_timeout)
            .field("state_secret", &"<redacted>")
            .finish()
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

fn bool_env(name: &'static str) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Err(_) => Ok(false),
        Ok(value) => match value.as_str() {
            "1" | "true" => Ok(true),
            "" | "0" | "false" => Ok(false),
            _ => Err(ConfigError::InvalidEnv { name, value }),
        },
    }
}

/// Builder for [`CasConfig`].
#[derive(Debug, Clone)]
pub struct CasConfigBuilder {
    server: String,
    service: Option<String>,
    protocol_version: String,
    login_path: String,
    logout_path: String,
    service_validate_path: Option<String>,
    proxy_validate_path: Option<String>,
    callback_path: String,
    renew: bool,
    gateway: bool,
    claims_issuer: String,
    backchannel_timeout: Duration,
    state_secret: Vec<u8>,
}

impl Default for CasConfigBuilder {
    fn default() -> Self {
        Self {
            server: String::new(),
            service: None,
            protocol_version: defaults::PROTOCOL_VERSION.to_string(),
            login_path: defaults::LOGIN_PATH.to_string(),
            logout_path: defaults::LOGOUT_PATH.to_string(),
            service_validate_path: None,
            proxy_validate_path: None,
            callback_path: defaults::CALLBACK_PATH.to_string(),
            renew: false,
            gateway: false,
            claims_issuer: defaults::ISSUER.to_string(),
            backchannel_timeout: Duration::from_secs(defaults::BACKCHANNEL_TIMEOUT_SECS),
            state_secret: Vec::new(),
        }
    }
}

impl CasConfigBuilder {
    /// Sets the CAS server base URL.
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Sets the explicit service base URL for this application.
    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the protocol version tag (`"1.0"`, `"2.0"` or `"3.0"`).
    #[must_use]
    pub fn protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Sets the login path.
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the logout path.
    #[must_use]
    pub fn logout_path(mut self, path: impl Into<String>) -> Self {
        self.logout_path = path.into();
        self
    }

    /// Sets the service ticket validation path, overriding the version
    /// default.
    #[must_use]
    pub fn service_validate_path(mut self, path: impl Into<String>) -> Self {
        self.service_validate_path = Some(path.into());
        self
    }

    /// Sets the proxy ticket validation path, overriding the version
    /// default.
    #[must_use]
    pub fn proxy_validate_path(mut self, path: impl Into<String>) -> Self {
        self.proxy_validate_path = Some(path.into());
        self
    }

    /// Sets the application callback path.
    #[must_use]
    pub fn callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = path.into();
        self
    }

    /// Forces credential entry on the CAS server.
    #[must_use]
    pub const fn renew(mut self, renew: bool) -> Self {
        self.renew = renew;
        self
    }

    /// Requests non-interactive authentication only.
    #[must_use]
    pub const fn gateway(mut self, gateway: bool) -> Self {
        self.gateway = gateway;
        self
    }

    /// Sets the claims issuer label.
    #[must_use]
    pub fn claims_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims_issuer = issuer.into();
        self
    }

    /// Sets the backchannel timeout.
    #[must_use]
    pub const fn backchannel_timeout(mut self, timeout: Duration) -> Self {
        self.backchannel_timeout = timeout;
        self
    }

    /// Sets the secret keying the state codec.
    #[must_use]
    pub fn state_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.state_secret = secret.into();
        self
    }

    /// Applies protocol-version defaults and validates the configuration.
    pub fn build(self) -> Result<CasConfig, ConfigError> {
        if self.server.is_empty() {
            return Err(ConfigError::MissingServer);
        }
        if self.login_path.is_empty() {
            return Err(ConfigError::MissingLoginPath);
        }
        if self.logout_path.is_empty() {
            return Err(ConfigError::MissingLogoutPath);
        }
        if self.renew && self.gateway {
            return Err(ConfigError::RenewGatewayConflict);
        }
        if self.state_secret.is_empty() {
            return Err(ConfigError::MissingStateSecret);
        }

        let protocol_version = ProtocolVersion::parse(&self.protocol_version)?;

        let service_validate_path = match self.service_validate_path {
            Some(path) if !path.is_empty() => path,
            Some(_) => return Err(ConfigError::MissingValidatePath),
            None => protocol_version.default_service_validate_path().to_string(),
        };
        let proxy_validate_path = self.proxy_validate_path.or_else(|| {
            protocol_version
                .default_proxy_validate_path()
                .map(str::to_string)
        });

        Ok(CasConfig {
            server: self.server.trim_end_matches('/').to_string(),
            service: self.service,
            protocol_version,
            login_path: self.login_path,
            logout_path: self.logout_path,
            service_validate_path,
            proxy_validate_path,
            callback_path: self.callback_path,
            renew: self.renew,
            gateway: self.gateway,
            claims_issuer: self.claims_issuer,
            backchannel_timeout: self.backchannel_timeout,
            state_secret: self.state_secret,
        })
    }
}
