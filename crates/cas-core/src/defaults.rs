//! Default values for CAS authentication.
//!
//! Path constants follow the CAS protocol specification; an explicitly
//! configured path always overrides the per-version default.

/// Default authentication scheme name.
pub const SCHEME: &str = "CAS";

/// Display name for the authentication scheme.
pub const DISPLAY_NAME: &str = "Central Authentication Service";

/// Default claims issuer label.
pub const ISSUER: &str = "CAS";

/// Default callback path on the application side.
pub const CALLBACK_PATH: &str = "/signin-cas";

/// Default CAS protocol version.
pub const PROTOCOL_VERSION: &str = "2.0";

/// Credential requestor / acceptor.
pub const LOGIN_PATH: &str = "/login";

/// Destroy CAS session (logout).
pub const LOGOUT_PATH: &str = "/logout";

/// Service ticket validation [CAS 1.0].
pub const VALIDATE_PATH: &str = "/validate";

/// Service ticket validation [CAS 2.0].
pub const SERVICE_VALIDATE_PATH: &str = "/serviceValidate";

/// Service/proxy ticket validation [CAS 2.0].
pub const PROXY_VALIDATE_PATH: &str = "/proxyValidate";

/// Proxy ticket service [CAS 2.0].
pub const PROXY_PATH: &str = "/proxy";

/// Service ticket validation [CAS 3.0].
pub const P3_SERVICE_VALIDATE_PATH: &str = "/p3/serviceValidate";

/// Service/proxy ticket validation [CAS 3.0].
pub const P3_PROXY_VALIDATE_PATH: &str = "/p3/proxyValidate";

/// Default backchannel timeout in seconds.
pub const BACKCHANNEL_TIMEOUT_SECS: u64 = 60;
