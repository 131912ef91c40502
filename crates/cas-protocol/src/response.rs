//! CAS validation response model.
//!
//! A [`CasResponse`] is created once per callback from the raw backchannel
//! payload and filled in by whichever [`crate::validator::TicketValidator`]
//! recognizes the payload. It is never reused across callbacks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The kind of CAS response a validator recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasResponseType {
    /// No validator has recognized the payload yet.
    #[default]
    Unspecified,
    /// CAS 1.0 `/validate` plain text response.
    Validate,
    /// CAS 2.0/3.0 `/serviceValidate` XML response.
    ServiceValidate,
    /// CAS 2.0/3.0 `/proxyValidate` XML response.
    ProxyValidate,
    /// CAS 2.0/3.0 `/proxy` XML response.
    Proxy,
}

/// CAS validation response.
///
/// Holds the raw payload verbatim plus the result projection extracted from
/// it. `username` stays empty and `response_type` stays
/// [`CasResponseType::Unspecified`] until a validator succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasResponse {
    /// Raw backchannel response body.
    pub data: String,

    /// The recognized response kind.
    pub response_type: CasResponseType,

    /// Authenticated username, empty until set by a validator.
    pub username: String,

    /// Released attributes. Keys are unique; a duplicate key in the payload
    /// overwrites the earlier value in document order.
    pub attributes: HashMap<String, String>,

    /// Proxy-granting ticket IOU, when the CAS server issued one.
    pub proxy_granting_ticket: Option<String>,

    /// Proxies the request was routed through, in document order.
    pub proxies: Vec<String>,

    /// Failure code from an authentication failure document.
    pub failure_code: Option<String>,

    /// Failure message from an authentication failure document.
    pub error: Option<String>,
}

impl CasResponse {
    /// Creates a response around a raw backchannel payload.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            response_type: CasResponseType::Unspecified,
            username: String::new(),
            attributes: HashMap::new(),
            proxy_granting_ticket: None,
            proxies: Vec::new(),
            failure_code: None,
            error: None,
        }
    }

    /// Returns true once a validator has extracted a result.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.response_type != CasResponseType::Unspecified
    }
}
