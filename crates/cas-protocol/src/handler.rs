//! Handshake orchestration.
//!
//! [`CasHandler`] drives the two halves of the handshake. A challenge
//! encodes the caller's return URI and a fresh correlation nonce into a
//! state token and produces the login redirect; the host emits the
//! redirect and persists the nonce with the caller. A callback decodes the
//! state, checks the correlation, exchanges the ticket over the
//! backchannel, and projects the validated user into an identity. Every
//! identified failure mode resolves to a terminal
//! [`CallbackOutcome::Rejected`]; nothing in the callback path propagates
//! as a fault.

use std::fmt;
use std::sync::Arc;

use cas_core::CasConfig;

use crate::backchannel::Backchannel;
use crate::claims::{CasIdentity, ClaimsFilter, DefaultClaimsFilter};
use crate::error::CasResult;
use crate::events::{CasEvents, CreatingTicketContext, RedirectContext};
use crate::state::{StateCodec, StateProperties};
use crate::validator::{CompositeTicketValidator, TicketValidator};

/// Facts about the inbound request needed to derive URLs.
///
/// The hosting server supplies these; the handler never touches the
/// request object itself.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request scheme, `http` or `https`.
    pub scheme: String,

    /// Request host, including the port when non-default.
    pub host: String,

    /// Path base under which the application is mounted, empty when
    /// mounted at the root.
    pub base_path: String,

    /// Path and query of the current request, used as the default return
    /// URI for a challenge.
    pub path_and_query: String,
}

impl RequestContext {
    /// Creates a context for an application mounted at the root.
    #[must_use]
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            base_path: String::new(),
            path_and_query: "/".to_string(),
        }
    }

    /// Sets the mount path base.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the current path and query.
    #[must_use]
    pub fn with_path_and_query(mut self, path_and_query: impl Into<String>) -> Self {
        self.path_and_query = path_and_query.into();
        self
    }

    /// The full URL of the current request.
    #[must_use]
    pub fn current_uri(&self) -> String {
        format!(
            "{}://{}{}{}",
            self.scheme, self.host, self.base_path, self.path_and_query
        )
    }
}

/// A challenge ready for the host to emit.
#[derive(Debug, Clone)]
pub struct CasChallenge {
    /// Login redirect target on the CAS server.
    pub redirect_uri: String,

    /// Nonce the host must persist with the caller and present back on the
    /// callback. The same nonce rides inside the state token; the two must
    /// match for the callback to proceed.
    pub correlation_nonce: String,
}

/// Why a callback was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The `state` parameter was absent or failed to decode.
    InvalidState,

    /// The nonce in the state token did not match the one issued at
    /// challenge time.
    CorrelationFailed,

    /// The `ticket` parameter was absent or empty.
    TicketNotFound,

    /// The backchannel call failed at the transport level.
    RemoteValidationError,

    /// No validator extracted a user from the backchannel payload: the
    /// ticket was rejected or the response was malformed. The protocol
    /// does not distinguish the two.
    UserInfoNotRetrieved,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::InvalidState => "The state was missing or invalid.",
            Self::CorrelationFailed => "Correlation failed.",
            Self::TicketNotFound => "Ticket was not found.",
            Self::RemoteValidationError => {
                "An error occurred when retrieving user information from the remote server."
            }
            Self::UserInfoNotRetrieved => {
                "Failed to retrieve user information from remote server."
            }
        };
        f.write_str(message)
    }
}

/// Terminal outcome of a callback.
///
/// Both variants are final for this handshake instance; a new challenge
/// starts a fresh one.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// The ticket validated; the host completes its own session logic.
    Authenticated {
        /// The authenticated identity.
        identity: CasIdentity,
        /// The return URI carried through the state token.
        return_uri: String,
    },

    /// The callback failed. The caller must re-authenticate.
    Rejected {
        /// The identified failure mode.
        reason: RejectionReason,
        /// Underlying detail, when one exists (transport errors, failure
        /// codes).
        detail: Option<String>,
        /// State properties, when the state decoded far enough to recover
        /// them. For host-side diagnostics only.
        properties: Option<StateProperties>,
    },
}

impl CallbackOutcome {
    fn rejected(
        reason: RejectionReason,
        detail: Option<String>,
        properties: Option<StateProperties>,
    ) -> Self {
        tracing::debug!(%reason, "CAS callback rejected");
        Self::Rejected {
            reason,
            detail,
            properties,
        }
    }

    /// Returns true for [`CallbackOutcome::Authenticated`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Callback parameters handed over by the host.
#[derive(Debug, Clone)]
pub struct CallbackRequest {
    /// The `state` query parameter.
    pub state: Option<String>,

    /// The `ticket` query parameter.
    pub ticket: Option<String>,

    /// The correlation nonce the host persisted at challenge time.
    ///
    /// The host should clear the stored value once the callback resolves:
    /// a state token is consumed exactly once, and presenting it again is
    /// not proof of a second valid session.
    pub correlation_nonce: Option<String>,

    /// Facts about the callback request, used to rebuild the service URL.
    pub context: RequestContext,
}

/// The CAS handshake orchestrator.
///
/// Immutable once built; one instance serves any number of concurrent
/// handshakes because every token, response, and identity is local to a
/// single challenge/callback pair.
pub struct CasHandler {
    config: Arc<CasConfig>,
    codec: StateCodec,
    backchannel: Backchannel,
    validator: Arc<dyn TicketValidator>,
    claims_filter: Arc<dyn ClaimsFilter>,
    events: CasEvents,
}

impl CasHandler {
    /// Creates a handler with the default validator chain and claims
    /// filter.
    pub fn new(config: CasConfig) -> CasResult<Self> {
        let codec = StateCodec::from_secret(config.state_secret())?;
        let backchannel = Backchannel::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            codec,
            backchannel,
            validator: Arc::new(CompositeTicketValidator::default()),
            claims_filter: Arc::new(DefaultClaimsFilter),
            events: CasEvents::new(),
        })
    }

    /// Replaces the ticket validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn TicketValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the claims filter.
    #[must_use]
    pub fn with_claims_filter(mut self, filter: Arc<dyn ClaimsFilter>) -> Self {
        self.claims_filter = filter;
        self
    }

    /// Installs event hooks.
    #[must_use]
    pub fn with_events(mut self, events: CasEvents) -> Self {
        self.events = events;
        self
    }

    /// Replaces the backchannel HTTP client.
    ///
    /// Retry and proxy policy belong to the host's client configuration,
    /// not to this handler.
    #[must_use]
    pub fn with_backchannel(mut self, client: reqwest::Client) -> Self {
        self.backchannel = Backchannel::with_client(client);
        self
    }

    /// The configuration this handler serves.
    #[must_use]
    pub fn config(&self) -> &CasConfig {
        &self.config
    }

    /// Issues a challenge: encodes state and builds the login redirect.
    ///
    /// When `return_uri` is absent the caller returns to the current
    /// request URL. The returned nonce must be persisted with the caller
    /// and presented back on the callback.
    pub fn challenge(
        &self,
        request: &RequestContext,
        return_uri: Option<&str>,
    ) -> CasResult<CasChallenge> {
        let return_uri = match return_uri {
            Some(uri) if !uri.is_empty() => uri.to_string(),
            _ => request.current_uri(),
        };

        let correlation_nonce = cas_crypto::correlation_nonce();
        let properties = StateProperties::new(return_uri.clone(), correlation_nonce.clone());
        let state = self.codec.encode(&properties)?;

        let service_uri = self.build_service_uri(request, &state);
        let redirect_uri = self.build_challenge_uri(&service_uri);

        let mut context = RedirectContext {
            redirect_uri,
            return_uri,
        };
        self.events.fire_redirect(&mut context);

        tracing::debug!(redirect_uri = %context.redirect_uri, "issuing CAS challenge");
        Ok(CasChallenge {
            redirect_uri: context.redirect_uri,
            correlation_nonce,
        })
    }

    /// Processes a callback, resolving to a terminal outcome.
    pub async fn callback(&self, request: &CallbackRequest) -> CallbackOutcome {
        let Some(state) = request.state.as_deref().filter(|s| !s.is_empty()) else {
            return CallbackOutcome::rejected(RejectionReason::InvalidState, None, None);
        };
        let Ok(properties) = self.codec.decode(state) else {
            return CallbackOutcome::rejected(RejectionReason::InvalidState, None, None);
        };

        if request.correlation_nonce.as_deref() != Some(properties.correlation_nonce.as_str()) {
            return CallbackOutcome::rejected(
                RejectionReason::CorrelationFailed,
                None,
                Some(properties),
            );
        }

        let Some(ticket) = request.ticket.as_deref().filter(|t| !t.is_empty()) else {
            return CallbackOutcome::rejected(
                RejectionReason::TicketNotFound,
                None,
                Some(properties),
            );
        };

        // The service URL must match the challenge-time value exactly, so
        // it is rebuilt from the same state string.
        let service_uri = self.build_service_uri(&request.context, state);
        let mut response = match self
            .backchannel
            .validate(&self.config, &service_uri, ticket)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return CallbackOutcome::rejected(
                    RejectionReason::RemoteValidationError,
                    Some(e.to_string()),
                    Some(properties),
                );
            }
        };

        if !self.validator.validate(&mut response).await {
            return CallbackOutcome::rejected(
                RejectionReason::UserInfoNotRetrieved,
                response.error.clone(),
                Some(properties),
            );
        }

        let mut identity =
            CasIdentity::new(response.username.as_str(), self.config.claims_issuer.as_str());
        self.claims_filter
            .select(&self.config, &mut identity, &response);

        let mut context = CreatingTicketContext {
            identity: &mut identity,
            response: &response,
        };
        self.events.fire_creating_ticket(&mut context);

        tracing::debug!(username = %identity.username, "CAS callback authenticated");
        CallbackOutcome::Authenticated {
            identity,
            return_uri: properties.return_uri,
        }
    }

    /// Builds the service URL embedding the state token.
    ///
    /// Explicit `service` configuration wins; otherwise the URL derives
    /// from the inbound request. Both forms append the mount base path and
    /// the callback path.
    fn build_service_uri(&self, request: &RequestContext, state: &str) -> String {
        let base = match self.config.service.as_deref() {
            Some(service) if !service.is_empty() => {
                format!("{service}{}", request.base_path)
            }
            _ => format!("{}://{}{}", request.scheme, request.host, request.base_path),
        };
        format!("{base}{}?state={state}", self.config.callback_path)
    }

    /// Builds the login redirect URL for a service URL.
    fn build_challenge_uri(&self, service_uri: &str) -> String {
        let mut uri = format!(
            "{}{}?service={}",
            self.config.server,
            self.config.login_path,
            urlencoding::encode(service_uri)
        );
        if self.config.renew {
            uri.push_str("&renew=true");
        } else if self.config.gateway {
            uri.push_str("&gateway=true");
        }
        uri
    }
}
