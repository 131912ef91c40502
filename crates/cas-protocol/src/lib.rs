//! # cas-protocol
//!
//! Client side of the CAS (Central Authentication Service) single-sign-on
//! handshake: issue a login redirect, receive the callback carrying a
//! single-use service ticket, exchange the ticket for identity data over a
//! backchannel call, and project the result into a claims-based identity.
//!
//! # Architecture
//!
//! - [`state`] - tamper-evident state token carried across the redirect
//! - [`handler`] - the handshake orchestrator ([`CasHandler`])
//! - [`backchannel`] - server-to-server ticket validation call
//! - [`validator`] - CAS 1.0 / CAS 2.0+ response parsers and the composite
//!   fallback
//! - [`response`] - the validation response model
//! - [`claims`] - attribute-to-claim projection
//! - [`events`] - host hook points for redirect and ticket customization
//! - [`error`] - protocol error types
//!
//! The hosting web server, session persistence, and route registration are
//! external collaborators: the handler takes request data in and hands a
//! redirect or a terminal outcome back.
//!
//! # Example
//!
//! ```rust,ignore
//! use cas_core::CasConfig;
//! use cas_protocol::handler::{CallbackRequest, CasHandler, RequestContext};
//!
//! let config = CasConfig::builder()
//!     .server("https://cas.example.com")
//!     .state_secret(std::env::var("CAS_STATE_SECRET")?.into_bytes())
//!     .build()?;
//! let handler = CasHandler::new(config)?;
//!
//! let request = RequestContext::new("https", "app.example.com");
//! let challenge = handler.challenge(&request, None)?;
//! // redirect the browser to challenge.redirect_uri and persist
//! // challenge.correlation_nonce with the caller...
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backchannel;
pub mod claims;
pub mod error;
pub mod events;
pub mod handler;
pub mod response;
pub mod state;
pub mod validator;

pub use claims::{CasIdentity, Claim, ClaimsFilter, DefaultClaimsFilter};
pub use error::{CasError, CasResult};
pub use events::CasEvents;
pub use handler::{CallbackOutcome, CallbackRequest, CasChallenge, CasHandler, RejectionReason, RequestContext};
pub use response::{CasResponse, CasResponseType};
pub use state::{StateCodec, StateProperties};
pub use validator::{
    Cas1TicketValidator, Cas23TicketValidator, CompositeTicketValidator, TicketValidator,
};
