//! Ticket validation strategies.
//!
//! A [`TicketValidator`] inspects the raw backchannel payload held by a
//! [`CasResponse`] and, when it recognizes the format, fills in the result
//! projection. Validators are total: malformed input yields `false`, never
//! a panic or an error, because the protocol does not distinguish a
//! CAS-side rejection from a garbled payload.
//!
//! The provided set is closed - plain text ([`Cas1TicketValidator`]),
//! namespaced XML ([`Cas23TicketValidator`]), and the fallback chain
//! ([`CompositeTicketValidator`]) - but the trait is an open extension
//! slot: hosts can hand the handler any implementation of their own.

mod cas1;
mod cas23;
mod composite;

pub use cas1::Cas1TicketValidator;
pub use cas23::{Cas23TicketValidator, CAS_NAMESPACE};
pub use composite::CompositeTicketValidator;

use async_trait::async_trait;

use crate::response::CasResponse;

/// Checks the validity of a service ticket response.
#[async_trait]
pub trait TicketValidator: Send + Sync {
    /// Attempts to extract a validation result from the response payload.
    ///
    /// Returns `true` and fills in the response projection when the payload
    /// is a recognized success document; returns `false` otherwise, leaving
    /// `username` and `response_type` untouched.
    async fn validate(&self, response: &mut CasResponse) -> bool;
}
