//! CAS 1.0 plain text validation.

use async_trait::async_trait;

use crate::response::{CasResponse, CasResponseType};

use super::TicketValidator;

/// The CAS 1.0 implementation of [`TicketValidator`].
///
/// The `/validate` endpoint answers `yes\n{username}\n` on success and
/// `no\n\n` on failure. Only the first two lines are meaningful; a failure
/// and a malformed payload are indistinguishable by protocol design.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cas1TicketValidator;

#[async_trait]
impl TicketValidator for Cas1TicketValidator {
    async fn validate(&self, response: &mut CasResponse) -> bool {
        let mut lines = response.data.split('\n');
        match (lines.next(), lines.next()) {
            (Some("yes"), Some(username)) => {
                response.response_type = CasResponseType::Validate;
                response.username = username.to_string();
                true
            }
            _ => false,
        }
    }
}
