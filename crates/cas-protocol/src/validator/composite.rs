//! Validator fallback chain.

use std::sync::Arc;

use async_trait::async_trait;

use crate::response::CasResponse;

use super::{Cas1TicketValidator, Cas23TicketValidator, TicketValidator};

/// Tries a chain of validators and keeps the first result.
///
/// The default chain tries XML before plain text: XML is the
/// currently-recommended protocol surface, and trying it first avoids
/// misreading an XML failure document as plain-text garbage. Plain text
/// remains the fallback for legacy CAS 1.0 deployments. Exhausting the
/// chain is not an error - the ticket is simply invalid.
pub struct CompositeTicketValidator {
    validators: Vec<Arc<dyn TicketValidator>>,
}

impl CompositeTicketValidator {
    /// Creates a composite over a custom validator chain, tried in order.
    #[must_use]
    pub fn new(validators: Vec<Arc<dyn TicketValidator>>) -> Self {
        Self { validators }
    }
}

impl Default for CompositeTicketValidator {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(Cas23TicketValidator),
            Arc::new(Cas1TicketValidator),
        ])
    }
}

#[async_trait]
impl TicketValidator for CompositeTicketValidator {
    async fn validate(&self, response: &mut CasResponse) -> bool {
        for validator in &self.validators {
            if validator.validate(response).await {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::CasResponseType;

    #[tokio::test]
    async fn plain_text_payload_falls_through_to_cas1() {
        // Valid CAS 1.0, not well-formed XML: the XML validator must yield
        // no result without failing the chain.
        let mut response = CasResponse::new("yes\njdoe\n");
        let ok = CompositeTicketValidator::default()
            .validate(&mut response)
            .await;
        assert!(ok);
        assert_eq!(response.response_type, CasResponseType::Validate);
        assert_eq!(response.username, "jdoe");
    }

    #[tokio::test]
    async fn xml_payload_is_handled_by_cas23() {
        let mut response = CasResponse::new(
            r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas"><cas:authenticationSuccess><cas:user>jdoe</cas:user></cas:authenticationSuccess></cas:serviceResponse>"#,
        );
        let ok = CompositeTicketValidator::default()
            .validate(&mut response)
            .await;
        assert!(ok);
        assert_eq!(response.response_type, CasResponseType::ServiceValidate);
    }

    #[tokio::test]
    async fn unrecognized_payload_exhausts_the_chain() {
        let mut response = CasResponse::new("no\n\n");
        let ok = CompositeTicketValidator::default()
            .validate(&mut response)
            .await;
        assert!(!ok);
        assert!(!response.is_resolved());
    }

    #[tokio::test]
    async fn custom_chain_is_tried_in_order() {
        struct Always(bool);

        #[async_trait]
        impl TicketValidator for Always {
            async fn validate(&self, response: &mut CasResponse) -> bool {
                if self.0 {
                    response.username = "custom".to_string();
                }
                self.0
            }
        }

        let composite =
            CompositeTicketValidator::new(vec![Arc::new(Always(false)), Arc::new(Always(true))]);
        let mut response = CasResponse::new("");
        assert!(composite.validate(&mut response).await);
        assert_eq!(response.username, "custom");
    }
}
