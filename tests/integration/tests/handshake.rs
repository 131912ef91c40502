//! Full challenge/callback handshake tests.

use axum::http::StatusCode;

use cas_core::CasConfig;
use cas_protocol::claims::claim_types;
use cas_protocol::handler::{
    CallbackOutcome, CallbackRequest, CasHandler, RejectionReason, RequestContext,
};

use crate::common::{extract_state, MockCas};

const CAS2_SUCCESS: &str = r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas"><cas:authenticationSuccess><cas:user>jdoe</cas:user><cas:attributes><cas:email>jdoe@example.com</cas:email></cas:attributes></cas:authenticationSuccess></cas:serviceResponse>"#;

fn handler_for(server: &str, version: &str) -> anyhow::Result<CasHandler> {
    let config = CasConfig::builder()
        .server(server)
        .service("https://app")
        .protocol_version(version)
        .state_secret("integration test secret")
        .build()?;
    Ok(CasHandler::new(config)?)
}

fn request() -> RequestContext {
    RequestContext::new("https", "app").with_path_and_query("/protected")
}

fn callback(handler: &CasHandler, ticket: Option<&str>) -> anyhow::Result<CallbackRequest> {
    let challenge = handler.challenge(&request(), Some("https://app/"))?;
    Ok(CallbackRequest {
        state: Some(extract_state(&challenge.redirect_uri)),
        ticket: ticket.map(str::to_string),
        correlation_nonce: Some(challenge.correlation_nonce),
        context: request(),
    })
}

#[tokio::test]
async fn cas1_handshake_authenticates() -> anyhow::Result<()> {
    let cas = MockCas::start("/validate", StatusCode::OK, "yes\njdoe\n").await?;
    let handler = handler_for(&cas.base_url, "1.0")?;

    let outcome = handler.callback(&callback(&handler, Some("ST-1"))?).await;

    let CallbackOutcome::Authenticated {
        identity,
        return_uri,
    } = outcome
    else {
        panic!("expected authentication, got {outcome:?}");
    };
    assert_eq!(identity.username, "jdoe");
    assert_eq!(identity.first_claim(claim_types::NAME_ID), Some("jdoe"));
    assert_eq!(return_uri, "https://app/");
    Ok(())
}

#[tokio::test]
async fn cas2_handshake_authenticates_with_attributes() -> anyhow::Result<()> {
    let cas = MockCas::start("/serviceValidate", StatusCode::OK, CAS2_SUCCESS).await?;
    // Host-supplied backchannel client, keeping whatever policy it carries.
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let handler = handler_for(&cas.base_url, "2.0")?.with_backchannel(client);

    let outcome = handler.callback(&callback(&handler, Some("ST-2"))?).await;

    let CallbackOutcome::Authenticated { identity, .. } = outcome else {
        panic!("expected authentication, got {outcome:?}");
    };
    assert_eq!(identity.username, "jdoe");

    let email = identity
        .claims
        .iter()
        .find(|c| c.claim_type == "email")
        .expect("email claim");
    assert_eq!(email.value, "jdoe@example.com");
    assert_eq!(email.issuer.as_deref(), Some("CAS"));
    Ok(())
}

#[tokio::test]
async fn corrupted_state_is_rejected() -> anyhow::Result<()> {
    let cas = MockCas::start("/validate", StatusCode::OK, "yes\njdoe\n").await?;
    let handler = handler_for(&cas.base_url, "1.0")?;

    let mut request = callback(&handler, Some("ST-3"))?;
    let state = request.state.take().unwrap();
    let mut chars: Vec<char> = state.chars().collect();
    let mid = chars.len() / 2;
    chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
    request.state = Some(chars.into_iter().collect());

    let outcome = handler.callback(&request).await;
    let CallbackOutcome::Rejected { reason, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(reason, RejectionReason::InvalidState);
    Ok(())
}

#[tokio::test]
async fn missing_ticket_is_rejected() -> anyhow::Result<()> {
    let cas = MockCas::start("/validate", StatusCode::OK, "yes\njdoe\n").await?;
    let handler = handler_for(&cas.base_url, "1.0")?;

    let outcome = handler.callback(&callback(&handler, None)?).await;
    let CallbackOutcome::Rejected { reason, properties, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(reason, RejectionReason::TicketNotFound);
    assert_eq!(properties.unwrap().return_uri, "https://app/");
    Ok(())
}

#[tokio::test]
async fn correlation_mismatch_is_rejected() -> anyhow::Result<()> {
    let cas = MockCas::start("/validate", StatusCode::OK, "yes\njdoe\n").await?;
    let handler = handler_for(&cas.base_url, "1.0")?;

    let mut request = callback(&handler, Some("ST-4"))?;
    request.correlation_nonce = Some("a-nonce-from-some-other-session".to_string());

    let outcome = handler.callback(&request).await;
    let CallbackOutcome::Rejected { reason, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(reason, RejectionReason::CorrelationFailed);
    Ok(())
}

#[tokio::test]
async fn ticket_rejected_by_the_server_is_rejected() -> anyhow::Result<()> {
    let cas = MockCas::start("/validate", StatusCode::OK, "no\n\n").await?;
    let handler = handler_for(&cas.base_url, "1.0")?;

    let outcome = handler.callback(&callback(&handler, Some("ST-5"))?).await;
    let CallbackOutcome::Rejected { reason, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(reason, RejectionReason::UserInfoNotRetrieved);
    Ok(())
}

#[tokio::test]
async fn backchannel_failure_is_rejected_with_detail() -> anyhow::Result<()> {
    let cas = MockCas::start("/validate", StatusCode::INTERNAL_SERVER_ERROR, "").await?;
    let handler = handler_for(&cas.base_url, "1.0")?;

    let outcome = handler.callback(&callback(&handler, Some("ST-6"))?).await;
    let CallbackOutcome::Rejected { reason, detail, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(reason, RejectionReason::RemoteValidationError);
    assert!(detail.unwrap().contains("500"));
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_rejected() -> anyhow::Result<()> {
    // Nothing listens on this port; the connection is refused immediately.
    let handler = handler_for("http://127.0.0.1:9", "1.0")?;

    let outcome = handler.callback(&callback(&handler, Some("ST-7"))?).await;
    let CallbackOutcome::Rejected { reason, .. } = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(reason, RejectionReason::RemoteValidationError);
    Ok(())
}
