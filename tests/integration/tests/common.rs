//! Common test fixtures.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

/// A mock CAS server answering ticket validation calls with a canned
/// response.
pub struct MockCas {
    /// Base URL of the running server.
    pub base_url: String,
}

impl MockCas {
    /// Starts a server answering `path` with the given status and body.
    ///
    /// Requests missing the `service` or `ticket` query parameter are
    /// answered with 400, so a handshake that mangles the validation URL
    /// fails loudly.
    pub async fn start(path: &str, status: StatusCode, body: &str) -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("cas_protocol=debug")
            .try_init();

        let body = body.to_string();
        let app = Router::new().route(
            path,
            get(move |Query(params): Query<HashMap<String, String>>| {
                let body = body.clone();
                async move {
                    if !params.contains_key("service") || !params.contains_key("ticket") {
                        return (StatusCode::BAD_REQUEST, String::new());
                    }
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
        })
    }
}

/// Pulls the state token out of a challenge redirect URI.
pub fn extract_state(redirect_uri: &str) -> String {
    let encoded_service = redirect_uri
        .split("service=")
        .nth(1)
        .expect("redirect carries a service parameter")
        .split('&')
        .next()
        .unwrap();
    let service = urlencoding::decode(encoded_service).expect("service decodes");
    service
        .split("state=")
        .nth(1)
        .expect("service carries a state parameter")
        .to_string()
}
