//! Attribute-to-claim projection.
//!
//! After a ticket validates, the username and released attributes are
//! projected into a [`CasIdentity`]. The projection policy is pluggable
//! through [`ClaimsFilter`]; [`DefaultClaimsFilter`] is the baseline
//! behavior.

use serde::{Deserialize, Serialize};

use cas_core::CasConfig;

use crate::response::CasResponse;

/// Well-known claim types emitted by the default filter.
pub mod claim_types {
    /// Stable identifier for the authenticated principal.
    pub const NAME_ID: &str = "name_id";

    /// Display name of the authenticated principal.
    pub const NAME: &str = "name";
}

/// A typed key/value fact about an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The claim type. Attribute claims use the attribute key verbatim.
    pub claim_type: String,

    /// The claim value.
    pub value: String,

    /// The issuer label, when the claim came from a remote attribute.
    pub issuer: Option<String>,
}

impl Claim {
    /// Creates a claim with no issuer.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            issuer: None,
        }
    }

    /// Sets the issuer label.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// The authenticated identity produced by a successful handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasIdentity {
    /// Principal name from the validation response.
    pub username: String,

    /// Issuer label from the configuration.
    pub issuer: String,

    /// Claims accumulated by the claims filter and event hooks.
    pub claims: Vec<Claim>,
}

impl CasIdentity {
    /// Creates an identity with an empty claim set.
    #[must_use]
    pub fn new(username: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            issuer: issuer.into(),
            claims: Vec::new(),
        }
    }

    /// Appends a claim.
    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Returns the first claim value of the given type.
    #[must_use]
    pub fn first_claim(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Returns every claim value of the given type.
    #[must_use]
    pub fn claim_values(&self, claim_type: &str) -> Vec<&str> {
        self.claims
            .iter()
            .filter(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
            .collect()
    }
}

/// Selects attributes from a validation response and creates claims.
///
/// Hosts may substitute their own projection policy when constructing the
/// handler; the default behavior stays available as the baseline.
pub trait ClaimsFilter: Send + Sync {
    /// Projects the response into the identity's claim set.
    fn select(&self, config: &CasConfig, identity: &mut CasIdentity, response: &CasResponse);
}

/// The default [`ClaimsFilter`].
///
/// Emits a name-identifier claim and a name claim for the username, then
/// one claim per released attribute stamped with the configured issuer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClaimsFilter;

impl ClaimsFilter for DefaultClaimsFilter {
    fn select(&self, config: &CasConfig, identity: &mut CasIdentity, response: &CasResponse) {
        identity.add_claim(Claim::new(claim_types::NAME_ID, response.username.as_str()));
        identity.add_claim(Claim::new(claim_types::NAME, response.username.as_str()));

        for (key, value) in &response.attributes {
            identity.add_claim(
                Claim::new(key.as_str(), value.as_str())
                    .with_issuer(config.claims_issuer.as_str()),
            );
        }
    }
}
