//! Caller identity resolution.
//!
//! Uploads are namespaced by the caller's stable account id, so ingestion
//! resolves an identity before touching remote storage. Resolution walks an
//! ordered provider chain: the lightweight session endpoint first (a
//! cookie-backed JSON endpoint that involves no identity-provider SDK), then
//! the identity provider's userinfo endpoint. The first provider that yields
//! an identity wins; provider failures are logged and treated as absent
//! rather than propagated, because "unauthenticated" is an ordinary state
//! the pipeline handles with its fallback policy.

use async_trait::async_trait;
use courtside_core::CallerIdentity;
use courtside_error::{CourtsideResult, HttpError};
use serde::Deserialize;
use std::sync::Arc;

/// One source of caller identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Resolve the current caller, if any.
    ///
    /// Read-only; implementations must not refresh sessions or mint tokens.
    async fn current_identity(&self) -> CourtsideResult<Option<CallerIdentity>>;
}

/// Source of the bearer token presented to the userinfo endpoint.
pub trait TokenSource: Send + Sync {
    /// The current access token, if one is held.
    fn access_token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        self()
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    user_id: Option<String>,
}

/// Cookie-session identity provider.
///
/// Asks a lightweight server endpoint for the identity bound to the current
/// cookie session. This path deliberately involves nothing but an HTTP call,
/// so it stays available when the identity-provider SDK is not.
pub struct SessionEndpoint {
    client: reqwest::Client,
    url: String,
}

impl SessionEndpoint {
    /// Create a provider for the given session endpoint URL.
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SessionEndpoint {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn current_identity(&self) -> CourtsideResult<Option<CallerIdentity>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("session endpoint: {}", e)))?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| HttpError::new(format!("session payload: {}", e)))?;

        Ok(session.user_id.map(CallerIdentity::new))
    }
}

#[derive(Debug, Deserialize)]
struct UserinfoResponse {
    sub: Option<String>,
}

/// Identity-provider userinfo provider.
///
/// Reads the durable subject id (`sub`) from the provider's userinfo
/// endpoint. The subject id is the only attribute used: storage paths must
/// not be keyed on anything the account holder can edit.
pub struct UserinfoEndpoint {
    client: reqwest::Client,
    url: String,
    tokens: Arc<dyn TokenSource>,
}

impl UserinfoEndpoint {
    /// Create a provider for the given userinfo URL and token source.
    pub fn new(client: reqwest::Client, url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            url: url.into(),
            tokens,
        }
    }
}

#[async_trait]
impl IdentityProvider for UserinfoEndpoint {
    fn name(&self) -> &'static str {
        "userinfo"
    }

    async fn current_identity(&self) -> CourtsideResult<Option<CallerIdentity>> {
        let Some(token) = self.tokens.access_token() else {
            return Ok(None);
        };

        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("userinfo endpoint: {}", e)))?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let userinfo: UserinfoResponse = response
            .json()
            .await
            .map_err(|e| HttpError::new(format!("userinfo payload: {}", e)))?;

        Ok(userinfo.sub.map(CallerIdentity::new))
    }
}

/// Ordered identity-provider chain.
#[derive(Clone)]
pub struct IdentityResolver {
    providers: Vec<Arc<dyn IdentityProvider>>,
}

impl IdentityResolver {
    /// Build a resolver over providers tried in order.
    pub fn new(providers: Vec<Arc<dyn IdentityProvider>>) -> Self {
        Self { providers }
    }

    /// Resolve the current caller identity, or absent when every provider
    /// comes up empty.
    ///
    /// Resolution runs per ingestion call and is never cached: sessions
    /// change between calls.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self) -> Option<CallerIdentity> {
        for provider in &self.providers {
            match provider.current_identity().await {
                Ok(Some(identity)) => {
                    tracing::debug!(provider = provider.name(), %identity, "resolved caller");
                    return Some(identity);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "identity provider failed");
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_error::MediaError;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl IdentityProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn current_identity(&self) -> CourtsideResult<Option<CallerIdentity>> {
            Ok(self.0.map(CallerIdentity::new))
        }
    }

    struct Failing;

    #[async_trait]
    impl IdentityProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn current_identity(&self) -> CourtsideResult<Option<CallerIdentity>> {
            Err(MediaError::new(courtside_error::MediaErrorKind::Service(
                "unreachable".to_string(),
            ))
            .into())
        }
    }

    #[tokio::test]
    async fn first_present_identity_wins() {
        let resolver = IdentityResolver::new(vec![
            Arc::new(Fixed(None)),
            Arc::new(Fixed(Some("user-a"))),
            Arc::new(Fixed(Some("user-b"))),
        ]);
        assert_eq!(resolver.resolve().await.unwrap().as_str(), "user-a");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_next() {
        let resolver =
            IdentityResolver::new(vec![Arc::new(Failing), Arc::new(Fixed(Some("user-c")))]);
        assert_eq!(resolver.resolve().await.unwrap().as_str(), "user-c");
    }

    #[tokio::test]
    async fn all_absent_resolves_to_none() {
        let resolver = IdentityResolver::new(vec![Arc::new(Fixed(None)), Arc::new(Failing)]);
        assert!(resolver.resolve().await.is_none());
    }
}
