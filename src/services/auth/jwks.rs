/*
 * Responsibility
 * - Retrieve the identity provider's JWKS and serve per-`kid` lookups
 * - Process-lifetime cache: concurrent readers, wholesale replacement on
 *   refresh (never an in-place partial merge)
 */
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::RwLock;

use super::error::AuthError;

/// Retrieval of the published key set.
///
/// A trait seam so the cache can be exercised in tests with a double that
/// counts invocations instead of hitting the network.
#[async_trait]
pub trait JwksFetch: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the JWKS document over HTTPS.
///
/// The request timeout is baked into the client; a timeout is treated the
/// same as any other fetch failure.
pub struct HttpJwksFetcher {
    client: reqwest::Client,
    jwks_url: String,
}

impl HttpJwksFetcher {
    pub fn new(jwks_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, jwks_url })
    }
}

#[async_trait]
impl JwksFetch for HttpJwksFetcher {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| {
                tracing::warn!(error = %err, url = %self.jwks_url, "jwks fetch failed");
                AuthError::KeySetUnavailable
            })?;

        let set = response.json::<JwkSet>().await.map_err(|err| {
            tracing::warn!(error = %err, url = %self.jwks_url, "jwks document is malformed");
            AuthError::KeySetUnavailable
        })?;

        tracing::debug!(keys = set.keys.len(), "jwks refreshed");
        Ok(set)
    }
}

/// `kid → JWK` cache over a [`JwksFetch`] source.
///
/// A lookup that misses forces at most one refresh; a `kid` still absent
/// after a fresh fetch is reported as unknown rather than retried, which
/// bounds the fetch cost under a forged-`kid` flood.
pub struct KeyStore {
    fetcher: Arc<dyn JwksFetch>,
    keys: RwLock<HashMap<String, Jwk>>,
}

impl KeyStore {
    pub fn new(fetcher: Arc<dyn JwksFetch>) -> Self {
        Self {
            fetcher,
            keys: RwLock::new(HashMap::new()),
        }
    }

    pub async fn key_for(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(jwk) = self.keys.read().await.get(kid) {
            return Ok(jwk.clone());
        }

        // Signing keys rotate; an unknown kid may simply be a newer key.
        self.refresh().await?;

        self.keys
            .read()
            .await
            .get(kid)
            .cloned()
            .ok_or(AuthError::SigningKeyNotFound)
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        let set = self.fetcher.fetch().await?;

        let keys: HashMap<String, Jwk> = set
            .keys
            .into_iter()
            .filter_map(|jwk| jwk.common.key_id.clone().map(|kid| (kid, jwk)))
            .collect();

        *self.keys.write().await = keys;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::test_support;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a scripted sequence of key sets, counting fetches. `None`
    /// entries simulate an unreachable endpoint; the last entry repeats.
    struct ScriptedFetcher {
        calls: AtomicUsize,
        script: Mutex<Vec<Option<JwkSet>>>,
    }

    impl ScriptedFetcher {
        fn new(script: Vec<Option<JwkSet>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(script),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JwksFetch for ScriptedFetcher {
        async fn fetch(&self) -> Result<JwkSet, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            let next = if script.len() > 1 {
                script.remove(0)
            } else {
                script[0].clone()
            };
            next.ok_or(AuthError::KeySetUnavailable)
        }
    }

    #[tokio::test]
    async fn cache_hit_performs_no_further_fetch() {
        let fetcher = ScriptedFetcher::new(vec![Some(test_support::jwk_set())]);
        let store = KeyStore::new(fetcher.clone());

        store.key_for(test_support::TEST_KID).await.unwrap();
        assert_eq!(fetcher.calls(), 1);

        store.key_for(test_support::TEST_KID).await.unwrap();
        store.key_for(test_support::TEST_KID).await.unwrap();
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_kid_forces_exactly_one_refresh_per_lookup() {
        let fetcher = ScriptedFetcher::new(vec![Some(test_support::jwk_set())]);
        let store = KeyStore::new(fetcher.clone());

        let err = store.key_for("no-such-kid").await.unwrap_err();
        assert_eq!(err, AuthError::SigningKeyNotFound);
        assert_eq!(fetcher.calls(), 1);

        let err = store.key_for("no-such-kid").await.unwrap_err();
        assert_eq!(err, AuthError::SigningKeyNotFound);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_as_key_set_unavailable() {
        let fetcher = ScriptedFetcher::new(vec![None]);
        let store = KeyStore::new(fetcher.clone());

        let err = store.key_for(test_support::TEST_KID).await.unwrap_err();
        assert_eq!(err, AuthError::KeySetUnavailable);
    }

    #[tokio::test]
    async fn refresh_replaces_the_key_set_wholesale() {
        let fetcher = ScriptedFetcher::new(vec![
            Some(test_support::jwk_set_with_kid("old-key")),
            Some(test_support::jwk_set_with_kid("new-key")),
        ]);
        let store = KeyStore::new(fetcher.clone());

        store.key_for("old-key").await.unwrap();
        store.key_for("new-key").await.unwrap();

        // The rotated-out key must be gone, not merged alongside the new one.
        let err = store.key_for("old-key").await.unwrap_err();
        assert_eq!(err, AuthError::SigningKeyNotFound);
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn keys_without_a_kid_are_ignored() {
        let mut set = test_support::jwk_set();
        set.keys[0].common.key_id = None;

        let fetcher = ScriptedFetcher::new(vec![Some(set)]);
        let store = KeyStore::new(fetcher.clone());

        let err = store.key_for(test_support::TEST_KID).await.unwrap_err();
        assert_eq!(err, AuthError::SigningKeyNotFound);
    }
}
