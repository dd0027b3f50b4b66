//! Relayer connection: HTTP transport and the shared lazy-init handle.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::RelayerConfig;
use crate::error::{ClientError, ClientResult};
use crate::relayer::types::{UserDecryptRequest, UserDecryptResponse};

/// The relayer decryption service, at its interface boundary. One
/// implementation speaks HTTP; tests substitute in-memory fakes.
#[async_trait]
pub trait RelayerApi: Send + Sync {
    /// Submit a user-scoped decryption request. One network round trip, no
    /// automatic retry: the caller re-invokes with fresh key material.
    async fn user_decrypt(&self, request: &UserDecryptRequest) -> ClientResult<UserDecryptResponse>;
}

/// HTTP relayer client.
pub struct HttpRelayer {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRelayer {
    /// Establish the relayer connection. Called once per process through
    /// [`RelayerHandle`]; a failure here is cached as `RelayerUnavailable`
    /// for every subsequent decrypt until an explicit reset.
    pub async fn connect(config: &RelayerConfig) -> ClientResult<Self> {
        let base_url: url::Url = config
            .url
            .parse()
            .map_err(|e| ClientError::RelayerUnavailable(format!("invalid relayer URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::RelayerUnavailable(e.to_string()))?;

        tracing::info!(url = %base_url, "relayer client initialized");

        Ok(Self {
            http,
            base_url: base_url.to_string().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RelayerApi for HttpRelayer {
    async fn user_decrypt(&self, request: &UserDecryptRequest) -> ClientResult<UserDecryptResponse> {
        let url = format!("{}/v1/user-decrypt", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::RelayerRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::RelayerRequestFailed(format!(
                "relayer returned {}: {}",
                status, body
            )));
        }

        response
            .json::<UserDecryptResponse>()
            .await
            .map_err(|e| ClientError::RelayerRequestFailed(format!("malformed response: {}", e)))
    }
}

enum InitState<R> {
    Uninitialized,
    Ready(Arc<R>),
    Failed(String),
}

/// Process-wide relayer connection handle with lazy async initialization.
///
/// The first caller runs the init future while holding the lock, so
/// concurrent first callers collapse to a single attempt and all observe the
/// same outcome. A failed initialization is cached and surfaced as
/// `RelayerUnavailable` to all current and future callers until
/// [`Self::reset`] is called.
pub struct RelayerHandle<R> {
    state: Mutex<InitState<R>>,
}

impl<R> RelayerHandle<R> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InitState::Uninitialized),
        }
    }

    /// Get the connection, initializing it with `init` if nobody has yet.
    pub async fn get_or_init<F>(&self, init: F) -> ClientResult<Arc<R>>
    where
        F: Future<Output = ClientResult<R>>,
    {
        let mut state = self.state.lock().await;
        match &*state {
            InitState::Ready(relayer) => Ok(relayer.clone()),
            InitState::Failed(reason) => Err(ClientError::RelayerUnavailable(reason.clone())),
            InitState::Uninitialized => match init.await {
                Ok(relayer) => {
                    let relayer = Arc::new(relayer);
                    *state = InitState::Ready(relayer.clone());
                    Ok(relayer)
                }
                Err(e) => {
                    let reason = e.to_string();
                    tracing::warn!(error = %reason, "relayer initialization failed");
                    *state = InitState::Failed(reason.clone());
                    Err(ClientError::RelayerUnavailable(reason))
                }
            },
        }
    }

    /// Get the connection without initializing. Fails fast with
    /// `RelayerUnavailable` when init never ran or failed.
    pub async fn get(&self) -> ClientResult<Arc<R>> {
        match &*self.state.lock().await {
            InitState::Ready(relayer) => Ok(relayer.clone()),
            InitState::Failed(reason) => Err(ClientError::RelayerUnavailable(reason.clone())),
            InitState::Uninitialized => Err(ClientError::RelayerUnavailable(
                "relayer connection not initialized".to_string(),
            )),
        }
    }

    /// Forget a cached outcome so the next caller re-initializes.
    pub async fn reset(&self) {
        *self.state.lock().await = InitState::Uninitialized;
    }
}

impl<R> Default for RelayerHandle<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Probe;

    #[tokio::test]
    async fn concurrent_init_collapses_to_one_attempt() {
        let handle = Arc::new(RelayerHandle::<Probe>::new());
        let attempts = Arc::new(AtomicU32::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = handle.clone();
            let attempts = attempts.clone();
            tasks.push(tokio::spawn(async move {
                handle
                    .get_or_init(async {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Ok(Probe)
                    })
                    .await
                    .is_ok()
            }));
        }

        for task in tasks {
            assert!(task.await.unwrap());
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_init_is_cached_until_reset() {
        let handle = RelayerHandle::<Probe>::new();
        let attempts = AtomicU32::new(0);

        let first = handle
            .get_or_init(async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::RelayerUnavailable("boom".to_string()))
            })
            .await;
        assert!(matches!(first, Err(ClientError::RelayerUnavailable(_))));

        // Second attempt must not re-run init.
        let second = handle
            .get_or_init(async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok(Probe)
            })
            .await;
        assert!(matches!(second, Err(ClientError::RelayerUnavailable(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);

        handle.reset().await;
        let third = handle
            .get_or_init(async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok(Probe)
            })
            .await;
        assert!(third.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn get_before_init_is_unavailable() {
        let handle = RelayerHandle::<Probe>::new();
        assert!(matches!(
            handle.get().await,
            Err(ClientError::RelayerUnavailable(_))
        ));
    }
}
