// Tab data fetcher.
// Dispatches (item, tab) pairs to endpoints and never fails its caller.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{Result, TileError};

use super::client::RemoteClient;
use super::endpoints::Endpoint;
use super::payload::CanonicalResult;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_UNKNOWN_TAB_DELAY: Duration = Duration::from_millis(800);

/// Source of tab data. Implementations absorb every failure.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    async fn fetch(&self, item_id: &str, tab_id: &str, forced: bool) -> CanonicalResult;
}

/// Raw request/response access to the tab endpoints.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_payload(&self, endpoint: Endpoint, item_id: &str) -> Result<Value>;
}

#[async_trait]
impl Transport for RemoteClient {
    async fn get_payload(&self, endpoint: Endpoint, item_id: &str) -> Result<Value> {
        self.get_tab_payload(endpoint, item_id).await
    }
}

/// Fetcher backed by the remote endpoints, with a timeout and empty-result fallback.
pub struct HttpFetcher<T = RemoteClient> {
    transport: T,
    timeout: Duration,
    unknown_tab_delay: Duration,
}

impl<T: Transport> HttpFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            unknown_tab_delay: DEFAULT_UNKNOWN_TAB_DELAY,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_unknown_tab_delay(mut self, delay: Duration) -> Self {
        self.unknown_tab_delay = delay;
        self
    }

    async fn try_fetch(&self, endpoint: Endpoint, item_id: &str) -> Result<CanonicalResult> {
        let value = tokio::time::timeout(self.timeout, self.transport.get_payload(endpoint, item_id))
            .await
            .map_err(|_| TileError::Timeout {
                tab: endpoint.tab_id().to_string(),
                after: self.timeout,
            })??;

        Ok(endpoint.decode(value)?.into_canonical())
    }
}

#[async_trait]
impl<T: Transport> DataFetcher for HttpFetcher<T> {
    async fn fetch(&self, item_id: &str, tab_id: &str, forced: bool) -> CanonicalResult {
        let Some(endpoint) = Endpoint::from_tab_id(tab_id) else {
            debug!(tab = tab_id, item = item_id, "no endpoint for tab, returning empty result");
            tokio::time::sleep(self.unknown_tab_delay).await;
            return CanonicalResult::empty();
        };

        debug!(tab = tab_id, item = item_id, forced, "fetching tab data");
        match self.try_fetch(endpoint, item_id).await {
            Ok(result) => result,
            Err(e) if e.is_transport() => {
                warn!(tab = tab_id, item = item_id, error = %e, "tab fetch failed, using empty result");
                CanonicalResult::empty()
            }
            Err(e) => {
                error!(tab = tab_id, item = item_id, error = %e, "unexpected fetch error, using empty result");
                CanonicalResult::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    enum Reply {
        Value(Value),
        Fail,
        Broken,
        Hang,
    }

    struct StubTransport {
        reply: Reply,
        calls: Mutex<Vec<(Endpoint, String)>>,
    }

    impl StubTransport {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get_payload(&self, endpoint: Endpoint, item_id: &str) -> Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((endpoint, item_id.to_string()));
            match &self.reply {
                Reply::Value(v) => Ok(v.clone()),
                Reply::Fail => Err(TileError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    url: format!("http://localhost:8000{}", endpoint.path()),
                }),
                Reply::Broken => Err(TileError::Io(std::io::Error::other("socket closed"))),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn assert_well_formed(result: &CanonicalResult) {
        assert!(!result.last_updated.is_empty());
        assert!(result.total_count as usize >= result.items.len());
    }

    #[tokio::test]
    async fn test_never_fails_on_any_shape() {
        let shapes = vec![
            Value::Null,
            json!([1, 2, 3]),
            json!({"items": [{"a": 1}]}),
            json!({"name": "no list here"}),
            json!({"data": "not a list"}),
        ];
        for shape in shapes {
            let fetcher = HttpFetcher::new(StubTransport::new(Reply::Value(shape)));
            let result = fetcher.fetch("item1", "team", false).await;
            assert_well_formed(&result);
        }
    }

    #[tokio::test]
    async fn test_analytics_bare_array() {
        let rows = json!([{"metric": "Visits"}, {"metric": "Signups"}]);
        let fetcher = HttpFetcher::new(StubTransport::new(Reply::Value(rows.clone())));

        let result = fetcher.fetch("item1", "analytics", false).await;

        assert_eq!(result.total_count, 2);
        assert_eq!(Value::Array(result.items), rows);
        assert!(!result.last_updated.is_empty());
        let calls = fetcher.transport.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[(Endpoint::Analytics, "item1".to_string())]);
    }

    #[tokio::test]
    async fn test_transport_error_degrades_to_empty() {
        let fetcher = HttpFetcher::new(StubTransport::new(Reply::Fail));
        let result = fetcher.fetch("item2", "overview", true).await;
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 0);
        assert_well_formed(&result);
    }

    #[tokio::test]
    async fn test_non_transport_error_degrades_to_empty() {
        let fetcher = HttpFetcher::new(StubTransport::new(Reply::Broken));
        let result = fetcher.fetch("item1", "documents", false).await;
        assert!(result.items.is_empty());
        assert_well_formed(&result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_to_empty() {
        let fetcher = HttpFetcher::new(StubTransport::new(Reply::Hang));
        let started = tokio::time::Instant::now();

        let result = fetcher.fetch("item1", "settings", false).await;

        assert!(started.elapsed() >= DEFAULT_TIMEOUT);
        assert!(result.items.is_empty());
        assert_well_formed(&result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_tab_waits_then_returns_empty() {
        let fetcher = HttpFetcher::new(StubTransport::new(Reply::Value(json!([1]))))
            .with_unknown_tab_delay(Duration::from_millis(800));
        let started = tokio::time::Instant::now();

        let result = fetcher.fetch("item1", "coverage", false).await;

        assert!(started.elapsed() >= Duration::from_millis(800));
        assert!(result.items.is_empty());
        assert!(fetcher.transport.calls.lock().unwrap().is_empty());
    }
}
