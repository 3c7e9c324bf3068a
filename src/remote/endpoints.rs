// Tab data endpoints.
// Maps tab ids to remote paths and fetches raw payloads for an item.

use serde_json::Value;

use crate::error::Result;
use crate::registry::defaults::{ANALYTICS, DOCUMENTS, OVERVIEW, SETTINGS, TEAM};

use super::client::RemoteClient;
use super::payload::Payload;

/// A remote endpoint serving one tab's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Overview,
    Team,
    Analytics,
    Documents,
    Settings,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Overview,
        Endpoint::Team,
        Endpoint::Analytics,
        Endpoint::Documents,
        Endpoint::Settings,
    ];

    /// Endpoint serving the given tab, if any.
    pub fn from_tab_id(tab_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.tab_id() == tab_id)
    }

    pub fn tab_id(&self) -> &'static str {
        match self {
            Endpoint::Overview => OVERVIEW,
            Endpoint::Team => TEAM,
            Endpoint::Analytics => ANALYTICS,
            Endpoint::Documents => DOCUMENTS,
            Endpoint::Settings => SETTINGS,
        }
    }

    /// Request path relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Overview => "/overview",
            Endpoint::Team => "/team",
            Endpoint::Analytics => "/analytics",
            Endpoint::Documents => "/documents",
            Endpoint::Settings => "/settings1",
        }
    }

    /// Decode a raw response body from this endpoint.
    pub fn decode(&self, value: Value) -> Result<Payload> {
        Payload::decode(value)
    }
}

impl RemoteClient {
    /// Fetch the raw JSON payload for an item from a tab endpoint.
    /// An empty body decodes as null.
    pub async fn get_tab_payload(&self, endpoint: Endpoint, item_id: &str) -> Result<Value> {
        let params = [("id", item_id)];
        let response = self.get_with_params(endpoint.path(), &params).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TileError;
    use crate::remote::{DataFetcher, HttpFetcher};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Answer one request with a canned HTTP response and report its request line.
    async fn serve_once(status: &str, body: &str) -> (RemoteClient, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let text = String::from_utf8_lossy(&request);
            let _ = tx.send(text.lines().next().unwrap_or_default().to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = RemoteClient::new(&format!("http://{}", addr)).unwrap();
        (client, rx)
    }

    #[tokio::test]
    async fn test_body_is_parsed_and_id_sent() {
        let (client, request) = serve_once("200 OK", r#"{"data":[{"setting":"theme"}]}"#).await;

        let value = client.get_tab_payload(Endpoint::Settings, "item2").await.unwrap();

        assert_eq!(value["data"][0]["setting"], "theme");
        assert_eq!(request.await.unwrap(), "GET /settings1?id=item2 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let (client, _request) = serve_once("200 OK", "").await;
        let value = client.get_tab_payload(Endpoint::Overview, "item1").await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_json_is_json_error() {
        let (client, _request) = serve_once("200 OK", "{not json").await;
        let err = client.get_tab_payload(Endpoint::Team, "item1").await.unwrap_err();
        assert!(matches!(err, TileError::Json(_)), "{err:?}");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (client, _request) = serve_once("503 Service Unavailable", "").await;
        let err = client.get_tab_payload(Endpoint::Documents, "item3").await.unwrap_err();
        match err {
            TileError::Status { status, url } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
                assert!(url.ends_with("/documents?id=item3"), "{url}");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_fetcher_degrades_server_error() {
        let (client, _request) = serve_once("500 Internal Server Error", "oops").await;
        let result = HttpFetcher::new(client).fetch("item1", "team", false).await;
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 0);
        assert!(!result.last_updated.is_empty());
    }

    #[test]
    fn test_every_endpoint_round_trips_tab_id() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::from_tab_id(endpoint.tab_id()), Some(endpoint));
        }
        assert_eq!(Endpoint::from_tab_id("coverage"), None);
    }

    #[test]
    fn test_settings_path() {
        assert_eq!(Endpoint::Settings.path(), "/settings1");
        assert_eq!(Endpoint::Team.path(), "/team");
    }
}
