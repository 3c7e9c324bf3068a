// Remote data source HTTP client.
// Builds requests against the configured base URL and checks response status.

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Result, TileError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client for the tab data endpoints.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    /// Create a new client rooted at the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("tiledeck-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(TileError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(params)
            .send()
            .await
            .map_err(TileError::Http)?;

        Self::check_response(response)
    }

    /// Check response status and convert errors.
    fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(TileError::Status {
                status,
                url: response.url().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = RemoteClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/team"), "http://localhost:8000/team");
    }

    #[test]
    fn test_default_base_url() {
        let client = RemoteClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.url("/overview"), "http://localhost:8000/overview");
    }
}
