use crate::domain::ports::{ApiClient, ApiResponse, ConfigProvider};
use crate::utils::error::TransportError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// `reqwest`-backed [`ApiClient`] for the company REST backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpApiClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            token: config.auth_token().map(str::to_string),
            headers: config.extra_headers(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request.header(ACCEPT, "application/json");
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode(response: Response) -> Result<ApiResponse, TransportError> {
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);
        let response = self.prepare(self.client.get(url)).send().await?;
        Self::decode(response).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, TransportError> {
        let url = self.url(path)?;
        tracing::debug!("PUT {}", url);
        let response = self.prepare(self.client.put(url).json(&body)).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpApiClient {
        let mut config = ClientConfig::new(server.base_url());
        config.api.token = Some("secret".to_string());
        config.api.headers = Some([("X-Tenant".to_string(), "acme".to_string())].into());
        HttpApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_auth_and_decodes_json() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/company/1")
                .header("authorization", "Bearer secret")
                .header("x-tenant", "acme")
                .header("accept", "application/json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"data": {"id": 1}}));
        });

        let response = client_for(&server).get("/api/v1/company/1").await.unwrap();

        api_mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.data, json!({"data": {"id": 1}}));
    }

    #[tokio::test]
    async fn test_put_sends_json_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/v1/company/4")
                .json_body(json!({"data": {"name": "Acme"}}));
            then.status(200).json_body(json!({"id": 4, "name": "Acme"}));
        });

        let response = client_for(&server)
            .put("/api/v1/company/4", json!({"data": {"name": "Acme"}}))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(response.data["name"], "Acme");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/company/9");
            then.status(404).body("no such company");
        });

        let err = client_for(&server)
            .get("/api/v1/company/9")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        match err {
            TransportError::Status { body, .. } => assert_eq!(body, "no such company"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_null() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(204);
        });

        let response = client_for(&server).get("empty").await.unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_json_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(200).body("<html>");
        });

        let err = client_for(&server).get("/broken").await.unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
