use crate::utils::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

/// Decoded body of a successful HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

/// HTTP client the store talks through. Implementations fail on any
/// non-2xx response or transport error.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<ApiResponse, TransportError>;
    async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, TransportError>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn auth_token(&self) -> Option<&str>;
    fn extra_headers(&self) -> Vec<(String, String)>;
    fn company_id(&self) -> i64;
}
