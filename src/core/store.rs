use crate::domain::model::Company;
use crate::domain::ports::ApiClient;
use crate::utils::error::{ServerError, StoreResult, TransportError};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

const DOMAIN: &str = "company";

#[derive(Debug, Default)]
struct StoreState {
    company: Option<Company>,
    is_loading: bool,
    company_fetched: bool,
}

/// Holds the current company for one session and keeps it in sync with
/// the backend.
///
/// Cloning the store shares its state; build one per session and hand
/// clones to whatever needs it. The lock is never held across a request,
/// so overlapping calls are not serialized: whichever response lands last
/// decides `company` and the flags.
pub struct CompanyStore<A: ApiClient> {
    api: Arc<A>,
    state: Arc<RwLock<StoreState>>,
}

impl<A: ApiClient> Clone for CompanyStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

pub fn company_path(id: i64) -> String {
    format!("/api/v1/company/{}", id)
}

/// Bodies come either wrapped as `{ "data": ... }` or bare.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner) if !inner.is_null() => inner,
            Some(inner) => {
                map.insert("data".to_string(), inner);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

impl<A: ApiClient> CompanyStore<A> {
    pub fn new(api: A) -> Self {
        Self::with_shared_client(Arc::new(api))
    }

    pub fn with_shared_client(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Copy of the current company, if one is loaded.
    pub async fn company(&self) -> Option<Company> {
        self.state.read().await.company.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn has_company(&self) -> bool {
        self.state.read().await.company.is_some()
    }

    pub async fn is_company_fetched(&self) -> bool {
        self.state.read().await.company_fetched
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.is_loading = loading;
    }

    async fn request_company(&self, id: i64) -> Result<Company, TransportError> {
        let response = self.api.get(&company_path(id)).await?;
        Ok(Company::from_api(&unwrap_envelope(response.data)))
    }

    async fn send_company(&self, company: &Company) -> Result<Company, TransportError> {
        let payload = serde_json::to_value(company.to_api())?;
        let response = self
            .api
            .put(&company_path(company.id), json!({ "data": payload }))
            .await?;
        Ok(Company::from_api(&unwrap_envelope(response.data)))
    }

    /// Loads company `id` and makes it the current company.
    ///
    /// On failure the current company is left untouched and the error
    /// carries `{"id": id}`.
    pub async fn fetch_company(&self, id: i64) -> StoreResult<Company> {
        self.set_loading(true).await;
        tracing::debug!("Fetching company {}", id);

        let outcome = self.request_company(id).await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match outcome {
            Ok(company) => {
                tracing::info!("Loaded company {} ({})", company.id, company.display_name());
                state.company = Some(company.clone());
                state.company_fetched = true;
                Ok(company)
            }
            Err(cause) => {
                drop(state);
                tracing::warn!("Fetching company {} failed: {}", id, cause);
                Err(ServerError::new(
                    DOMAIN,
                    "fetchCompany",
                    cause,
                    json!({ "id": id }),
                ))
            }
        }
    }

    /// Returns the cached company once a fetch has succeeded, otherwise
    /// fetches it. The cache is per session, not per id.
    pub async fn ensure_company_fetched(&self, id: i64) -> StoreResult<Company> {
        {
            let state = self.state.read().await;
            if state.company_fetched {
                if let Some(company) = &state.company {
                    tracing::debug!("Company already fetched, skipping request");
                    return Ok(company.clone());
                }
            }
        }
        self.fetch_company(id).await
    }

    /// Drops the cached company and fetches it again.
    pub async fn force_reload(&self, id: i64) -> StoreResult<Company> {
        {
            let mut state = self.state.write().await;
            state.company = None;
            state.company_fetched = false;
        }
        tracing::debug!("Cache cleared, reloading company {}", id);
        self.fetch_company(id).await
    }

    /// Saves `company` with a `PUT` addressed by its id and replaces the
    /// current company with what the server returns.
    pub async fn update_company(&self, company: &Company) -> StoreResult<Company> {
        self.set_loading(true).await;
        tracing::debug!("Updating company {}", company.id);

        let outcome = self.send_company(company).await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match outcome {
            Ok(updated) => {
                tracing::info!("Updated company {}", updated.id);
                state.company = Some(updated.clone());
                Ok(updated)
            }
            Err(cause) => {
                drop(state);
                tracing::warn!("Updating company {} failed: {}", company.id, cause);
                let company_data = serde_json::to_value(company).unwrap_or(Value::Null);
                Err(ServerError::new(
                    DOMAIN,
                    "updateCompany",
                    cause,
                    json!({ "companyData": company_data }),
                ))
            }
        }
    }
}
