pub mod store;

pub use crate::domain::model::{Company, CompanyInit, CompanyPayload};
pub use crate::domain::ports::{ApiClient, ApiResponse, ConfigProvider};
pub use crate::utils::error::{ServerError, StoreResult};
pub use store::CompanyStore;
