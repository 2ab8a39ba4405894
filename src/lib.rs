pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::HttpApiClient;
pub use config::ClientConfig;
pub use crate::core::store::CompanyStore;
pub use domain::model::{Company, CompanyInit, CompanyPayload};
pub use utils::error::{Result, ServerError, StoreError, StoreResult, TransportError};
