use crate::config::ClientConfig;
use crate::domain::model::Company;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "company-store")]
#[command(about = "Inspect and edit the current company through its REST API")]
pub struct CliConfig {
    #[arg(long, help = "TOML client configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "API base URL, overrides the configuration file")]
    pub base_url: Option<String>,

    #[arg(long, help = "Bearer token sent with every request")]
    pub token: Option<String>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Id of the company to work on")]
    pub company_id: Option<i64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the current company
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Drop the cached company and load it again
    Reload {
        #[arg(long)]
        json: bool,
    },
    /// Change fields of the current company and save it
    Update(CompanyEdits),
}

/// Field edits from the command line. An empty value clears the field.
#[derive(Debug, Clone, Default, Args)]
pub struct CompanyEdits {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub legal_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub vat_number: Option<String>,
    #[arg(long)]
    pub siret: Option<String>,
    #[arg(long)]
    pub registration_number: Option<String>,
    #[arg(long)]
    pub address_line1: Option<String>,
    #[arg(long)]
    pub address_line2: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub logo_url: Option<String>,
    #[arg(long)]
    pub currency_code: Option<String>,
    #[arg(long)]
    pub default_vat_rate_percentage: Option<f64>,
    #[arg(long)]
    pub timezone: Option<String>,
}

fn edit(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *target = Some(value.clone()).filter(|v| !v.is_empty());
    }
}

impl CompanyEdits {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.legal_name,
            &self.email,
            &self.phone,
            &self.website,
            &self.vat_number,
            &self.siret,
            &self.registration_number,
            &self.address_line1,
            &self.address_line2,
            &self.city,
            &self.postal_code,
            &self.country,
            &self.logo_url,
            &self.currency_code,
            &self.timezone,
        ]
        .iter()
        .all(|field| field.is_none())
            && self.default_vat_rate_percentage.is_none()
    }

    pub fn apply(&self, company: &mut Company) {
        if let Some(name) = &self.name {
            company.name = name.clone();
        }
        edit(&mut company.legal_name, &self.legal_name);
        edit(&mut company.email, &self.email);
        edit(&mut company.phone, &self.phone);
        edit(&mut company.website, &self.website);
        edit(&mut company.vat_number, &self.vat_number);
        edit(&mut company.siret, &self.siret);
        edit(&mut company.registration_number, &self.registration_number);
        edit(&mut company.address_line1, &self.address_line1);
        edit(&mut company.address_line2, &self.address_line2);
        edit(&mut company.city, &self.city);
        edit(&mut company.postal_code, &self.postal_code);
        edit(&mut company.country, &self.country);
        edit(&mut company.logo_url, &self.logo_url);
        edit(&mut company.currency_code, &self.currency_code);
        edit(&mut company.timezone, &self.timezone);
        if let Some(rate) = self.default_vat_rate_percentage {
            company.default_vat_rate_percentage = Some(rate);
        }
    }
}

impl CliConfig {
    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_seconds = Some(timeout);
        }
        if let Some(id) = self.company_id {
            config.company.id = id;
        }

        Ok(config)
    }
}
