use anyhow::{bail, Context};
use clap::Parser;
use company_store::domain::ports::ConfigProvider;
use company_store::utils::{logger, validation::Validate};
use company_store::{CliConfig, Command, Company, CompanyStore, HttpApiClient, ServerError};

fn print_company(company: &Company, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(company)?);
        return Ok(());
    }

    println!("🏢 {} (#{})", company.display_name(), company.id);
    if company.display_name() != company.name {
        println!("   Name:     {}", company.name);
    }
    let address = company.full_address();
    if !address.is_empty() {
        println!("   Address:  {}", address);
    }
    let fields = [
        ("Email", &company.email),
        ("Phone", &company.phone),
        ("Website", &company.website),
        ("VAT", &company.vat_number),
        ("SIRET", &company.siret),
        ("Currency", &company.currency_code),
        ("Timezone", &company.timezone),
    ];
    for (label, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            println!("   {:<9} {}", format!("{}:", label), value);
        }
    }
    if let Some(rate) = company.default_vat_rate_percentage {
        println!("   VAT rate: {}%", rate);
    }
    if let Some(updated_at) = company.updated_at {
        println!("   Updated:  {}", updated_at.to_rfc3339());
    }
    Ok(())
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = cli.client_config().context("loading configuration")?;
    config.validate().context("invalid configuration")?;
    tracing::debug!(
        "Client config: base_url={}, company_id={}",
        config.base_url(),
        config.company_id()
    );

    let client = HttpApiClient::new(&config).context("building HTTP client")?;
    let store = CompanyStore::new(client);
    let id = config.company_id();

    match &cli.command {
        Command::Show { json } => {
            let company = store.ensure_company_fetched(id).await?;
            print_company(&company, *json)?;
        }
        Command::Reload { json } => {
            let company = store.force_reload(id).await?;
            print_company(&company, *json)?;
        }
        Command::Update(edits) => {
            if edits.is_empty() {
                bail!("nothing to update, pass at least one field flag");
            }

            let mut draft = store.ensure_company_fetched(id).await?;
            edits.apply(&mut draft);
            if !draft.is_valid() {
                bail!("company name cannot be empty");
            }

            let updated = store.update_company(&draft).await?;
            tracing::info!("✅ Company {} saved", updated.id);
            print_company(&updated, false)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(&cli).await {
        match e.downcast_ref::<ServerError>() {
            Some(server) => tracing::error!(
                "❌ {}.{} failed (status: {:?}, params: {})",
                server.domain,
                server.operation,
                server.status(),
                server.params
            ),
            None => tracing::error!("❌ {:#}", e),
        }
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
