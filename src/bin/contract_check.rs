use clap::Parser;
use proforma_rpc::core::contract::{run_checks, ContractCheck};
use proforma_rpc::utils::{logger, validation::Validate};
use proforma_rpc::{ProFormaService, TomlConfig};

#[derive(Parser)]
#[command(name = "contract-check")]
#[command(about = "Check calc_irr / get_default_costs behavior against the expected contract")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "proforma.toml")]
    config: String,

    /// Run the checks against the local engine instead of the hosted functions
    #[arg(long)]
    local: bool,

    /// Overrides service.base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides service.api_key
    #[arg(long)]
    api_key: Option<String>,

    /// Only run these checks (comma separated)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        TomlConfig::from_file(&args.config)?
    } else {
        TomlConfig::default()
    };
    config.apply_overrides(args.base_url.clone(), args.api_key.clone());

    if config.json_logs() {
        logger::init_json_logger(args.verbose || config.verbose());
    } else {
        logger::init_cli_logger(args.verbose || config.verbose());
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let checks = if args.only.is_empty() {
        ContractCheck::ALL.to_vec()
    } else {
        args.only
            .iter()
            .map(|name| ContractCheck::from_name(name.trim()))
            .collect::<proforma_rpc::Result<Vec<_>>>()?
    };

    let service: Box<dyn ProFormaService> = if args.local {
        Box::new(config.local_engine())
    } else {
        match config.rpc_client() {
            Ok(client) => Box::new(client),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        }
    };

    tracing::info!("🚀 Running {} checks against {} service", checks.len(), service.name());
    let report = run_checks(service.as_ref(), &checks).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render_text());
    }

    if let Err(e) = report.into_result() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}
