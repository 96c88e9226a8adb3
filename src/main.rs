use clap::Parser;
use proforma_rpc::config::{CliConfig, Command};
use proforma_rpc::utils::error::{ErrorSeverity, ProFormaError};
use proforma_rpc::utils::{logger, validation::Validate};
use proforma_rpc::{DefaultCosts, IrrParams, IrrResult, ProFormaService, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };
    config.apply_overrides(cli.base_url.clone(), cli.api_key.clone());

    let verbose = cli.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let service: Box<dyn ProFormaService> = if cli.remote {
        match config.rpc_client() {
            Ok(client) => Box::new(client),
            Err(e) => exit_with(&e),
        }
    } else {
        Box::new(config.local_engine())
    };
    tracing::info!("Using {} service", service.name());

    match run(service.as_ref(), &cli).await {
        Ok(()) => Ok(()),
        Err(e) => exit_with(&e),
    }
}

async fn run(service: &dyn ProFormaService, cli: &CliConfig) -> proforma_rpc::Result<()> {
    match &cli.command {
        Command::CalcIrr(args) => {
            let params = IrrParams::from(args);
            let result = service.calc_irr(&params).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_irr(&result);
            }
            if result.is_error() {
                std::process::exit(2);
            }
        }
        Command::DefaultCosts { zoning } => {
            let costs = service.get_default_costs(zoning).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&costs)?);
            } else {
                print_costs(zoning, &costs);
            }
        }
    }
    Ok(())
}

fn print_irr(result: &IrrResult) {
    if let Some(error) = &result.error {
        println!("❌ {}", error);
        return;
    }
    println!("IRR:             {:>10.2}%", result.irr);
    println!("Yield on cost:   {:>10.2}%", result.yield_on_cost);
    println!("Equity multiple: {:>10.2}x", result.equity_multiple);
    println!("Cash on cash:    {:>10.2}%", result.cash_on_cash);
}

fn print_costs(zoning: &str, costs: &DefaultCosts) {
    println!("Zoning {} ({})", zoning, costs.use_type);
    println!("  Hard cost:      {:>12.2} /sf", costs.hard_cost_per_sf);
    println!("  Soft cost:      {:>12.2} % of hard", costs.soft_cost_pct);
    println!("  Interest rate:  {:>12.2} %", costs.interest_rate);
    println!("  Sale price:     {:>12.0} /unit", costs.sale_price_per_unit);
    println!("  Development:    {:>12} months", costs.development_months);
}

fn exit_with(e: &ProFormaError) -> ! {
    tracing::error!(
        "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 2,
        ErrorSeverity::Medium => 3,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 4,
    };
    std::process::exit(exit_code);
}
