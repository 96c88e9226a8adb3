use crate::domain::model::IrrParams;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "proforma")]
#[command(about = "Development pro-forma returns and zoning cost defaults")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Call the hosted RPC functions instead of the local engine
    #[arg(long)]
    pub remote: bool,

    /// Overrides service.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overrides service.api_key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute IRR, yield on cost, equity multiple and cash on cash
    CalcIrr(IrrArgs),
    /// Look up default cost assumptions for a zoning code
    DefaultCosts {
        /// Zoning code, e.g. RM15
        zoning: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct IrrArgs {
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub land_cost: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub hard_cost: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub soft_cost: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub loan_amount: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub revenue: f64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub development_months: i64,

    /// Annual loan rate in percent
    #[arg(long, allow_negative_numbers = true)]
    pub interest_rate: Option<f64>,
}

impl From<&IrrArgs> for IrrParams {
    fn from(args: &IrrArgs) -> Self {
        IrrParams {
            land_cost: args.land_cost,
            hard_cost: args.hard_cost,
            soft_cost: args.soft_cost,
            loan_amount: args.loan_amount,
            revenue: args.revenue,
            development_months: args.development_months,
            interest_rate: args.interest_rate,
        }
    }
}
