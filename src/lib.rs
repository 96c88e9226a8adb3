pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::RpcClient;
pub use config::TomlConfig;
pub use core::{contract::ContractReport, engine::LocalEngine};
pub use domain::model::{DefaultCosts, IrrParams, IrrResult};
pub use domain::ports::ProFormaService;
pub use utils::error::{ProFormaError, Result};
