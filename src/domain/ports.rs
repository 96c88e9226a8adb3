use crate::domain::model::{DefaultCosts, IrrParams, IrrResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The two pro-forma functions, served either remotely or in-process.
///
/// Calculation failures (bad inputs, zero denominators) are reported in
/// `IrrResult::error`; `Err` is reserved for transport and decoding failures.
#[async_trait]
pub trait ProFormaService: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    async fn calc_irr(&self, params: &IrrParams) -> Result<IrrResult>;

    /// Sends `params` verbatim as the JSON-encoded argument.
    async fn calc_irr_raw(&self, params: &str) -> Result<IrrResult>;

    async fn get_default_costs(&self, zoning_input: &str) -> Result<DefaultCosts>;
}
