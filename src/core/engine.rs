use crate::core::irr::{self, IrrSettings, INVALID_INPUT};
use crate::core::zoning::ZoningTable;
use crate::domain::model::{DefaultCosts, IrrParams, IrrResult};
use crate::domain::ports::ProFormaService;
use crate::utils::error::Result;
use async_trait::async_trait;

/// In-process implementation of both pro-forma functions.
#[derive(Debug, Clone, Default)]
pub struct LocalEngine {
    settings: IrrSettings,
    zoning: ZoningTable,
}

impl LocalEngine {
    pub fn new(settings: IrrSettings, zoning: ZoningTable) -> Self {
        Self { settings, zoning }
    }

    /// Entry point matching the remote signature, where `params` is a
    /// JSON-encoded object. Malformed input becomes an `error` field.
    pub fn calc_irr_json(&self, params: &str) -> IrrResult {
        match serde_json::from_str::<IrrParams>(params) {
            Ok(parsed) => irr::calculate(&parsed, &self.settings),
            Err(e) => {
                tracing::debug!("Malformed calc_irr params: {}", e);
                IrrResult::failed(format!("{}: malformed JSON ({})", INVALID_INPUT, e))
            }
        }
    }
}

#[async_trait]
impl ProFormaService for LocalEngine {
    fn name(&self) -> &str {
        "local"
    }

    async fn calc_irr(&self, params: &IrrParams) -> Result<IrrResult> {
        Ok(irr::calculate(params, &self.settings))
    }

    async fn calc_irr_raw(&self, params: &str) -> Result<IrrResult> {
        Ok(self.calc_irr_json(params))
    }

    async fn get_default_costs(&self, zoning_input: &str) -> Result<DefaultCosts> {
        Ok(self.zoning.lookup(zoning_input))
    }
}
