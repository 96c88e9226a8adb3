//! Client for the hosted `calc_irr` / `get_default_costs` functions, exposed
//! as PostgREST RPC endpoints under `/rest/v1/rpc/<function>`.

use crate::domain::model::{DefaultCosts, IrrParams, IrrResult};
use crate::domain::ports::ProFormaService;
use crate::utils::error::{ProFormaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const CALC_IRR: &str = "calc_irr";
pub const GET_DEFAULT_COSTS: &str = "get_default_costs";

#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RpcClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// Invokes `function` with named arguments and decodes the JSON reply.
    pub async fn call<T: DeserializeOwned>(&self, function: &str, args: &Value) -> Result<T> {
        let url = self.rpc_url(function);
        tracing::debug!("Calling RPC {} at {}", function, url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("RPC {} response status: {}", function, status);

        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!("RPC {} failed with HTTP {}: {}", function, status, message);
            return Err(ProFormaError::RpcError {
                function: function.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// PostgREST errors carry `{code, details, hint, message}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ProFormaService for RpcClient {
    fn name(&self) -> &str {
        "remote"
    }

    async fn calc_irr(&self, params: &IrrParams) -> Result<IrrResult> {
        let encoded = serde_json::to_string(params)?;
        self.calc_irr_raw(&encoded).await
    }

    async fn calc_irr_raw(&self, params: &str) -> Result<IrrResult> {
        self.call(CALC_IRR, &serde_json::json!({ "params": params }))
            .await
    }

    async fn get_default_costs(&self, zoning_input: &str) -> Result<DefaultCosts> {
        self.call(GET_DEFAULT_COSTS, &serde_json::json!({ "zoning_input": zoning_input }))
            .await
    }
}
