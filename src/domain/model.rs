use serde::{Deserialize, Deserializer, Serialize};

/// Inputs of a single development pro-forma. Missing amounts default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrParams {
    pub land_cost: f64,
    pub hard_cost: f64,
    pub soft_cost: f64,
    pub loan_amount: f64,
    pub revenue: f64,
    pub development_months: i64,
    /// Annual construction loan rate in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
}

impl IrrParams {
    pub fn total_cost(&self) -> f64 {
        self.land_cost + self.hard_cost + self.soft_cost
    }
}

/// Return metrics in percent (irr, yield_on_cost, cash_on_cash) and as a ratio
/// (equity_multiple). A present `error` means the metrics were not computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrrResult {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub irr: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub yield_on_cost: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub equity_multiple: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub cash_on_cash: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IrrResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// Error responses may carry `null` metrics.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Default cost assumptions for a zoning code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultCosts {
    #[serde(default)]
    pub zoning_code: String,
    pub use_type: String,
    pub hard_cost_per_sf: f64,
    #[serde(default)]
    pub soft_cost_pct: f64,
    pub interest_rate: f64,
    pub sale_price_per_unit: f64,
    #[serde(default)]
    pub development_months: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_missing_fields_default_to_zero() {
        let params: IrrParams =
            serde_json::from_str(r#"{"land_cost": 500000, "revenue": 900000}"#).unwrap();
        assert_eq!(params.land_cost, 500000.0);
        assert_eq!(params.hard_cost, 0.0);
        assert_eq!(params.development_months, 0);
        assert_eq!(params.interest_rate, None);
    }

    #[test]
    fn test_result_omits_absent_error() {
        let ok = serde_json::to_value(IrrResult::default()).unwrap();
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(IrrResult::failed("boom")).unwrap();
        assert_eq!(failed["error"], "boom");
        assert_eq!(failed["irr"], 0.0);
    }

    #[test]
    fn test_result_accepts_null_metrics() {
        let result: IrrResult = serde_json::from_str(
            r#"{"irr": null, "yield_on_cost": null, "error": "Division by zero"}"#,
        )
        .unwrap();
        assert_eq!(result.irr, 0.0);
        assert_eq!(result.equity_multiple, 0.0);
        assert!(result.is_error());
    }

    #[test]
    fn test_default_costs_ignores_unknown_fields() {
        let costs: DefaultCosts = serde_json::from_value(serde_json::json!({
            "use_type": "General",
            "hard_cost_per_sf": 180,
            "interest_rate": 7.5,
            "sale_price_per_unit": 500000,
            "parking_ratio": 1.0
        }))
        .unwrap();
        assert_eq!(costs.use_type, "General");
        assert_eq!(costs.hard_cost_per_sf, 180.0);
        assert_eq!(costs.zoning_code, "");
    }
}
