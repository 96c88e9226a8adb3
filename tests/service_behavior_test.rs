use anyhow::Result;
use proforma_rpc::core::irr::IrrSettings;
use proforma_rpc::core::zoning::ZoningTable;
use proforma_rpc::{IrrParams, LocalEngine, ProFormaService};

fn service() -> Box<dyn ProFormaService> {
    Box::new(LocalEngine::new(IrrSettings::default(), ZoningTable::default()))
}

fn params(json: serde_json::Value) -> IrrParams {
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn test_valid_calculation() -> Result<()> {
    let result = service()
        .calc_irr(&params(serde_json::json!({
            "land_cost": 500000,
            "hard_cost": 2000000,
            "soft_cost": 400000,
            "loan_amount": 2175000,
            "revenue": 3500000,
            "development_months": 18
        })))
        .await?;

    let value = serde_json::to_value(&result)?;
    for field in ["irr", "yield_on_cost", "equity_multiple", "cash_on_cash"] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert!(value.get("error").is_none());
    assert!(result.irr > 0.0 && result.irr < 100.0);
    assert!(result.equity_multiple > 1.0);
    Ok(())
}

#[tokio::test]
async fn test_divide_by_zero_edge_case() -> Result<()> {
    let result = service()
        .calc_irr_raw(
            r#"{"land_cost": 0, "hard_cost": 0, "soft_cost": 0,
                "loan_amount": 0, "revenue": 0, "development_months": 0}"#,
        )
        .await?;

    assert!(result.error.is_some());
    assert_eq!(result.irr, 0.0);
    assert_eq!(result.yield_on_cost, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_negative_values() -> Result<()> {
    let result = service()
        .calc_irr(&params(serde_json::json!({
            "land_cost": -100000,
            "hard_cost": 2000000,
            "soft_cost": 400000,
            "loan_amount": 2175000,
            "revenue": -500000,
            "development_months": 18
        })))
        .await?;

    assert!(result
        .error
        .as_deref()
        .is_some_and(|e| e.contains("Invalid input parameters")));
    Ok(())
}

#[tokio::test]
async fn test_extreme_values() -> Result<()> {
    let result = service()
        .calc_irr(&params(serde_json::json!({
            "land_cost": 1000,
            "hard_cost": 100,
            "soft_cost": 0,
            "loan_amount": 500,
            "revenue": 10000000,
            "development_months": 1
        })))
        .await?;

    if result.error.is_none() {
        assert!(result.irr <= 500.0);
        assert!(result.irr >= -100.0);
    }
    Ok(())
}

#[tokio::test]
async fn test_json_malformed() -> Result<()> {
    match service().calc_irr_raw("invalid-json").await {
        Ok(result) => assert!(result.error.is_some()),
        Err(_) => {}
    }
    Ok(())
}

#[tokio::test]
async fn test_params_may_be_partial() -> Result<()> {
    // Missing amounts count as zero: no land, so equity comes from hard costs only.
    let result = service()
        .calc_irr_raw(r#"{"hard_cost": 1000000, "revenue": 1500000, "development_months": 12}"#)
        .await?;
    assert!(result.error.is_none());
    assert_eq!(result.equity_multiple, 1.5);
    Ok(())
}

#[tokio::test]
async fn test_known_zoning_lookup() -> Result<()> {
    let costs = service().get_default_costs("RM15").await?;

    let value = serde_json::to_value(&costs)?;
    for field in ["hard_cost_per_sf", "interest_rate", "sale_price_per_unit"] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert!(costs.hard_cost_per_sf > 0.0);
    Ok(())
}

#[tokio::test]
async fn test_unknown_zoning_fallback() -> Result<()> {
    let costs = service().get_default_costs("UNKNOWN_ZONE").await?;

    assert_eq!(costs.use_type, "General");
    assert_eq!(costs.hard_cost_per_sf, 180.0);
    assert_eq!(costs.interest_rate, 7.5);
    Ok(())
}
