use crate::core::irr::INVALID_INPUT;
use crate::domain::model::IrrParams;
use crate::domain::ports::ProFormaService;
use crate::utils::error::{ProFormaError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

const KNOWN_ZONING_CODE: &str = "RM15";
const UNKNOWN_ZONING_CODE: &str = "UNKNOWN_ZONE";

/// Behaviors every `ProFormaService` implementation must show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractCheck {
    ValidCalculation,
    DivideByZeroGuard,
    NegativeInputRejection,
    ExtremeValueClamp,
    MalformedJsonHandling,
    KnownZoningLookup,
    UnknownZoningFallback,
}

impl ContractCheck {
    pub const ALL: [ContractCheck; 7] = [
        ContractCheck::ValidCalculation,
        ContractCheck::DivideByZeroGuard,
        ContractCheck::NegativeInputRejection,
        ContractCheck::ExtremeValueClamp,
        ContractCheck::MalformedJsonHandling,
        ContractCheck::KnownZoningLookup,
        ContractCheck::UnknownZoningFallback,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContractCheck::ValidCalculation => "valid_calculation",
            ContractCheck::DivideByZeroGuard => "divide_by_zero_guard",
            ContractCheck::NegativeInputRejection => "negative_input_rejection",
            ContractCheck::ExtremeValueClamp => "extreme_value_clamp",
            ContractCheck::MalformedJsonHandling => "malformed_json_handling",
            ContractCheck::KnownZoningLookup => "known_zoning_lookup",
            ContractCheck::UnknownZoningFallback => "unknown_zoning_fallback",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|check| check.name() == name)
            .ok_or_else(|| ProFormaError::InvalidConfigValueError {
                field: "checks".to_string(),
                value: name.to_string(),
                reason: format!(
                    "Unknown check. Valid checks: {}",
                    Self::ALL.map(|c| c.name()).join(", ")
                ),
            })
    }

    /// `Ok` carries a short description of what was observed.
    pub async fn run(&self, service: &dyn ProFormaService) -> std::result::Result<String, String> {
        match self {
            ContractCheck::ValidCalculation => {
                let result = service
                    .calc_irr(&IrrParams {
                        land_cost: 500_000.0,
                        hard_cost: 2_000_000.0,
                        soft_cost: 400_000.0,
                        loan_amount: 2_175_000.0,
                        revenue: 3_500_000.0,
                        development_months: 18,
                        interest_rate: None,
                    })
                    .await
                    .map_err(|e| e.to_string())?;
                ensure(result.error.is_none(), || {
                    format!("unexpected error: {:?}", result.error)
                })?;
                ensure(result.irr > 0.0 && result.irr < 100.0, || {
                    format!("irr {} outside (0, 100)", result.irr)
                })?;
                ensure(result.equity_multiple > 1.0, || {
                    format!("equity_multiple {} not above 1", result.equity_multiple)
                })?;
                Ok(format!(
                    "irr {}, equity_multiple {}",
                    result.irr, result.equity_multiple
                ))
            }
            ContractCheck::DivideByZeroGuard => {
                let result = service
                    .calc_irr(&IrrParams::default())
                    .await
                    .map_err(|e| e.to_string())?;
                ensure(result.error.is_some(), || "no error field".to_string())?;
                ensure(result.irr == 0.0 && result.yield_on_cost == 0.0, || {
                    format!(
                        "irr {} / yield_on_cost {} not zeroed",
                        result.irr, result.yield_on_cost
                    )
                })?;
                Ok(result.error.unwrap_or_default())
            }
            ContractCheck::NegativeInputRejection => {
                let result = service
                    .calc_irr(&IrrParams {
                        land_cost: -100_000.0,
                        hard_cost: 2_000_000.0,
                        soft_cost: 400_000.0,
                        loan_amount: 2_175_000.0,
                        revenue: -500_000.0,
                        development_months: 18,
                        interest_rate: None,
                    })
                    .await
                    .map_err(|e| e.to_string())?;
                let error = result.error.unwrap_or_default();
                ensure(error.contains(INVALID_INPUT), || {
                    format!("error '{}' does not mention '{}'", error, INVALID_INPUT)
                })?;
                Ok(error)
            }
            ContractCheck::ExtremeValueClamp => {
                let result = service
                    .calc_irr(&IrrParams {
                        land_cost: 1_000.0,
                        hard_cost: 100.0,
                        soft_cost: 0.0,
                        loan_amount: 500.0,
                        revenue: 10_000_000.0,
                        development_months: 1,
                        interest_rate: None,
                    })
                    .await
                    .map_err(|e| e.to_string())?;
                if let Some(error) = result.error {
                    return Ok(format!("rejected: {}", error));
                }
                ensure((-100.0..=500.0).contains(&result.irr), || {
                    format!("irr {} outside [-100, 500]", result.irr)
                })?;
                Ok(format!("irr {}", result.irr))
            }
            ContractCheck::MalformedJsonHandling => match service.calc_irr_raw("invalid-json").await {
                Err(e) => Ok(format!("rejected at call boundary: {}", e)),
                Ok(result) => match result.error {
                    Some(error) => Ok(format!("reported: {}", error)),
                    None => Err("malformed params produced a result without error".to_string()),
                },
            },
            ContractCheck::KnownZoningLookup => {
                let costs = service
                    .get_default_costs(KNOWN_ZONING_CODE)
                    .await
                    .map_err(|e| e.to_string())?;
                ensure(costs.hard_cost_per_sf > 0.0, || {
                    format!("hard_cost_per_sf {} not positive", costs.hard_cost_per_sf)
                })?;
                Ok(format!(
                    "{}: {} at {}/sf",
                    KNOWN_ZONING_CODE, costs.use_type, costs.hard_cost_per_sf
                ))
            }
            ContractCheck::UnknownZoningFallback => {
                let costs = service
                    .get_default_costs(UNKNOWN_ZONING_CODE)
                    .await
                    .map_err(|e| e.to_string())?;
                ensure(
                    costs.use_type == "General"
                        && costs.hard_cost_per_sf == 180.0
                        && costs.interest_rate == 7.5,
                    || {
                        format!(
                            "got {} / {} / {}, expected General / 180 / 7.5",
                            costs.use_type, costs.hard_cost_per_sf, costs.interest_rate
                        )
                    },
                )?;
                Ok("fallback row".to_string())
            }
        }
    }
}

fn ensure(
    condition: bool,
    message: impl FnOnce() -> String,
) -> std::result::Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(message())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub check: ContractCheck,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub service: String,
    pub checked_at: DateTime<Utc>,
    pub outcomes: Vec<CheckOutcome>,
}

impl ContractReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Contract checks against {} ({})\n",
            self.service,
            self.checked_at.to_rfc3339()
        );
        for outcome in &self.outcomes {
            let mark = if outcome.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                mark,
                outcome.check.name(),
                outcome.detail
            ));
        }
        let passed = self.outcomes.iter().filter(|o| o.passed).count();
        out.push_str(&format!("{}/{} checks passed", passed, self.outcomes.len()));
        out
    }

    /// Turns a failing report into an error for callers that only need pass/fail.
    pub fn into_result(self) -> Result<Self> {
        if self.all_passed() {
            return Ok(self);
        }
        let names: Vec<&str> = self.failures().map(|o| o.check.name()).collect();
        Err(ProFormaError::ContractError {
            message: format!("{} failed against {}", names.join(", "), self.service),
        })
    }
}

/// Runs `checks` in order against `service`.
pub async fn run_checks(service: &dyn ProFormaService, checks: &[ContractCheck]) -> ContractReport {
    let mut outcomes = Vec::with_capacity(checks.len());
    for check in checks {
        let outcome = match check.run(service).await {
            Ok(detail) => {
                tracing::info!("✅ {} passed: {}", check.name(), detail);
                CheckOutcome {
                    check: *check,
                    passed: true,
                    detail,
                }
            }
            Err(detail) => {
                tracing::error!("❌ {} failed: {}", check.name(), detail);
                CheckOutcome {
                    check: *check,
                    passed: false,
                    detail,
                }
            }
        };
        outcomes.push(outcome);
    }

    ContractReport {
        service: service.name().to_string(),
        checked_at: Utc::now(),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::LocalEngine;

    #[tokio::test]
    async fn test_local_engine_satisfies_contract() {
        let report = run_checks(&LocalEngine::default(), &ContractCheck::ALL).await;
        let failures: Vec<_> = report.failures().collect();
        assert!(failures.is_empty(), "failures: {:?}", failures);
        assert_eq!(report.outcomes.len(), 7);
        assert_eq!(report.service, "local");
    }

    #[test]
    fn test_check_names_round_trip() {
        for check in ContractCheck::ALL {
            assert_eq!(ContractCheck::from_name(check.name()).unwrap(), check);
        }
        assert!(ContractCheck::from_name("nope").is_err());
    }

    #[test]
    fn test_failing_report_renders_and_errors() {
        let report = ContractReport {
            service: "remote".to_string(),
            checked_at: Utc::now(),
            outcomes: vec![
                CheckOutcome {
                    check: ContractCheck::ValidCalculation,
                    passed: true,
                    detail: "irr 40.13".to_string(),
                },
                CheckOutcome {
                    check: ContractCheck::UnknownZoningFallback,
                    passed: false,
                    detail: "got Retail".to_string(),
                },
            ],
        };

        let text = report.render_text();
        assert!(text.contains("[FAIL] unknown_zoning_fallback: got Retail"));
        assert!(text.ends_with("1/2 checks passed"));

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("unknown_zoning_fallback"));
    }
}
