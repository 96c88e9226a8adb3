//! Development pro-forma returns.
//!
//! Equity goes in at month 0. The construction loan accrues simple interest
//! on its average drawn balance until the sale at `development_months`, when
//! the loan and interest are repaid and the remainder returns to equity.

use crate::domain::model::{IrrParams, IrrResult};
use serde::{Deserialize, Serialize};

/// Prefix of every input validation error.
pub const INVALID_INPUT: &str = "Invalid input parameters";

const SOLVER_MAX_ITERATIONS: u32 = 200;
const SOLVER_TOLERANCE: f64 = 1e-12;
/// Monthly rate standing in for -100%, where the discount factor is singular.
const MONTHLY_RATE_FLOOR: f64 = -0.999_999;
/// 100 years.
pub const MAX_DEVELOPMENT_MONTHS: i64 = 1200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrSettings {
    /// Annual rate in percent used when the request carries none.
    pub default_interest_rate: f64,
    /// Average share of the loan drawn over the development period.
    pub loan_draw_factor: f64,
    /// Annual IRR bounds in percent.
    pub irr_floor: f64,
    pub irr_cap: f64,
}

impl Default for IrrSettings {
    fn default() -> Self {
        Self {
            default_interest_rate: 7.5,
            loan_draw_factor: 0.5,
            irr_floor: -100.0,
            irr_cap: 500.0,
        }
    }
}

/// Outcome of a bracketed periodic IRR search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IrrSolve {
    Rate(f64),
    AboveRange,
    BelowRange,
}

pub fn calculate(params: &IrrParams, settings: &IrrSettings) -> IrrResult {
    if let Err(reason) = validate_inputs(params) {
        tracing::debug!("Rejected pro-forma inputs: {}", reason);
        return IrrResult::failed(format!("{}: {}", INVALID_INPUT, reason));
    }

    let total_cost = params.total_cost();
    if total_cost <= 0.0 {
        return IrrResult::failed("Division by zero: total cost must be greater than zero");
    }

    if params.development_months < 1 {
        return IrrResult::failed(format!(
            "{}: development_months must be at least 1",
            INVALID_INPUT
        ));
    }
    if !total_cost.is_finite() {
        return IrrResult::failed(format!("{}: total cost overflows", INVALID_INPUT));
    }

    let equity = total_cost - params.loan_amount;
    if equity <= 0.0 {
        return IrrResult::failed(
            "Division by zero: loan_amount covers the total cost, leaving no equity",
        );
    }

    let months = params.development_months as f64;
    let rate = params.interest_rate.unwrap_or(settings.default_interest_rate);
    let interest =
        params.loan_amount * rate / 100.0 * months / 12.0 * settings.loan_draw_factor;
    let all_in_cost = total_cost + interest;
    let profit = params.revenue - all_in_cost;
    let equity_proceeds = params.revenue - params.loan_amount - interest;

    if !(all_in_cost.is_finite() && equity_proceeds.is_finite()) {
        return IrrResult::failed(format!(
            "{}: amounts too large to compute returns",
            INVALID_INPUT
        ));
    }

    let yield_on_cost = profit / all_in_cost * 100.0;
    let equity_multiple = equity_proceeds / equity;
    let cash_on_cash = (equity_proceeds - equity) / equity / (months / 12.0) * 100.0;

    let cash_flows = [(0.0, -equity), (months, equity_proceeds)];
    let irr = annualized_irr(&cash_flows, settings);

    tracing::debug!(
        total_cost,
        interest,
        equity,
        equity_proceeds,
        irr,
        "Computed pro-forma returns"
    );

    let metrics = [irr, yield_on_cost, equity_multiple, cash_on_cash];
    if metrics.iter().any(|m| !m.is_finite()) {
        tracing::warn!("Non-finite pro-forma metrics: {:?}", metrics);
        return IrrResult::failed(format!(
            "{}: amounts too large to compute returns",
            INVALID_INPUT
        ));
    }

    IrrResult {
        irr: round2(irr),
        yield_on_cost: round2(yield_on_cost),
        equity_multiple: round2(equity_multiple),
        cash_on_cash: round2(cash_on_cash),
        error: None,
    }
}

fn validate_inputs(params: &IrrParams) -> std::result::Result<(), String> {
    let amounts = [
        ("land_cost", params.land_cost),
        ("hard_cost", params.hard_cost),
        ("soft_cost", params.soft_cost),
        ("loan_amount", params.loan_amount),
        ("revenue", params.revenue),
        ("interest_rate", params.interest_rate.unwrap_or(0.0)),
    ];

    let non_finite: Vec<&str> = amounts
        .iter()
        .filter(|(_, value)| !value.is_finite())
        .map(|(name, _)| *name)
        .collect();
    if !non_finite.is_empty() {
        return Err(format!("{} must be finite numbers", non_finite.join(", ")));
    }

    let mut negative: Vec<&str> = amounts
        .iter()
        .filter(|(_, value)| *value < 0.0)
        .map(|(name, _)| *name)
        .collect();
    if params.development_months < 0 {
        negative.push("development_months");
    }
    if !negative.is_empty() {
        return Err(format!("{} must not be negative", negative.join(", ")));
    }

    if params.development_months > MAX_DEVELOPMENT_MONTHS {
        return Err(format!(
            "development_months must be at most {}",
            MAX_DEVELOPMENT_MONTHS
        ));
    }

    Ok(())
}

/// Annual IRR in percent for `(month, amount)` flows, held within the configured bounds.
fn annualized_irr(cash_flows: &[(f64, f64)], settings: &IrrSettings) -> f64 {
    let upper = (1.0 + settings.irr_cap / 100.0).powf(1.0 / 12.0) - 1.0;
    let lower = if settings.irr_floor <= -100.0 {
        MONTHLY_RATE_FLOOR
    } else {
        (1.0 + settings.irr_floor / 100.0).powf(1.0 / 12.0) - 1.0
    };

    let annual = match periodic_irr(cash_flows, lower, upper) {
        IrrSolve::Rate(monthly) => ((1.0 + monthly).powi(12) - 1.0) * 100.0,
        IrrSolve::AboveRange => settings.irr_cap,
        IrrSolve::BelowRange => settings.irr_floor,
    };
    // max/min rather than clamp: clamp panics on NaN bounds.
    annual.max(settings.irr_floor).min(settings.irr_cap)
}

/// Net present value at a periodic `rate` of `(period, amount)` flows.
pub fn npv(rate: f64, cash_flows: &[(f64, f64)]) -> f64 {
    let factor = 1.0 + rate;
    cash_flows
        .iter()
        .map(|(t, cf)| cf / factor.powf(*t))
        .sum()
}

/// Bisection search for the periodic rate in `[lower, upper]` where the NPV
/// crosses zero. Assumes an outflow followed by inflows, so NPV falls as the
/// rate rises.
pub fn periodic_irr(cash_flows: &[(f64, f64)], lower: f64, upper: f64) -> IrrSolve {
    let npv_upper = npv(upper, cash_flows);
    if npv_upper > 0.0 {
        return IrrSolve::AboveRange;
    }
    let npv_lower = npv(lower, cash_flows);
    if npv_lower < 0.0 {
        return IrrSolve::BelowRange;
    }

    let (mut low, mut high) = (lower, upper);
    for _ in 0..SOLVER_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        if npv(mid, cash_flows) > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < SOLVER_TOLERANCE {
            break;
        }
    }
    IrrSolve::Rate((low + high) / 2.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
