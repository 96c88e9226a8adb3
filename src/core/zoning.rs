use crate::domain::model::DefaultCosts;
use std::collections::HashMap;

pub const FALLBACK_USE_TYPE: &str = "General";

/// (code, use_type, hard_cost_per_sf, soft_cost_pct, interest_rate, sale_price_per_unit, months)
type Row = (&'static str, &'static str, f64, f64, f64, f64, i64);

const BUILTIN_ROWS: &[Row] = &[
    ("SF5000", "Single Family", 240.0, 18.0, 7.25, 1_150_000.0, 12),
    ("SF7200", "Single Family", 235.0, 18.0, 7.25, 1_250_000.0, 12),
    ("RSL", "Residential Small Lot", 250.0, 20.0, 7.25, 875_000.0, 14),
    ("LR1", "Lowrise Residential", 255.0, 20.0, 7.5, 725_000.0, 16),
    ("LR2", "Lowrise Residential", 260.0, 20.0, 7.5, 690_000.0, 16),
    ("LR3", "Lowrise Residential", 265.0, 22.0, 7.5, 650_000.0, 18),
    ("RM15", "Multifamily", 275.0, 22.0, 7.5, 625_000.0, 18),
    ("RM25", "Multifamily", 285.0, 22.0, 7.5, 600_000.0, 20),
    ("RM35", "Multifamily", 295.0, 24.0, 7.75, 575_000.0, 22),
    ("MR", "Midrise Residential", 320.0, 25.0, 7.75, 560_000.0, 24),
    ("NC2", "Mixed Use", 330.0, 25.0, 8.0, 585_000.0, 24),
    ("NC3", "Mixed Use", 345.0, 25.0, 8.0, 600_000.0, 26),
    ("C1", "Commercial", 260.0, 20.0, 8.25, 450_000.0, 18),
    ("C2", "Commercial", 250.0, 20.0, 8.25, 425_000.0, 18),
    ("IG1", "Industrial", 165.0, 15.0, 8.0, 350_000.0, 12),
    ("IG2", "Industrial", 155.0, 15.0, 8.0, 325_000.0, 12),
];

/// Returned for any code the table does not know.
pub fn fallback_costs() -> DefaultCosts {
    DefaultCosts {
        zoning_code: String::new(),
        use_type: FALLBACK_USE_TYPE.to_string(),
        hard_cost_per_sf: 180.0,
        soft_cost_pct: 20.0,
        interest_rate: 7.5,
        sale_price_per_unit: 500_000.0,
        development_months: 18,
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[derive(Debug, Clone)]
pub struct ZoningTable {
    rows: HashMap<String, DefaultCosts>,
}

impl ZoningTable {
    pub fn empty() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// Adds or replaces a row, keyed by its normalized `zoning_code`.
    pub fn insert(&mut self, mut costs: DefaultCosts) {
        let code = normalize_code(&costs.zoning_code);
        costs.zoning_code = code.clone();
        self.rows.insert(code, costs);
    }

    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = DefaultCosts>) -> Self {
        for costs in overrides {
            tracing::debug!("Zoning override for {}", costs.zoning_code);
            self.insert(costs);
        }
        self
    }

    pub fn get(&self, code: &str) -> Option<&DefaultCosts> {
        self.rows.get(&normalize_code(code))
    }

    pub fn lookup(&self, code: &str) -> DefaultCosts {
        match self.get(code) {
            Some(costs) => costs.clone(),
            None => {
                tracing::debug!("Unknown zoning code '{}', using fallback costs", code);
                DefaultCosts {
                    zoning_code: normalize_code(code),
                    ..fallback_costs()
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for ZoningTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for &(code, use_type, hard, soft_pct, rate, sale, months) in BUILTIN_ROWS {
            table.insert(DefaultCosts {
                zoning_code: code.to_string(),
                use_type: use_type.to_string(),
                hard_cost_per_sf: hard,
                soft_cost_pct: soft_pct,
                interest_rate: rate,
                sale_price_per_unit: sale,
                development_months: months,
            });
        }
        table
    }
}
