//! Fixed growth assumptions: per-country annual growth components and
//! per-role demand multipliers.

use serde::Serialize;

/// Annual growth components for one country, as fractions (0.031 = 3.1%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthFactors {
    pub inflation: f64,
    pub demand_growth: f64,
    pub market_maturity: f64,
    pub tech_adoption: f64,
}

impl GrowthFactors {
    const fn new(inflation: f64, demand_growth: f64, market_maturity: f64, tech_adoption: f64) -> Self {
        Self { inflation, demand_growth, market_maturity, tech_adoption }
    }

    pub fn total(&self) -> f64 {
        self.inflation + self.demand_growth + self.market_maturity + self.tech_adoption
    }
}

/// Applied to countries outside the reference set.
pub const DEFAULT_GROWTH: GrowthFactors = GrowthFactors::new(0.035, 0.030, 0.025, 0.030);

pub fn growth_factors(country: &str) -> GrowthFactors {
    match country {
        "Germany" => GrowthFactors::new(0.031, 0.025, 0.015, 0.02),
        "Hungary" => GrowthFactors::new(0.040, 0.035, 0.025, 0.03),
        "Poland" => GrowthFactors::new(0.032, 0.030, 0.028, 0.025),
        "India" => GrowthFactors::new(0.055, 0.065, 0.045, 0.055),
        _ => DEFAULT_GROWTH,
    }
}

pub const ROLE_MULTIPLIERS: [(&str, f64); 9] = [
    ("DevOps Engineer", 1.0),
    ("Site Reliability Engineer", 1.15),
    ("Platform Engineer", 1.20),
    ("Cloud Engineer", 1.10),
    ("Infrastructure Engineer", 0.95),
    ("DevSecOps Engineer", 1.25),
    ("Automation Engineer", 1.05),
    ("Release Engineer", 0.90),
    ("Systems Engineer", 0.85),
];

/// Exact role-name lookup; unknown roles grow at the country rate.
pub fn role_multiplier(role: &str) -> f64 {
    ROLE_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == role)
        .map_or(1.0, |(_, m)| *m)
}

pub fn annual_growth(country: &str, role: &str) -> f64 {
    growth_factors(country).total() * role_multiplier(role)
}
