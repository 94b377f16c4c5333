//! Reference catalog: fixed per-country economic and legal records and the
//! synthetic demo salary grid used whenever an upload cannot be reconciled.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::model::{
    distinct, DataSource, EconomicRow, LegalRow, Reconciled, SalaryRow, TeamSetup,
    WorkforceSentiment,
};

/// Countries with catalog entries, in demo-grid order.
pub const REFERENCE_COUNTRIES: [&str; 4] = ["Germany", "Hungary", "Poland", "India"];

/// Demo grid base salary per country.
pub const DEMO_BASE_SALARIES: [(&str, f64); 4] = [
    ("Germany", 70000.0),
    ("Hungary", 45000.0),
    ("Poland", 50000.0),
    ("India", 25000.0),
];

/// Demo grid roles and their salary multipliers.
pub const DEMO_ROLES: [(&str, f64); 4] = [
    ("DevOps Engineer", 1.0),
    ("Site Reliability Engineer", 1.15),
    ("Platform Engineer", 1.20),
    ("Cloud Engineer", 1.10),
];

pub const DEMO_TEAM_SETUPS: [TeamSetup; 3] = [TeamSetup::OnSite, TeamSetup::Hybrid, TeamSetup::Remote];

pub const DEMO_MIN_FACTOR: f64 = 0.85;
pub const DEMO_MAX_FACTOR: f64 = 1.15;

/// Fixed euro-to-dollar approximation applied to euro-denominated surveys.
pub const EUR_TO_USD: f64 = 1.1;
pub const EUR_MIN_FACTOR: f64 = 0.9;
pub const EUR_MAX_FACTOR: f64 = 1.3;

struct EconomicDefaults {
    inflation_rate: f64,
    ppp_adjustment: f64,
    gdp_growth: f64,
    cost_of_living_index: f64,
}

struct LegalDefaults {
    labor_laws: &'static str,
    tax_implications: &'static str,
    workforce_sentiment: WorkforceSentiment,
}

static ECONOMIC: Lazy<HashMap<&'static str, EconomicDefaults>> = Lazy::new(|| {
    let entry = |inflation_rate, ppp_adjustment, gdp_growth, cost_of_living_index| EconomicDefaults {
        inflation_rate,
        ppp_adjustment,
        gdp_growth,
        cost_of_living_index,
    };
    HashMap::from([
        ("Germany", entry(3.1, 1.0, 1.5, 110.0)),
        ("Hungary", entry(4.0, 0.6, 2.5, 70.0)),
        ("Poland", entry(3.2, 0.65, 3.0, 75.0)),
        ("India", entry(5.5, 0.3, 6.5, 45.0)),
    ])
});

static LEGAL: Lazy<HashMap<&'static str, LegalDefaults>> = Lazy::new(|| {
    HashMap::from([
        (
            "Germany",
            LegalDefaults {
                labor_laws: "Strong worker protection, comprehensive benefits",
                tax_implications: "Progressive tax system (14-45%), social security contributions",
                workforce_sentiment: WorkforceSentiment::Positive,
            },
        ),
        (
            "Hungary",
            LegalDefaults {
                labor_laws: "EU-compliant labor regulations, flexible working arrangements",
                tax_implications: "Flat 15% personal income tax, social contributions",
                workforce_sentiment: WorkforceSentiment::Neutral,
            },
        ),
        (
            "Poland",
            LegalDefaults {
                labor_laws: "EU standards, growing tech sector protections",
                tax_implications: "Progressive tax (17-32%), social contributions",
                workforce_sentiment: WorkforceSentiment::Positive,
            },
        ),
        (
            "India",
            LegalDefaults {
                labor_laws: "Complex regulations, varying by state",
                tax_implications: "Progressive tax (5-30%), allowances and deductions",
                workforce_sentiment: WorkforceSentiment::VeryPositive,
            },
        ),
    ])
});

/// Catalog economic record, `None` for countries outside the reference set.
pub fn default_economic(country: &str) -> Option<EconomicRow> {
    ECONOMIC.get(country).map(|e| EconomicRow {
        country: country.to_string(),
        inflation_rate: Some(e.inflation_rate),
        ppp_adjustment: Some(e.ppp_adjustment),
        gdp_growth: Some(e.gdp_growth),
        cost_of_living_index: Some(e.cost_of_living_index),
    })
}

/// Catalog legal record, `None` for countries outside the reference set.
pub fn default_legal(country: &str) -> Option<LegalRow> {
    LEGAL.get(country).map(|l| LegalRow {
        country: country.to_string(),
        labor_laws: Some(l.labor_laws.to_string()),
        tax_implications: Some(l.tax_implications.to_string()),
        workforce_sentiment: Some(l.workforce_sentiment.clone()),
    })
}

/// Economic records for `countries` in input order; unknown and repeated
/// countries are skipped.
pub fn default_economic_for<'a>(countries: impl IntoIterator<Item = &'a str>) -> Vec<EconomicRow> {
    distinct(countries)
        .into_iter()
        .filter_map(default_economic)
        .collect()
}

/// Legal records for `countries` in input order; unknown and repeated
/// countries are skipped.
pub fn default_legal_for<'a>(countries: impl IntoIterator<Item = &'a str>) -> Vec<LegalRow> {
    distinct(countries)
        .into_iter()
        .filter_map(default_legal)
        .collect()
}

/// Demo salary grid: country × role × team setup, 48 rows.
pub fn default_salary_grid() -> Vec<SalaryRow> {
    let mut rows = Vec::with_capacity(DEMO_BASE_SALARIES.len() * DEMO_ROLES.len() * DEMO_TEAM_SETUPS.len());
    for (country, base_salary) in DEMO_BASE_SALARIES {
        for (role, multiplier) in DEMO_ROLES {
            for setup in &DEMO_TEAM_SETUPS {
                let avg = base_salary * multiplier;
                rows.push(SalaryRow {
                    role: role.to_string(),
                    country: country.to_string(),
                    team_setup: Some(setup.clone()),
                    salary_min: Some(avg * DEMO_MIN_FACTOR),
                    salary_max: Some(avg * DEMO_MAX_FACTOR),
                    salary_avg: avg,
                });
            }
        }
    }
    rows
}

/// The guaranteed non-empty fallback dataset.
pub fn default_full_dataset() -> Reconciled {
    Reconciled {
        shape: None,
        source: DataSource::Defaults,
        fallback_reason: None,
        salary: default_salary_grid(),
        economic: default_economic_for(REFERENCE_COUNTRIES),
        legal: default_legal_for(REFERENCE_COUNTRIES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_country_has_no_record() {
        assert!(default_economic("Atlantis").is_none());
        assert!(default_legal("Atlantis").is_none());
        assert!(default_economic("germany").is_none());
    }

    #[test]
    fn economic_values() {
        let hu = default_economic("Hungary").unwrap();
        assert_eq!(hu.inflation_rate, Some(4.0));
        assert_eq!(hu.ppp_adjustment, Some(0.6));
        assert_eq!(hu.gdp_growth, Some(2.5));
        assert_eq!(hu.cost_of_living_index, Some(70.0));
    }

    #[test]
    fn legal_sentiment() {
        let india = default_legal("India").unwrap();
        assert_eq!(india.workforce_sentiment, Some(WorkforceSentiment::VeryPositive));
        let hu = default_legal("Hungary").unwrap();
        assert_eq!(hu.workforce_sentiment, Some(WorkforceSentiment::Neutral));
    }

    #[test]
    fn lookups_keep_order_and_skip_unknown_and_repeats() {
        let rows = default_economic_for(["Poland", "Atlantis", "Germany", "Poland"]);
        let countries: Vec<_> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["Poland", "Germany"]);
    }

    #[test]
    fn grid_is_48_rows_in_country_role_setup_order() {
        let grid = default_salary_grid();
        assert_eq!(grid.len(), 48);
        assert_eq!(grid[0].country, "Germany");
        assert_eq!(grid[0].role, "DevOps Engineer");
        assert_eq!(grid[0].team_setup, Some(TeamSetup::OnSite));
        assert_eq!(grid[2].team_setup, Some(TeamSetup::Remote));
        assert_eq!(grid[3].role, "Site Reliability Engineer");
        assert_eq!(grid[47].country, "India");
        assert_eq!(grid[47].role, "Cloud Engineer");
    }

    #[test]
    fn grid_values_follow_constants() {
        let grid = default_salary_grid();
        let sre_pl = grid
            .iter()
            .find(|r| r.country == "Poland" && r.role == "Site Reliability Engineer")
            .unwrap();
        let avg = 50000.0 * 1.15;
        assert_eq!(sre_pl.salary_avg, avg);
        assert_eq!(sre_pl.salary_min, Some(avg * 0.85));
        assert_eq!(sre_pl.salary_max, Some(avg * 1.15));
        for row in &grid {
            assert!(row.salary_min.unwrap() <= row.salary_avg);
            assert!(row.salary_avg <= row.salary_max.unwrap());
        }
    }

    #[test]
    fn full_dataset_is_reproducible() {
        let a = default_full_dataset();
        let b = default_full_dataset();
        assert_eq!(a, b);
        assert!(a.is_default_data());
        assert_eq!(a.economic.len(), 4);
        assert_eq!(a.legal.len(), 4);
    }
}
