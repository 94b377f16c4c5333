use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Projection rows
// ---------------------------------------------------------------------------

/// Projected salaries for one (country, role) group. `values[i]` is the
/// projection for `start_year + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub country: String,
    pub role: String,
    pub base_salary: f64,
    pub start_year: i32,
    pub values: Vec<f64>,
}

impl ForecastRow {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(move |i| self.start_year.saturating_add(year_offset(i)))
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        let offset = usize::try_from(year.checked_sub(self.start_year)?).ok()?;
        self.values.get(offset).copied()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn final_year(&self) -> i32 {
        self.start_year.saturating_add(year_offset(self.values.len().saturating_sub(1)))
    }
}

fn year_offset(years_ahead: usize) -> i32 {
    i32::try_from(years_ahead).unwrap_or(i32::MAX)
}

/// Flat wide-table shape: `{country, role, base_salary, year_2025, ...}`.
impl Serialize for ForecastRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.values.len()))?;
        map.serialize_entry("country", &self.country)?;
        map.serialize_entry("role", &self.role)?;
        map.serialize_entry("base_salary", &self.base_salary)?;
        for (year, value) in self.years().zip(&self.values) {
            map.serialize_entry(&format!("year_{year}"), value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Growth across the whole forecast table. All zero for an empty table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GrowthRates {
    pub overall_growth_pct: f64,
    pub avg_annual_growth_pct: f64,
    pub min_final_year: f64,
    pub max_final_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummaryRow {
    pub country: String,
    pub role: String,
    pub current: f64,
    pub projected: f64,
    pub growth_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
    InsufficientData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Upward => "upward",
            Self::Downward => "downward",
            Self::Stable => "stable",
            Self::InsufficientData => "insufficient data",
        };
        f.write_str(label)
    }
}
