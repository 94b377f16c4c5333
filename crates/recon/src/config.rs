use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{ECONOMIC_COLUMNS, SALARY_COLUMNS};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WagecastConfig {
    #[serde(default)]
    pub classify: ClassifyConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Minimum fuzzy-matched vocabulary counts for an upload to count as combined.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassifyConfig {
    #[serde(default = "default_min_salary_matches")]
    pub min_salary_matches: usize,
    #[serde(default = "default_min_economic_matches")]
    pub min_economic_matches: usize,
}

fn default_min_salary_matches() -> usize {
    4
}

fn default_min_economic_matches() -> usize {
    3
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            min_salary_matches: default_min_salary_matches(),
            min_economic_matches: default_min_economic_matches(),
        }
    }
}

impl ClassifyConfig {
    pub fn validate(&self) -> Result<(), ReconError> {
        if self.min_salary_matches > SALARY_COLUMNS.len() {
            return Err(ReconError::ConfigValidation(format!(
                "classify.min_salary_matches must be at most {}, got {}",
                SALARY_COLUMNS.len(),
                self.min_salary_matches
            )));
        }
        if self.min_economic_matches > ECONOMIC_COLUMNS.len() {
            return Err(ReconError::ConfigValidation(format!(
                "classify.min_economic_matches must be at most {}, got {}",
                ECONOMIC_COLUMNS.len(),
                self.min_economic_matches
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// Calendar year of the first projected value (0 years ahead).
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    #[serde(default = "default_horizon_years")]
    pub horizon_years: usize,
    /// Standard deviation of the per-year multiplicative noise around 1.0.
    #[serde(default = "default_noise_std_dev")]
    pub noise_std_dev: f64,
    /// Apply the year-0 noise draw to the base year as well.
    #[serde(default = "default_perturb_base_year")]
    pub perturb_base_year: bool,
}

fn default_base_year() -> i32 {
    2025
}

fn default_horizon_years() -> usize {
    6
}

fn default_noise_std_dev() -> f64 {
    0.02
}

fn default_perturb_base_year() -> bool {
    true
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_year: default_base_year(),
            horizon_years: default_horizon_years(),
            noise_std_dev: default_noise_std_dev(),
            perturb_base_year: default_perturb_base_year(),
        }
    }
}

/// Longest projection window accepted by `validate`.
pub const MAX_HORIZON_YEARS: usize = 100;

impl ForecastConfig {
    /// Last projected calendar year, saturating at `i32::MAX`.
    pub fn final_year(&self) -> i32 {
        self.checked_final_year().unwrap_or(i32::MAX)
    }

    /// Last projected calendar year, `None` when it does not fit in an `i32`.
    pub fn checked_final_year(&self) -> Option<i32> {
        let offset = i32::try_from(self.horizon_years.saturating_sub(1)).ok()?;
        self.base_year.checked_add(offset)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.horizon_years < 2 {
            return Err(ReconError::ConfigValidation(format!(
                "forecast.horizon_years must be at least 2, got {}",
                self.horizon_years
            )));
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ReconError::ConfigValidation(format!(
                "forecast.horizon_years must be at most {MAX_HORIZON_YEARS}, got {}",
                self.horizon_years
            )));
        }
        if self.checked_final_year().is_none() {
            return Err(ReconError::ConfigValidation(format!(
                "forecast.base_year {} plus horizon_years {} overflows the calendar",
                self.base_year, self.horizon_years
            )));
        }
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "forecast.noise_std_dev must be a finite non-negative number, got {}",
                self.noise_std_dev
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl WagecastConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: WagecastConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.classify.validate()?;
        self.forecast.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
