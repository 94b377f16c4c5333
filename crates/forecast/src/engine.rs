use std::collections::BTreeMap;

use log::debug;
use wagecast_recon::model::SalaryRow;
use wagecast_recon::ForecastConfig;

use crate::error::ForecastError;
use crate::growth::annual_growth;
use crate::model::ForecastRow;
use crate::noise::{noise_factors, seed_for};

/// Compound-growth projector over a fixed horizon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: &ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config: config.clone() })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Calendar years of the horizon, first year 0 years ahead.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        let base = self.config.base_year;
        (0..self.config.horizon_years).map(move |i| base.saturating_add(i as i32))
    }

    /// One row per (country, role) group, sorted by country then role.
    /// An empty table yields an empty forecast.
    pub fn generate_forecast(
        &self,
        rows: &[SalaryRow],
    ) -> Result<Vec<ForecastRow>, ForecastError> {
        let mut groups: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
        for row in rows {
            let entry = groups
                .entry((row.country.as_str(), row.role.as_str()))
                .or_insert((0.0, 0));
            entry.0 += row.salary_avg;
            entry.1 += 1;
        }

        let forecast = groups
            .into_iter()
            .map(|((country, role), (sum, count))| self.project(country, role, sum / count as f64))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "forecast {} groups from {} salary rows over {}-{}",
            forecast.len(),
            rows.len(),
            self.config.base_year,
            self.config.final_year()
        );
        Ok(forecast)
    }

    /// `base * (1 + growth)^years_ahead * noise[year]` for each horizon year.
    pub fn project(
        &self,
        country: &str,
        role: &str,
        base_salary: f64,
    ) -> Result<ForecastRow, ForecastError> {
        let growth = annual_growth(country, role);
        let noise = noise_factors(
            seed_for(country, role),
            self.config.noise_std_dev,
            self.config.horizon_years,
        )?;

        let values = noise
            .iter()
            .enumerate()
            .map(|(years_ahead, factor)| {
                let factor = if years_ahead == 0 && !self.config.perturb_base_year {
                    1.0
                } else {
                    *factor
                };
                base_salary * (1.0 + growth).powi(years_ahead as i32) * factor
            })
            .collect();

        Ok(ForecastRow {
            country: country.to_string(),
            role: role.to_string(),
            base_salary,
            start_year: self.config.base_year,
            values,
        })
    }
}

/// Forecast with the default horizon (2025-2030) and noise.
pub fn generate_forecast(rows: &[SalaryRow]) -> Vec<ForecastRow> {
    Forecaster::default().generate_forecast(rows).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wagecast_recon::catalog::default_salary_grid;
    use wagecast_recon::TeamSetup;

    fn salary(country: &str, role: &str, avg: f64) -> SalaryRow {
        SalaryRow {
            role: role.into(),
            country: country.into(),
            team_setup: Some(TeamSetup::Remote),
            salary_min: None,
            salary_max: None,
            salary_avg: avg,
        }
    }

    fn unperturbed() -> Forecaster {
        Forecaster::new(&ForecastConfig { perturb_base_year: false, ..ForecastConfig::default() })
            .unwrap()
    }

    #[test]
    fn empty_table_empty_forecast() {
        assert!(generate_forecast(&[]).is_empty());
    }

    #[test]
    fn single_row_scenario() {
        let rows = vec![salary("Germany", "DevOps Engineer", 70000.0)];
        let forecast = unperturbed().generate_forecast(&rows).unwrap();
        assert_eq!(forecast.len(), 1);
        let row = &forecast[0];
        assert_eq!(row.base_salary, 70000.0);
        assert_eq!(row.start_year, 2025);
        assert_eq!(row.values.len(), 6);
        assert_eq!(row.first(), Some(70000.0));
        assert_eq!(row.final_year(), 2030);
    }

    #[test]
    fn base_year_perturbation_only_touches_year_zero() {
        let rows = vec![salary("Germany", "DevOps Engineer", 70000.0)];
        let plain = unperturbed().generate_forecast(&rows).unwrap();
        let noisy = Forecaster::default().generate_forecast(&rows).unwrap();
        assert_eq!(&plain[0].values[1..], &noisy[0].values[1..]);
        let factor = noise_factors(seed_for("Germany", "DevOps Engineer"), 0.02, 6).unwrap()[0];
        assert_eq!(noisy[0].values[0], 70000.0 * factor);
    }

    #[test]
    fn zero_noise_is_pure_compound_growth() {
        let config = ForecastConfig { noise_std_dev: 0.0, ..ForecastConfig::default() };
        let row = Forecaster::new(&config)
            .unwrap()
            .project("Poland", "Platform Engineer", 50000.0)
            .unwrap();
        let growth: f64 = 0.115 * 1.2;
        for (i, value) in row.values.iter().enumerate() {
            let expected = 50000.0 * (1.0 + growth).powi(i as i32);
            assert!((value - expected).abs() < 1e-6, "year {i}: {value} vs {expected}");
        }
    }

    #[test]
    fn groups_average_and_sort() {
        let rows = vec![
            salary("Poland", "DevOps Engineer", 50000.0),
            salary("Germany", "DevOps Engineer", 60000.0),
            salary("Germany", "DevOps Engineer", 80000.0),
            salary("Germany", "Cloud Engineer", 75000.0),
        ];
        let forecast = Forecaster::default().generate_forecast(&rows).unwrap();
        let keys: Vec<_> = forecast.iter().map(|r| (r.country.as_str(), r.role.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                ("Germany", "Cloud Engineer"),
                ("Germany", "DevOps Engineer"),
                ("Poland", "DevOps Engineer"),
            ]
        );
        assert_eq!(forecast[1].base_salary, 70000.0);
    }

    #[test]
    fn forecast_is_idempotent() {
        let grid = default_salary_grid();
        let a = generate_forecast(&grid);
        let b = generate_forecast(&grid);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn custom_horizon() {
        let config = ForecastConfig { base_year: 2026, horizon_years: 3, ..ForecastConfig::default() };
        let forecaster = Forecaster::new(&config).unwrap();
        assert_eq!(forecaster.years().collect::<Vec<_>>(), vec![2026, 2027, 2028]);
        let row = forecaster.project("India", "Cloud Engineer", 25000.0).unwrap();
        assert_eq!(row.values.len(), 3);
        assert!(row.value_for(2028).is_some());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ForecastConfig { horizon_years: 1, ..ForecastConfig::default() };
        assert!(matches!(Forecaster::new(&config), Err(ForecastError::Config(_))));
    }
}
