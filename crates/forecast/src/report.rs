use serde::Serialize;
use wagecast_recon::model::SalaryRow;

use crate::engine::Forecaster;
use crate::error::ForecastError;
use crate::metrics::{calculate_growth_rates, forecast_summary, trend_direction};
use crate::model::{ForecastRow, ForecastSummaryRow, GrowthRates, TrendDirection};

#[derive(Debug, Clone, Serialize)]
pub struct ForecastMeta {
    pub engine_version: String,
    pub run_at: String,
    pub base_year: i32,
    pub final_year: i32,
    pub salary_rows: usize,
}

/// Everything a caller shows for one forecast run.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub meta: ForecastMeta,
    pub growth: GrowthRates,
    /// Direction of the per-year mean across all groups.
    pub trend: TrendDirection,
    pub summary: Vec<ForecastSummaryRow>,
    pub forecast: Vec<ForecastRow>,
}

impl Forecaster {
    /// Forecast `rows` and derive growth, trend and per-group summary.
    pub fn run(&self, rows: &[SalaryRow]) -> Result<ForecastReport, ForecastError> {
        let forecast = self.generate_forecast(rows)?;
        let config = self.config();

        Ok(ForecastReport {
            meta: ForecastMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
                base_year: config.base_year,
                final_year: config.final_year(),
                salary_rows: rows.len(),
            },
            growth: calculate_growth_rates(&forecast),
            trend: trend_direction(&yearly_means(&forecast, config.horizon_years)),
            summary: forecast_summary(&forecast),
            forecast,
        })
    }
}

fn yearly_means(forecast: &[ForecastRow], horizon: usize) -> Vec<f64> {
    if forecast.is_empty() {
        return Vec::new();
    }
    (0..horizon)
        .map(|i| {
            let sum: f64 = forecast.iter().filter_map(|r| r.values.get(i)).sum();
            sum / forecast.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wagecast_recon::catalog::default_salary_grid;

    #[test]
    fn report_on_demo_grid() {
        let report = Forecaster::default().run(&default_salary_grid()).unwrap();
        assert_eq!(report.meta.base_year, 2025);
        assert_eq!(report.meta.final_year, 2030);
        assert_eq!(report.meta.salary_rows, 48);
        assert_eq!(report.forecast.len(), 16);
        assert_eq!(report.summary.len(), 16);
        assert_eq!(report.trend, TrendDirection::Upward);
        assert!(report.growth.overall_growth_pct > 0.0);
    }

    #[test]
    fn report_on_empty_table() {
        let report = Forecaster::default().run(&[]).unwrap();
        assert!(report.forecast.is_empty());
        assert_eq!(report.growth, GrowthRates::default());
        assert_eq!(report.trend, TrendDirection::InsufficientData);
    }

    #[test]
    fn report_serializes() {
        let report = Forecaster::default().run(&default_salary_grid()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["meta"]["engine_version"], env!("CARGO_PKG_VERSION"));
        assert!(json["forecast"][0].get("year_2030").is_some());
    }
}
