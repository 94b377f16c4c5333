use wagecast_recon::summary::percentage_change;

use crate::model::{ForecastRow, ForecastSummaryRow, GrowthRates, TrendDirection};

/// Slope magnitude below which a series counts as flat.
const TREND_THRESHOLD: f64 = 0.01;

/// Growth from the first to the final horizon year across all rows.
///
/// Overall growth compares the mean first-year and mean final-year values;
/// the annual figure divides it evenly over the horizon. An empty table, or
/// one whose first-year mean is zero, yields zeroed rates.
pub fn calculate_growth_rates(forecast: &[ForecastRow]) -> GrowthRates {
    let firsts: Vec<f64> = forecast.iter().filter_map(ForecastRow::first).collect();
    let lasts: Vec<f64> = forecast.iter().filter_map(ForecastRow::last).collect();
    if firsts.is_empty() || lasts.is_empty() {
        return GrowthRates::default();
    }

    let horizon = forecast.iter().map(|r| r.values.len()).max().unwrap_or(0);
    let overall = percentage_change(mean(&firsts), mean(&lasts));
    let avg_annual = if horizon > 1 { overall / (horizon - 1) as f64 } else { 0.0 };

    GrowthRates {
        overall_growth_pct: overall,
        avg_annual_growth_pct: avg_annual,
        min_final_year: lasts.iter().copied().fold(f64::INFINITY, f64::min),
        max_final_year: lasts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Current (first year) versus projected (final year) per row.
pub fn forecast_summary(forecast: &[ForecastRow]) -> Vec<ForecastSummaryRow> {
    forecast
        .iter()
        .map(|row| {
            let current = row.first().unwrap_or(0.0);
            let projected = row.last().unwrap_or(0.0);
            ForecastSummaryRow {
                country: row.country.clone(),
                role: row.role.clone(),
                current,
                projected,
                growth_pct: percentage_change(current, projected),
            }
        })
        .collect()
}

/// Direction of the least-squares line through `values`, indexed by
/// position. NaN entries are ignored but keep their positions.
pub fn trend_direction(values: &[f64]) -> TrendDirection {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, y)| !y.is_nan())
        .map(|(x, y)| (x as f64, *y))
        .collect();
    if points.len() < 2 {
        return TrendDirection::InsufficientData;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), (x, y)| {
        (num + (x - mean_x) * (y - mean_y), den + (x - mean_x).powi(2))
    });
    let slope = num / den;

    if slope > TREND_THRESHOLD {
        TrendDirection::Upward
    } else if slope < -TREND_THRESHOLD {
        TrendDirection::Downward
    } else {
        TrendDirection::Stable
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
