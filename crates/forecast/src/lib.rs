//! `wagecast-forecast` — Deterministic salary projections.
//!
//! Groups canonical salary rows by (country, role) and projects each group's
//! mean salary over a fixed horizon with compound growth and seeded noise.

pub mod engine;
pub mod error;
pub mod growth;
pub mod metrics;
pub mod model;
pub mod noise;
pub mod report;

pub use engine::{generate_forecast, Forecaster};
pub use error::ForecastError;
pub use metrics::{calculate_growth_rates, forecast_summary, trend_direction};
pub use model::{ForecastRow, ForecastSummaryRow, GrowthRates, TrendDirection};
pub use report::{ForecastMeta, ForecastReport};
