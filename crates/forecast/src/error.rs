use std::fmt;

use wagecast_recon::ReconError;

#[derive(Debug)]
pub enum ForecastError {
    /// Forecast settings rejected (horizon too short, bad noise spread, etc.).
    Config(String),
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "forecast config error: {msg}"),
        }
    }
}

impl std::error::Error for ForecastError {}

impl From<ReconError> for ForecastError {
    fn from(e: ReconError) -> Self {
        Self::Config(e.to_string())
    }
}
