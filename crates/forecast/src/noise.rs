use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::ForecastError;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Seed for the noise sequence of one (country, role) pair.
pub fn seed_for(country: &str, role: &str) -> u64 {
    let mut key = String::with_capacity(country.len() + role.len());
    key.push_str(country);
    key.push_str(role);
    fnv1a_64(key.as_bytes())
}

/// `count` multiplicative factors drawn from Normal(1.0, std_dev).
pub fn noise_factors(seed: u64, std_dev: f64, count: usize) -> Result<Vec<f64>, ForecastError> {
    // Normal::new mirrors a negative deviation instead of rejecting it.
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(ForecastError::Config(format!(
            "noise_std_dev must be a finite non-negative number, got {std_dev}"
        )));
    }
    let normal = Normal::new(1.0, std_dev)
        .map_err(|e| ForecastError::Config(format!("noise_std_dev {std_dev}: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count).map(|_| normal.sample(&mut rng)).collect())
}
