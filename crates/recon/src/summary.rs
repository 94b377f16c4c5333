use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{distinct, SalaryRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalarySummary {
    pub total_records: usize,
    pub countries: Vec<String>,
    pub roles: Vec<String>,
    pub team_setups: Vec<String>,
    pub salary_stats: SalaryStats,
}

/// `min` is taken over the lower bounds and `max` over the upper bounds;
/// the rest describe `salary_avg`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalaryStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub std: f64,
}

/// Per-country or per-role aggregate of `salary_avg`, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: String,
    pub avg_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub count: usize,
}

/// Descriptive statistics of a numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

impl SummaryStats {
    /// `None` for an empty series. Non-finite values are ignored.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted),
            median: quantile(&sorted, 0.5),
            std: sample_std(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q25: quantile(&sorted, 0.25),
            q75: quantile(&sorted, 0.75),
        })
    }
}

/// Dashboard summary of a canonical salary table.
pub fn summarize_salaries(rows: &[SalaryRow]) -> SalarySummary {
    let owned = |v: Vec<&str>| v.into_iter().map(String::from).collect::<Vec<_>>();
    let team_setups: Vec<&str> = rows
        .iter()
        .filter_map(|r| r.team_setup.as_ref().map(|t| t.as_str()))
        .collect();

    let averages: Vec<f64> = rows.iter().map(|r| r.salary_avg).collect();
    let salary_stats = match SummaryStats::from_values(&averages) {
        Some(stats) => SalaryStats {
            min: fold_min(rows.iter().filter_map(|r| r.salary_min)),
            max: fold_max(rows.iter().filter_map(|r| r.salary_max)),
            avg: stats.mean,
            median: stats.median,
            std: stats.std,
        },
        None => SalaryStats::default(),
    };

    SalarySummary {
        total_records: rows.len(),
        countries: owned(distinct(rows.iter().map(|r| r.country.as_str()))),
        roles: owned(distinct(rows.iter().map(|r| r.role.as_str()))),
        team_setups: owned(distinct(team_setups)),
        salary_stats,
    }
}

pub fn group_by_country(rows: &[SalaryRow]) -> Vec<GroupStats> {
    group_by(rows, |r| &r.country)
}

pub fn group_by_role(rows: &[SalaryRow]) -> Vec<GroupStats> {
    group_by(rows, |r| &r.role)
}

fn group_by<F>(rows: &[SalaryRow], key: F) -> Vec<GroupStats>
where
    F: Fn(&SalaryRow) -> &String,
{
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row).as_str()).or_default().push(row.salary_avg);
    }

    groups
        .into_iter()
        .map(|(key, values)| GroupStats {
            key: key.to_string(),
            avg_salary: round2(mean(&values)),
            min_salary: round2(fold_min(values.iter().copied())),
            max_salary: round2(fold_max(values.iter().copied())),
            count: values.len(),
        })
        .collect()
}

/// Percentage change from `old` to `new`; 0 when `old` is 0.
pub fn percentage_change(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        return 0.0;
    }
    (new - old) / old * 100.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1); 0 for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn fold_min(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::min).unwrap_or(0.0)
}

fn fold_max(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::max).unwrap_or(0.0)
}
