//! `wagecast-recon` — Schema reconciliation for compensation datasets.
//!
//! Pure engine crate: receives a decoded table, returns canonical salary,
//! economic and legal tables. Unusable input degrades to the built-in
//! reference catalog instead of failing. No CLI or IO dependencies.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod summary;

pub use classify::{classify, is_combined};
pub use config::{ClassifyConfig, ForecastConfig, WagecastConfig};
pub use engine::{load_csv_table, load_json_records, reconcile, try_reconcile};
pub use error::ReconError;
pub use model::{
    DataSource, DatasetShape, EconomicRow, LegalRow, RawTable, RawValue, Reconciled,
    SalaryFilter, SalaryRow, TeamSetup, WorkforceSentiment,
};
