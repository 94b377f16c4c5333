//! `wagecast reconcile|forecast|demo|config` — upload in, canonical tables
//! and projections out.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::Serialize;
use wagecast_forecast::{ForecastReport, Forecaster};
use wagecast_recon::catalog::default_full_dataset;
use wagecast_recon::matcher::{validate_columns, ColumnValidation};
use wagecast_recon::model::SALARY_COLUMNS;
use wagecast_recon::summary::{
    group_by_country, group_by_role, summarize_salaries, GroupStats, SalarySummary,
};
use wagecast_recon::{
    load_csv_table, load_json_records, reconcile, DataSource, DatasetShape, RawTable, Reconciled,
    SalaryFilter, TeamSetup, WagecastConfig,
};

use crate::exit_codes::{EXIT_DEFAULT_DATA, EXIT_INVALID_CONFIG, EXIT_IO};
use crate::util::{format_currency, format_percentage, pad_left, pad_right};
use crate::CliError;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Options shared by the commands that read an upload.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Uploaded table (.csv, or .json array of records)
    pub input: PathBuf,

    /// Output JSON to stdout instead of human summary
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// TOML config with [classify] and [forecast] sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit 5 when the upload could not be used and defaults were substituted
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only forecast rows for this country (exact match)
    #[arg(long)]
    pub country: Option<String>,

    /// Only forecast rows for this role (exact match)
    #[arg(long)]
    pub role: Option<String>,

    /// Only forecast rows with this team setup (On-site, Hybrid, Remote)
    #[arg(long)]
    pub team_setup: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> SalaryFilter {
        SalaryFilter {
            country: self.country.clone(),
            role: self.role.clone(),
            team_setup: self.team_setup.as_deref().map(TeamSetup::from),
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a config file without running anything
    #[command(after_help = "\
Examples:
  wagecast config validate wagecast.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReconcileOutput<'a> {
    input: String,
    validation: ColumnValidation,
    summary: SalarySummary,
    by_country: Vec<GroupStats>,
    by_role: Vec<GroupStats>,
    #[serde(flatten)]
    reconciled: &'a Reconciled,
}

#[derive(Serialize)]
struct ForecastOutput<'a> {
    input: String,
    shape: Option<DatasetShape>,
    source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<&'a str>,
    #[serde(flatten)]
    report: &'a ForecastReport,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_reconcile(args: UploadArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let raw = load_upload(&args.input)?;
    let reconciled = reconcile(&raw, &config.classify);

    let output = ReconcileOutput {
        input: args.input.display().to_string(),
        validation: validate_columns(&raw.columns, &SALARY_COLUMNS, raw.len()),
        summary: summarize_salaries(&reconciled.salary),
        by_country: group_by_country(&reconciled.salary),
        by_role: group_by_role(&reconciled.salary),
        reconciled: &reconciled,
    };
    emit_json(&output, args.json, args.output.as_deref())?;

    eprintln!(
        "reconciled {}: {} input rows -> {} salary, {} economic, {} legal ({})",
        args.input.display(),
        raw.len(),
        reconciled.salary.len(),
        reconciled.economic.len(),
        reconciled.legal.len(),
        shape_label(&reconciled),
    );
    if !output.validation.is_valid {
        eprintln!(
            "note: no exact canonical column for {}; matched by similarity",
            output.validation.missing_columns.join(", "),
        );
    }
    report_fallback(&reconciled);
    if !args.json {
        eprintln!("countries: {}", reconciled.countries().join(", "));
        print_group_table("country", &output.by_country);
    }

    strict_check(&reconciled, args.strict)
}

pub fn cmd_forecast(args: UploadArgs, filter: FilterArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let raw = load_upload(&args.input)?;
    let reconciled = reconcile(&raw, &config.classify);

    let filter = filter.to_filter();
    let rows = if filter.is_empty() {
        reconciled.salary.clone()
    } else {
        filter.apply(&reconciled.salary)
    };
    if rows.is_empty() {
        log::warn!("no salary rows left to forecast after filtering");
    }

    let forecaster = Forecaster::new(&config.forecast)
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;
    let report = forecaster
        .run(&rows)
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    let output = ForecastOutput {
        input: args.input.display().to_string(),
        shape: reconciled.shape,
        source: reconciled.source,
        fallback_reason: reconciled.fallback_reason.as_deref(),
        report: &report,
    };
    emit_json(&output, args.json, args.output.as_deref())?;

    report_fallback(&reconciled);
    print_forecast_summary(&report, args.json);

    strict_check(&reconciled, args.strict)
}

pub fn cmd_demo(json: bool) -> Result<(), CliError> {
    let dataset = default_full_dataset();
    let report = Forecaster::default()
        .run(&dataset.salary)
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    let output = ForecastOutput {
        input: "demo".to_string(),
        shape: dataset.shape,
        source: dataset.source,
        fallback_reason: None,
        report: &report,
    };
    emit_json(&output, json, None)?;

    print_forecast_summary(&report, json);
    Ok(())
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { config } => {
            let config = load_config(Some(&config)).map_err(|e| CliError { hint: None, ..e })?;
            eprintln!(
                "valid: combined at {}+ salary / {}+ economic matches; forecast {}-{}, noise σ={}",
                config.classify.min_salary_matches,
                config.classify.min_economic_matches,
                config.forecast.base_year,
                config.forecast.final_year(),
                config.forecast.noise_std_dev,
            );
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<WagecastConfig, CliError> {
    let Some(path) = path else {
        return Ok(WagecastConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_IO, format!("cannot read config {}: {e}", path.display()))
    })?;
    WagecastConfig::from_toml(&config_str).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("{}: {e}", path.display()),
        hint: Some("run `wagecast config validate <file>` for details".into()),
    })
}

fn load_upload(path: &Path) -> Result<RawTable, CliError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read {}: {e}", path.display())))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let table = if is_json { load_json_records(&data) } else { load_csv_table(&data) };
    table.map_err(|e| CliError::new(EXIT_IO, format!("{}: {e}", path.display())))
}

/// JSON goes to `output` when given and to stdout when `--json` is set.
fn emit_json<T: Serialize>(
    value: &T,
    to_stdout: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    if !to_stdout && output.is_none() {
        return Ok(());
    }
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if to_stdout {
        println!("{json_str}");
    }
    Ok(())
}

fn shape_label(reconciled: &Reconciled) -> String {
    match reconciled.shape {
        Some(shape) => shape.to_string(),
        None => reconciled.source.to_string(),
    }
}

fn report_fallback(reconciled: &Reconciled) {
    if reconciled.is_default_data() {
        eprintln!(
            "warning: upload could not be reconciled, showing default dataset ({})",
            reconciled.fallback_reason.as_deref().unwrap_or("no reason recorded"),
        );
    }
}

fn strict_check(reconciled: &Reconciled, strict: bool) -> Result<(), CliError> {
    if strict && reconciled.is_default_data() {
        return Err(CliError {
            code: EXIT_DEFAULT_DATA,
            message: "default dataset in use".into(),
            hint: Some("check that the upload has role, country and salary columns".into()),
        });
    }
    Ok(())
}

fn print_group_table(label: &str, groups: &[GroupStats]) {
    eprintln!(
        "{} {} {} {} {}",
        pad_right(label, 20),
        pad_left("rows", 5),
        pad_left("avg", 8),
        pad_left("min", 8),
        pad_left("max", 8),
    );
    for g in groups {
        eprintln!(
            "{} {} {} {} {}",
            pad_right(&g.key, 20),
            pad_left(&g.count.to_string(), 5),
            pad_left(&format_currency(g.avg_salary), 8),
            pad_left(&format_currency(g.min_salary), 8),
            pad_left(&format_currency(g.max_salary), 8),
        );
    }
}

fn print_forecast_summary(report: &ForecastReport, json: bool) {
    let g = &report.growth;
    eprintln!(
        "forecast {}-{}: {} groups, overall {}, {} per year, trend {}",
        report.meta.base_year,
        report.meta.final_year,
        report.forecast.len(),
        format_percentage(g.overall_growth_pct),
        format_percentage(g.avg_annual_growth_pct),
        report.trend,
    );
    if json {
        return;
    }
    for row in &report.summary {
        eprintln!(
            "{} {} {} {} {}",
            pad_right(&row.country, 12),
            pad_right(&row.role, 26),
            pad_left(&format_currency(row.current), 8),
            pad_left(&format_currency(row.projected), 8),
            pad_left(&format_percentage(row.growth_pct), 8),
        );
    }
}
