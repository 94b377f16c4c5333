use std::collections::HashSet;

use log::{debug, warn};

use crate::catalog::{
    default_economic_for, default_full_dataset, default_legal_for, EUR_MAX_FACTOR,
    EUR_MIN_FACTOR, EUR_TO_USD,
};
use crate::classify::classify;
use crate::config::ClassifyConfig;
use crate::error::ReconError;
use crate::matcher::{map_columns, normalize, ColumnMapping};
use crate::model::{
    DataSource, DatasetShape, EconomicRow, LegalRow, RawTable, RawValue, Reconciled, SalaryRow,
    TeamSetup, WorkforceSentiment, COST_OF_LIVING_INDEX, COUNTRY, ECONOMIC_COLUMNS, GDP_GROWTH,
    INFLATION_RATE, LABOR_LAWS, LEGAL_COLUMNS, PPP_ADJUSTMENT, ROLE_NAME, SALARY_AVG,
    SALARY_COLUMNS, SALARY_MAX, SALARY_MIN, TAX_IMPLICATIONS, TEAM_SETUP, WORKFORCE_SENTIMENT,
};

/// Normalized name of the euro-denominated salary column in survey exports.
const EURO_SALARY_COLUMN: &str = "salaryadjustedtoeuro";

/// Reconcile an upload into canonical tables. Never fails: any error falls
/// back to the synthetic demo dataset, flagged as `DataSource::Defaults`.
pub fn reconcile(raw: &RawTable, config: &ClassifyConfig) -> Reconciled {
    match try_reconcile(raw, config) {
        Ok(reconciled) => reconciled,
        Err(e) => {
            warn!("reconciliation failed, using default dataset: {e}");
            let mut fallback = default_full_dataset();
            fallback.fallback_reason = Some(e.to_string());
            fallback
        }
    }
}

/// Reconcile without the fallback; errors are returned to the caller.
pub fn try_reconcile(raw: &RawTable, config: &ClassifyConfig) -> Result<Reconciled, ReconError> {
    let shape = classify(raw, config);

    let (salary, economic, legal) = match shape {
        DatasetShape::Combined => {
            let salary = extract_salary(raw)?;
            let economic = extract_economic(raw)?;
            let legal = extract_legal(raw)?;
            (salary, economic, legal)
        }
        DatasetShape::SalaryOnly => {
            let salary = extract_salary(raw)?;
            let countries: Vec<&str> = salary.iter().map(|r| r.country.as_str()).collect();
            let economic = default_economic_for(countries.iter().copied());
            let legal = default_legal_for(countries.iter().copied());
            (salary, economic, legal)
        }
    };

    debug!(
        "reconciled {} input rows: {} salary, {} economic, {} legal",
        raw.len(),
        salary.len(),
        economic.len(),
        legal.len()
    );

    Ok(Reconciled {
        shape: Some(shape),
        source: DataSource::Uploaded,
        fallback_reason: None,
        salary,
        economic,
        legal,
    })
}

// ---------------------------------------------------------------------------
// Salary
// ---------------------------------------------------------------------------

/// Salary row before cleaning; every field may still be missing.
#[derive(Debug, Default)]
struct SalaryDraft {
    role: Option<String>,
    country: Option<String>,
    team_setup: Option<TeamSetup>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    salary_avg: Option<f64>,
}

/// Which salary columns the draft table carries at all.
#[derive(Debug, Clone, Copy)]
struct SalaryColumns {
    min: bool,
    max: bool,
    avg: bool,
}

/// Extract and clean the canonical salary table.
pub fn extract_salary(raw: &RawTable) -> Result<Vec<SalaryRow>, ReconError> {
    if raw.column_index("job_role").is_some() && raw.column_index("country").is_some() {
        debug!("recognized job_role/country survey layout");
        return extract_survey_salary(raw);
    }

    let mapping = map_columns(&raw.columns, &SALARY_COLUMNS);
    log_mapping("salary", &mapping);

    let role_col = required_index(raw, &mapping, "salary", ROLE_NAME)?;
    let country_col = required_index(raw, &mapping, "salary", COUNTRY)?;
    let team_col = mapping.index_of(&raw.columns, TEAM_SETUP);
    let min_col = mapping.index_of(&raw.columns, SALARY_MIN);
    let max_col = mapping.index_of(&raw.columns, SALARY_MAX);
    let avg_col = mapping.index_of(&raw.columns, SALARY_AVG);

    let drafts = (0..raw.len())
        .map(|row| SalaryDraft {
            role: raw.value(row, role_col).as_text(),
            country: raw.value(row, country_col).as_text(),
            team_setup: team_col
                .and_then(|c| raw.value(row, c).as_text())
                .map(TeamSetup::from),
            salary_min: min_col.and_then(|c| raw.value(row, c).to_number()),
            salary_max: max_col.and_then(|c| raw.value(row, c).to_number()),
            salary_avg: avg_col.and_then(|c| raw.value(row, c).to_number()),
        })
        .collect();

    let columns = SalaryColumns {
        min: min_col.is_some(),
        max: max_col.is_some(),
        avg: avg_col.is_some(),
    };
    clean_salary(drafts, columns)
}

/// Survey exports with lowercase `job_role`/`country`/`salary_*` columns are
/// mapped by exact name, without fuzzy matching.
fn extract_survey_salary(raw: &RawTable) -> Result<Vec<SalaryRow>, ReconError> {
    let col = |name: &str| raw.column_index(name);
    let role_col = col("job_role");
    let country_col = col("country");
    let team_col = col("team_setup");
    let min_col = col("salary_min");
    let max_col = col("salary_max");
    let avg_col = col("salary_avg");
    let euro_col = if min_col.is_none() && max_col.is_none() && avg_col.is_none() {
        raw.columns
            .iter()
            .position(|c| normalize(c) == EURO_SALARY_COLUMN)
    } else {
        None
    };

    let text = |c: Option<usize>, row: usize| c.and_then(|c| raw.value(row, c).as_text());
    let number = |c: Option<usize>, row: usize| c.and_then(|c| raw.value(row, c).to_number());

    let mut drafts = Vec::with_capacity(raw.len());
    for row in 0..raw.len() {
        let role = text(role_col, row);
        let team_setup = match team_col {
            Some(c) => raw.value(row, c).as_text().map(TeamSetup::from),
            None => Some(TeamSetup::from_role_name(role.as_deref().unwrap_or(""))),
        };

        let mut draft = SalaryDraft {
            role,
            country: text(country_col, row),
            team_setup,
            salary_min: number(min_col, row),
            salary_max: number(max_col, row),
            salary_avg: number(avg_col, row),
        };

        if euro_col.is_some() {
            match number(euro_col, row) {
                Some(eur) if eur > 0.0 => {
                    draft.salary_avg = Some(eur * EUR_TO_USD);
                    draft.salary_min = Some(eur * EUR_MIN_FACTOR);
                    draft.salary_max = Some(eur * EUR_MAX_FACTOR);
                }
                _ => continue,
            }
        } else if avg_col.is_none() {
            draft.salary_avg = midpoint(draft.salary_min, draft.salary_max);
        }

        drafts.push(draft);
    }

    let columns = match euro_col {
        Some(_) => SalaryColumns { min: true, max: true, avg: true },
        None => SalaryColumns {
            min: min_col.is_some(),
            max: max_col.is_some(),
            avg: avg_col.is_some() || (min_col.is_some() && max_col.is_some()),
        },
    };
    clean_salary(drafts, columns)
}

/// Drop rows without role or country, synthesize the average from the bounds
/// when no row has one, then drop rows still missing an average.
fn clean_salary(
    drafts: Vec<SalaryDraft>,
    columns: SalaryColumns,
) -> Result<Vec<SalaryRow>, ReconError> {
    let mut drafts: Vec<SalaryDraft> = drafts
        .into_iter()
        .filter(|d| d.role.is_some() && d.country.is_some())
        .collect();

    let mut has_avg = columns.avg;
    let no_valid_avg = !columns.avg || drafts.iter().all(|d| d.salary_avg.is_none());
    if no_valid_avg && columns.min && columns.max {
        debug!("no usable salary average, deriving it from min/max bounds");
        for draft in &mut drafts {
            draft.salary_avg = midpoint(draft.salary_min, draft.salary_max);
        }
        has_avg = true;
    }

    if !has_avg {
        return Err(ReconError::MissingColumn {
            table: "salary",
            column: SALARY_AVG.to_string(),
        });
    }

    Ok(drafts
        .into_iter()
        .filter_map(|d| {
            Some(SalaryRow {
                role: d.role?,
                country: d.country?,
                team_setup: d.team_setup,
                salary_min: d.salary_min,
                salary_max: d.salary_max,
                salary_avg: d.salary_avg?,
            })
        })
        .collect())
}

fn midpoint(min: Option<f64>, max: Option<f64>) -> Option<f64> {
    Some((min? + max?) / 2.0)
}

// ---------------------------------------------------------------------------
// Economic + Legal
// ---------------------------------------------------------------------------

/// Extract economic indicators from a combined upload, one row per country.
pub fn extract_economic(raw: &RawTable) -> Result<Vec<EconomicRow>, ReconError> {
    let mapping = map_columns(&raw.columns, &ECONOMIC_COLUMNS);
    log_mapping("economic", &mapping);
    if mapping.is_empty() {
        return Ok(default_economic_for(raw_countries(raw).iter().map(String::as_str)));
    }

    let country_col = required_index(raw, &mapping, "economic", COUNTRY)?;
    let number = |canonical: &str, row: usize| {
        mapping
            .index_of(&raw.columns, canonical)
            .and_then(|c| raw.value(row, c).to_number())
    };

    Ok(first_per_country(raw, country_col)
        .map(|(row, country)| EconomicRow {
            country,
            inflation_rate: number(INFLATION_RATE, row),
            ppp_adjustment: number(PPP_ADJUSTMENT, row),
            gdp_growth: number(GDP_GROWTH, row),
            cost_of_living_index: number(COST_OF_LIVING_INDEX, row),
        })
        .collect())
}

/// Extract legal and cultural notes from a combined upload, one row per country.
pub fn extract_legal(raw: &RawTable) -> Result<Vec<LegalRow>, ReconError> {
    let mapping = map_columns(&raw.columns, &LEGAL_COLUMNS);
    log_mapping("legal", &mapping);
    if mapping.is_empty() {
        return Ok(default_legal_for(raw_countries(raw).iter().map(String::as_str)));
    }

    let country_col = required_index(raw, &mapping, "legal", COUNTRY)?;
    let text = |canonical: &str, row: usize| {
        mapping
            .index_of(&raw.columns, canonical)
            .and_then(|c| raw.value(row, c).as_text())
    };

    Ok(first_per_country(raw, country_col)
        .map(|(row, country)| LegalRow {
            country,
            labor_laws: text(LABOR_LAWS, row),
            tax_implications: text(TAX_IMPLICATIONS, row),
            workforce_sentiment: text(WORKFORCE_SENTIMENT, row).map(WorkforceSentiment::from),
        })
        .collect())
}

/// (row index, country) of the first row for each distinct country.
/// Rows without a country are skipped.
fn first_per_country(
    raw: &RawTable,
    country_col: usize,
) -> impl Iterator<Item = (usize, String)> + '_ {
    let mut seen = HashSet::new();
    (0..raw.len()).filter_map(move |row| {
        let country = raw.value(row, country_col).as_text()?;
        seen.insert(country.clone()).then_some((row, country))
    })
}

/// Distinct values of an exact `Country` column, if the upload has one.
fn raw_countries(raw: &RawTable) -> Vec<String> {
    let Some(col) = raw.column_index(COUNTRY) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    raw.column(col)
        .filter_map(RawValue::as_text)
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

fn required_index(
    raw: &RawTable,
    mapping: &ColumnMapping,
    table: &'static str,
    canonical: &str,
) -> Result<usize, ReconError> {
    mapping
        .index_of(&raw.columns, canonical)
        .ok_or_else(|| ReconError::MissingColumn {
            table,
            column: canonical.to_string(),
        })
}

fn log_mapping(table: &str, mapping: &ColumnMapping) {
    if log::log_enabled!(log::Level::Debug) {
        let pairs: Vec<String> = mapping.iter().map(|(a, c)| format!("{a} -> {c}")).collect();
        debug!("{table} column mapping: [{}]", pairs.join(", "));
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Decode CSV text into a raw table. The first record is the header row.
pub fn load_csv_table(csv_data: &str) -> Result<RawTable, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv(e.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv(e.to_string()))?;
        rows.push(record.iter().map(RawValue::from).collect());
    }

    Ok(RawTable::new(columns, rows))
}

/// Decode a JSON array of records (`[{"column": value, ...}, ...]`).
/// Columns are ordered by first appearance.
pub fn load_json_records(json: &str) -> Result<RawTable, ReconError> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_str(json).map_err(|e| ReconError::Json(e.to_string()))?;

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| match record.get(c) {
                    None | Some(serde_json::Value::Null) => RawValue::Empty,
                    Some(serde_json::Value::Number(n)) => {
                        n.as_f64().map_or(RawValue::Empty, RawValue::Number)
                    }
                    Some(serde_json::Value::String(s)) => RawValue::from(s.as_str()),
                    Some(other) => RawValue::from(other.to_string()),
                })
                .collect()
        })
        .collect();

    Ok(RawTable::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            columns.iter().copied(),
            rows.iter()
                .map(|r| r.iter().map(|v| RawValue::from(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn load_csv_basic() {
        let csv = "\
Role_Name,Country,Salary_Avg_USD
DevOps Engineer,Germany,70000
Cloud Engineer,Poland,
";
        let t = load_csv_table(csv).unwrap();
        assert_eq!(t.columns, vec!["Role_Name", "Country", "Salary_Avg_USD"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.value(0, 2), &RawValue::Text("70000".into()));
        assert_eq!(t.value(1, 2), &RawValue::Empty);
    }

    #[test]
    fn load_csv_ragged_and_bom() {
        let csv = "\u{feff}a,b,c\n1,2\n1,2,3,4\n";
        let t = load_csv_table(csv).unwrap();
        assert_eq!(t.columns[0], "a");
        assert_eq!(t.rows[0].len(), 3);
        assert_eq!(t.rows[1].len(), 3);
    }

    #[test]
    fn load_json_records_orders_columns_by_first_seen() {
        let json = r#"[
            {"role": "DevOps Engineer", "country": "Germany", "pay": 70000},
            {"country": "India", "bonus": null, "role": "Cloud Engineer"}
        ]"#;
        let t = load_json_records(json).unwrap();
        assert_eq!(t.columns, vec!["role", "country", "pay", "bonus"]);
        assert_eq!(t.value(0, 2), &RawValue::Number(70000.0));
        assert_eq!(t.value(1, 2), &RawValue::Empty);
        assert_eq!(t.value(1, 3), &RawValue::Empty);
    }

    #[test]
    fn load_json_rejects_non_array() {
        assert!(matches!(load_json_records("{}"), Err(ReconError::Json(_))));
    }

    #[test]
    fn salary_rows_without_role_or_country_are_dropped() {
        let t = table(
            &["Role_Name", "Country", "Salary_Avg_USD"],
            &[
                &["DevOps Engineer", "Germany", "70000"],
                &["", "Germany", "70000"],
                &["Cloud Engineer", "", "50000"],
            ],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, "DevOps Engineer");
    }

    #[test]
    fn non_numeric_average_is_missing() {
        let t = table(
            &["Role_Name", "Country", "Salary_Avg_USD"],
            &[
                &["DevOps Engineer", "Germany", "lots"],
                &["Cloud Engineer", "Poland", "€55,000"],
            ],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].salary_avg, 55000.0);
    }

    #[test]
    fn average_synthesized_from_bounds_when_absent() {
        let t = table(
            &["Role_Name", "Country", "Salary_Min_USD", "Salary_Max_USD"],
            &[
                &["DevOps Engineer", "Germany", "60000", "80000"],
                &["Cloud Engineer", "Poland", "50000", ""],
            ],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].salary_avg, 70000.0);
        assert_eq!(rows[0].team_setup, None);
    }

    #[test]
    fn average_synthesized_when_every_average_is_missing() {
        let t = table(
            &["Role_Name", "Country", "Salary_Min_USD", "Salary_Max_USD", "Salary_Avg_USD"],
            &[&["DevOps Engineer", "Germany", "60000", "80000", "n/a"]],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows[0].salary_avg, 70000.0);
    }

    #[test]
    fn explicit_average_kept_when_any_row_has_one() {
        let t = table(
            &["Role_Name", "Country", "Salary_Min_USD", "Salary_Max_USD", "Salary_Avg_USD"],
            &[
                &["DevOps Engineer", "Germany", "60000", "80000", "72000"],
                &["Cloud Engineer", "Poland", "40000", "60000", ""],
            ],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].salary_avg, 72000.0);
    }

    #[test]
    fn no_average_and_no_bounds_is_an_error() {
        let t = table(&["Role_Name", "Country"], &[&["DevOps Engineer", "Germany"]]);
        let err = extract_salary(&t).unwrap_err();
        assert!(err.to_string().contains("Salary_Avg_USD"));
    }

    #[test]
    fn missing_country_column_is_an_error() {
        let t = table(&["Role_Name", "Salary_Avg_USD"], &[&["DevOps Engineer", "1"]]);
        assert!(matches!(
            extract_salary(&t),
            Err(ReconError::MissingColumn { table: "salary", .. })
        ));
    }

    #[test]
    fn survey_layout_derives_team_setup_from_role() {
        let t = table(
            &["job_role", "country", "salary_min", "salary_max"],
            &[
                &["Senior DevOps Engineer", "Germany", "80000", "100000"],
                &["Junior Cloud Engineer", "Poland", "30000", "40000"],
                &["Platform Engineer", "India", "20000", "30000"],
            ],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].team_setup, Some(TeamSetup::OnSite));
        assert_eq!(rows[0].salary_avg, 90000.0);
        assert_eq!(rows[1].team_setup, Some(TeamSetup::Hybrid));
        assert_eq!(rows[2].team_setup, Some(TeamSetup::Remote));
    }

    #[test]
    fn survey_layout_uses_explicit_team_setup() {
        let t = table(
            &["job_role", "country", "team_setup", "salary_avg"],
            &[&["Senior DevOps Engineer", "Germany", "Remote", "90000"]],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows[0].team_setup, Some(TeamSetup::Remote));
        assert_eq!(rows[0].salary_min, None);
    }

    #[test]
    fn survey_layout_converts_euro_salaries() {
        let t = table(
            &["country", "job_role", "years_of_experience", "salary adjusted to euro "],
            &[
                &["Germany", "DevOps Engineer", "5", "60000"],
                &["Hungary", "Cloud Engineer", "2", "0"],
                &["Poland", "Lead Platform Engineer", "9", ""],
            ],
        );
        let rows = extract_salary(&t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].salary_avg, 60000.0 * EUR_TO_USD);
        assert_eq!(rows[0].salary_min, Some(60000.0 * EUR_MIN_FACTOR));
        assert_eq!(rows[0].salary_max, Some(60000.0 * EUR_MAX_FACTOR));
    }

    #[test]
    fn economic_rows_deduplicated_keeping_first() {
        let t = table(
            &["Country", "Inflation_Rate", "GDP_Growth", "PPP_Adjustment"],
            &[
                &["Germany", "3.1", "1.5", "1.0"],
                &["Germany", "9.9", "9.9", "9.9"],
                &["", "1", "1", "1"],
                &["Spain", "2.8", "2.0", "0.9"],
            ],
        );
        let rows = extract_economic(&t).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "Germany");
        assert_eq!(rows[0].inflation_rate, Some(3.1));
        assert_eq!(rows[0].cost_of_living_index, None);
        assert_eq!(rows[1].country, "Spain");
    }

    #[test]
    fn legal_rows_parse_sentiment() {
        let t = table(
            &["Country", "Labor Laws", "Tax", "Workforce Sentiment"],
            &[
                &["Spain", "EU rules", "Progressive", "very positive"],
                &["Spain", "other", "other", "Negative"],
            ],
        );
        let rows = extract_legal(&t).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].labor_laws.as_deref(), Some("EU rules"));
        assert_eq!(rows[0].tax_implications.as_deref(), Some("Progressive"));
        assert_eq!(rows[0].workforce_sentiment, Some(WorkforceSentiment::VeryPositive));
    }

    #[test]
    fn economic_without_any_match_uses_catalog() {
        let t = table(&["Region", "Notes"], &[&["x", "y"]]);
        assert!(extract_economic(&t).unwrap().is_empty());
    }

    #[test]
    fn salary_only_synthesizes_reference_countries() {
        let t = table(
            &["Role_Name", "Country", "Salary_Avg_USD"],
            &[
                &["DevOps Engineer", "Germany", "70000"],
                &["DevOps Engineer", "Atlantis", "10000"],
                &["Cloud Engineer", "Germany", "75000"],
            ],
        );
        let result = reconcile(&t, &ClassifyConfig::default());
        assert_eq!(result.shape, Some(DatasetShape::SalaryOnly));
        assert_eq!(result.source, DataSource::Uploaded);
        assert_eq!(result.salary.len(), 3);
        assert_eq!(result.economic.len(), 1);
        assert_eq!(result.economic[0].country, "Germany");
        assert_eq!(result.legal.len(), 1);
    }

    #[test]
    fn unusable_table_falls_back_to_defaults() {
        let t = table(&["foo", "bar"], &[&["1", "2"]]);
        let result = reconcile(&t, &ClassifyConfig::default());
        assert!(result.is_default_data());
        assert_eq!(result.shape, None);
        assert_eq!(result.salary.len(), 48);
        assert!(result.fallback_reason.as_deref().unwrap().contains("Role_Name"));
    }

    #[test]
    fn empty_table_falls_back_to_defaults() {
        let result = reconcile(&RawTable::default(), &ClassifyConfig::default());
        assert!(result.is_default_data());
        assert_eq!(result.salary.len(), 48);
    }
}
