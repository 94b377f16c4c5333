use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Canonical vocabulary
// ---------------------------------------------------------------------------

pub const ROLE_NAME: &str = "Role_Name";
pub const COUNTRY: &str = "Country";
pub const TEAM_SETUP: &str = "Team_Setup";
pub const SALARY_MIN: &str = "Salary_Min_USD";
pub const SALARY_MAX: &str = "Salary_Max_USD";
pub const SALARY_AVG: &str = "Salary_Avg_USD";

pub const INFLATION_RATE: &str = "Inflation_Rate";
pub const PPP_ADJUSTMENT: &str = "PPP_Adjustment";
pub const GDP_GROWTH: &str = "GDP_Growth";
pub const COST_OF_LIVING_INDEX: &str = "Cost_of_Living_Index";

pub const LABOR_LAWS: &str = "Labor_Laws";
pub const TAX_IMPLICATIONS: &str = "Tax_Implications";
pub const WORKFORCE_SENTIMENT: &str = "Workforce_Sentiment";

pub const SALARY_COLUMNS: [&str; 6] = [
    ROLE_NAME,
    COUNTRY,
    TEAM_SETUP,
    SALARY_MIN,
    SALARY_MAX,
    SALARY_AVG,
];

pub const ECONOMIC_COLUMNS: [&str; 5] = [
    COUNTRY,
    INFLATION_RATE,
    PPP_ADJUSTMENT,
    GDP_GROWTH,
    COST_OF_LIVING_INDEX,
];

pub const LEGAL_COLUMNS: [&str; 4] = [COUNTRY, LABOR_LAWS, TAX_IMPLICATIONS, WORKFORCE_SENTIMENT];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell of an uploaded table. Nothing is assumed about its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Empty,
    Number(f64),
    Text(String),
}

static EMPTY: RawValue = RawValue::Empty;

impl RawValue {
    pub fn is_missing(&self) -> bool {
        self.as_text().is_none()
    }

    /// Trimmed text form, `None` for empty or blank cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Number(n) if n.is_nan() => None,
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    /// Numeric coercion. Currency symbols and thousands separators are
    /// stripped; anything that still does not parse is missing.
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Self::Empty => return None,
            Self::Number(n) => *n,
            Self::Text(s) => s
                .replace(|c: char| matches!(c, '€' | '$' | ','), "")
                .trim()
                .parse::<f64>()
                .ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// An uploaded table of unknown schema, already decoded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    /// Build a table, padding short rows with `Empty` and cutting long ones.
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<RawValue>>,
    ) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, RawValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact (case-sensitive) column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, col: usize) -> &RawValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &RawValue> + '_ {
        (0..self.rows.len()).map(move |row| self.value(row, col))
    }
}

// ---------------------------------------------------------------------------
// Canonical enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TeamSetup {
    OnSite,
    Hybrid,
    Remote,
    Other(String),
}

impl TeamSetup {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OnSite => "On-site",
            Self::Hybrid => "Hybrid",
            Self::Remote => "Remote",
            Self::Other(s) => s,
        }
    }

    /// Team setup implied by seniority words in a job title.
    pub fn from_role_name(role: &str) -> Self {
        let role = role.to_lowercase();
        if role.contains("senior") || role.contains("lead") {
            Self::OnSite
        } else if role.contains("junior") {
            Self::Hybrid
        } else {
            Self::Remote
        }
    }
}

impl From<&str> for TeamSetup {
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | ' ' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "onsite" => Self::OnSite,
            "hybrid" => Self::Hybrid,
            "remote" => Self::Remote,
            _ => Self::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for TeamSetup {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<TeamSetup> for String {
    fn from(t: TeamSetup) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TeamSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkforceSentiment {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl WorkforceSentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::VeryPositive => "Very Positive",
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for WorkforceSentiment {
    fn from(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "verypositive" => Self::VeryPositive,
            "positive" => Self::Positive,
            "neutral" => Self::Neutral,
            "negative" => Self::Negative,
            _ => Self::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for WorkforceSentiment {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<WorkforceSentiment> for String {
    fn from(w: WorkforceSentiment) -> Self {
        w.as_str().to_string()
    }
}

impl fmt::Display for WorkforceSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Canonical rows
// ---------------------------------------------------------------------------

/// One cleaned salary observation. `salary_avg` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRow {
    pub role: String,
    pub country: String,
    pub team_setup: Option<TeamSetup>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicRow {
    pub country: String,
    pub inflation_rate: Option<f64>,
    pub ppp_adjustment: Option<f64>,
    pub gdp_growth: Option<f64>,
    pub cost_of_living_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalRow {
    pub country: String,
    pub labor_laws: Option<String>,
    pub tax_implications: Option<String>,
    pub workforce_sentiment: Option<WorkforceSentiment>,
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetShape {
    /// Salary, economic and legal columns side by side.
    Combined,
    SalaryOnly,
}

impl fmt::Display for DatasetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combined => write!(f, "combined"),
            Self::SalaryOnly => write!(f, "salary_only"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Uploaded,
    Defaults,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => write!(f, "uploaded"),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// Canonical salary, economic and legal tables for one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciled {
    /// `None` when the synthetic demo dataset replaced the upload.
    pub shape: Option<DatasetShape>,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub salary: Vec<SalaryRow>,
    pub economic: Vec<EconomicRow>,
    pub legal: Vec<LegalRow>,
}

impl Reconciled {
    pub fn is_default_data(&self) -> bool {
        self.source == DataSource::Defaults
    }

    /// Distinct salary countries in first-seen order.
    pub fn countries(&self) -> Vec<&str> {
        distinct(self.salary.iter().map(|r| r.country.as_str()))
    }
}

/// First-seen distinct values.
pub fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Exact-match salary filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryFilter {
    pub country: Option<String>,
    pub role: Option<String>,
    pub team_setup: Option<TeamSetup>,
}

impl SalaryFilter {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.role.is_none() && self.team_setup.is_none()
    }

    pub fn matches(&self, row: &SalaryRow) -> bool {
        self.country.as_ref().map_or(true, |c| *c == row.country)
            && self.role.as_ref().map_or(true, |r| *r == row.role)
            && self
                .team_setup
                .as_ref()
                .map_or(true, |t| row.team_setup.as_ref() == Some(t))
    }

    pub fn apply(&self, rows: &[SalaryRow]) -> Vec<SalaryRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_strips_currency() {
        assert_eq!(RawValue::from("€70,000").to_number(), Some(70000.0));
        assert_eq!(RawValue::from(" $1,250.50 ").to_number(), Some(1250.5));
        assert_eq!(RawValue::from("n/a").to_number(), None);
        assert_eq!(RawValue::from("NaN").to_number(), None);
        assert_eq!(RawValue::Empty.to_number(), None);
        assert_eq!(RawValue::Number(42.0).to_number(), Some(42.0));
    }

    #[test]
    fn blank_text_is_missing() {
        assert!(RawValue::from("   ").is_missing());
        assert!(RawValue::Text("  ".into()).is_missing());
        assert!(!RawValue::from("Germany").is_missing());
    }

    #[test]
    fn table_pads_short_rows() {
        let table = RawTable::new(
            ["a", "b", "c"],
            vec![vec![RawValue::from("1")], vec![RawValue::from("1"); 4]],
        );
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.value(0, 2), &RawValue::Empty);
        assert_eq!(table.value(9, 9), &RawValue::Empty);
    }

    #[test]
    fn team_setup_parsing_is_lenient() {
        assert_eq!(TeamSetup::from("On-site"), TeamSetup::OnSite);
        assert_eq!(TeamSetup::from("onsite"), TeamSetup::OnSite);
        assert_eq!(TeamSetup::from("ON SITE"), TeamSetup::OnSite);
        assert_eq!(TeamSetup::from("remote"), TeamSetup::Remote);
        assert_eq!(TeamSetup::from("Office"), TeamSetup::Other("Office".into()));
    }

    #[test]
    fn team_setup_from_role_name() {
        assert_eq!(TeamSetup::from_role_name("Senior DevOps Engineer"), TeamSetup::OnSite);
        assert_eq!(TeamSetup::from_role_name("Team Lead"), TeamSetup::OnSite);
        assert_eq!(TeamSetup::from_role_name("Junior Cloud Engineer"), TeamSetup::Hybrid);
        assert_eq!(TeamSetup::from_role_name("Platform Engineer"), TeamSetup::Remote);
    }

    #[test]
    fn team_setup_serializes_as_label() {
        let json = serde_json::to_string(&TeamSetup::OnSite).unwrap();
        assert_eq!(json, "\"On-site\"");
        let back: TeamSetup = serde_json::from_str("\"Hybrid\"").unwrap();
        assert_eq!(back, TeamSetup::Hybrid);
    }

    #[test]
    fn sentiment_parsing() {
        assert_eq!(WorkforceSentiment::from("Very Positive"), WorkforceSentiment::VeryPositive);
        assert_eq!(WorkforceSentiment::from("neutral"), WorkforceSentiment::Neutral);
        assert_eq!(
            WorkforceSentiment::from("Mixed"),
            WorkforceSentiment::Other("Mixed".into())
        );
    }

    #[test]
    fn filter_matches_all_fields() {
        let row = SalaryRow {
            role: "Cloud Engineer".into(),
            country: "Poland".into(),
            team_setup: Some(TeamSetup::Remote),
            salary_min: None,
            salary_max: None,
            salary_avg: 55000.0,
        };
        assert!(SalaryFilter::default().matches(&row));
        let filter = SalaryFilter {
            country: Some("Poland".into()),
            role: None,
            team_setup: Some(TeamSetup::Remote),
        };
        assert!(filter.matches(&row));
        let filter = SalaryFilter {
            team_setup: Some(TeamSetup::Hybrid),
            ..SalaryFilter::default()
        };
        assert!(!filter.matches(&row));
    }
}
