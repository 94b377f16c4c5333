use serde::Serialize;

/// Lowercase and drop spaces and underscores.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect()
}

/// Fuzzy column match: equal after normalization, or either side contains the
/// other. Short names produce false positives ("tax" inside "syntax"); callers
/// rely on exactly this behavior.
pub fn is_similar(required: &str, candidate: &str) -> bool {
    let req = normalize(required);
    let cand = normalize(candidate);
    req == cand || cand.contains(&req) || req.contains(&cand)
}

/// Ordered mapping from actual input columns to canonical names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    entries: Vec<(String, String)>,
}

impl ColumnMapping {
    /// Map `actual` to `canonical`. A column claimed twice keeps its position
    /// and takes the later canonical name.
    fn insert(&mut self, actual: &str, canonical: &str) {
        match self.entries.iter_mut().find(|(a, _)| a == actual) {
            Some(entry) => entry.1 = canonical.to_string(),
            None => self.entries.push((actual.to_string(), canonical.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (actual, canonical) pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    /// The input column renamed to `canonical`, if any.
    pub fn actual_for(&self, canonical: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| c == canonical)
            .map(|(a, _)| a.as_str())
    }

    /// Column index in `columns` of the input column renamed to `canonical`.
    pub fn index_of(&self, columns: &[String], canonical: &str) -> Option<usize> {
        let actual = self.actual_for(canonical)?;
        columns.iter().position(|c| c == actual)
    }
}

/// For each required name, take the first column (in table order) that
/// matches. Required names with no match are skipped.
pub fn map_columns(columns: &[String], required: &[&str]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    for req in required {
        if let Some(actual) = columns.iter().find(|c| is_similar(req, c)) {
            mapping.insert(actual, req);
        }
    }
    mapping
}

/// True when any column fuzzy-matches `required`.
pub fn has_match(columns: &[String], required: &str) -> bool {
    columns.iter().any(|c| is_similar(required, c))
}

/// Exact-name pre-flight report for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnValidation {
    pub is_valid: bool,
    pub missing_columns: Vec<String>,
    pub extra_columns: Vec<String>,
    pub total_rows: usize,
}

pub fn validate_columns(
    columns: &[String],
    required: &[&str],
    total_rows: usize,
) -> ColumnValidation {
    let missing_columns: Vec<String> = required
        .iter()
        .filter(|r| !columns.iter().any(|c| c.as_str() == **r))
        .map(|r| r.to_string())
        .collect();
    let extra_columns = columns
        .iter()
        .filter(|c| !required.contains(&c.as_str()))
        .cloned()
        .collect();

    ColumnValidation {
        is_valid: missing_columns.is_empty(),
        missing_columns,
        extra_columns,
        total_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ECONOMIC_COLUMNS, SALARY_COLUMNS};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_strips_case_spaces_underscores() {
        assert_eq!(normalize("Salary_Avg USD"), "salaryavgusd");
        assert_eq!(normalize("salary adjusted to euro "), "salaryadjustedtoeuro");
    }

    #[test]
    fn similar_on_equal_and_substring() {
        assert!(is_similar("Role_Name", "role name"));
        assert!(is_similar("Role_Name", "Role"));
        assert!(is_similar("Country", "Country of Residence"));
        assert!(!is_similar("Country", "City"));
    }

    #[test]
    fn short_names_false_positive_is_kept() {
        assert!(is_similar("tax", "syntax"));
        assert!(is_similar("Tax_Implications", "tax"));
    }

    #[test]
    fn first_matching_column_wins() {
        let columns = cols(&["country_code", "Country", "role"]);
        let mapping = map_columns(&columns, &["Country"]);
        assert_eq!(mapping.actual_for("Country"), Some("country_code"));
    }

    #[test]
    fn partial_mapping_is_valid() {
        let columns = cols(&["Role", "Country", "Notes"]);
        let mapping = map_columns(&columns, &SALARY_COLUMNS);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.actual_for("Role_Name"), Some("Role"));
        assert_eq!(mapping.actual_for("Country"), Some("Country"));
        assert_eq!(mapping.actual_for("Salary_Avg_USD"), None);
    }

    #[test]
    fn shared_column_takes_later_canonical() {
        // "Salary" is a substring of all three salary fields; the last claim wins.
        let columns = cols(&["Role", "Country", "Salary"]);
        let mapping = map_columns(&columns, &SALARY_COLUMNS);
        assert_eq!(mapping.actual_for("Salary_Avg_USD"), Some("Salary"));
        assert_eq!(mapping.actual_for("Salary_Min_USD"), None);
        let order: Vec<_> = mapping.iter().map(|(a, _)| a).collect();
        assert_eq!(order, vec!["Role", "Country", "Salary"]);
    }

    #[test]
    fn has_match_counts_economic_vocabulary() {
        let columns = cols(&["Country", "Inflation", "GDP Growth", "Tax"]);
        let hits = ECONOMIC_COLUMNS.iter().filter(|r| has_match(&columns, r)).count();
        assert_eq!(hits, 3);
    }

    #[test]
    fn validate_reports_missing_and_extra() {
        let columns = cols(&["Role_Name", "Country", "Bonus"]);
        let report = validate_columns(&columns, &["Role_Name", "Country", "Team_Setup"], 7);
        assert!(!report.is_valid);
        assert_eq!(report.missing_columns, vec!["Team_Setup"]);
        assert_eq!(report.extra_columns, vec!["Bonus"]);
        assert_eq!(report.total_rows, 7);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn similarity_is_symmetric(a in "[A-Za-z_ ]{0,12}", b in "[A-Za-z_ ]{0,12}") {
                prop_assert_eq!(is_similar(&a, &b), is_similar(&b, &a));
            }

            #[test]
            fn every_name_matches_itself(a in "[A-Za-z_ ]{0,16}") {
                prop_assert!(is_similar(&a, &a));
            }

            #[test]
            fn normalize_is_idempotent(a in "[A-Za-z0-9_ ]{0,16}") {
                let once = normalize(&a);
                prop_assert_eq!(normalize(&once), once.clone());
            }
        }
    }
}
