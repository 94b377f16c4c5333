use log::debug;

use crate::config::ClassifyConfig;
use crate::matcher::has_match;
use crate::model::{DatasetShape, RawTable, ECONOMIC_COLUMNS, SALARY_COLUMNS};

/// How many canonical salary and economic names have at least one fuzzy
/// match among the table's columns.
pub fn match_counts(table: &RawTable) -> (usize, usize) {
    let salary = SALARY_COLUMNS
        .iter()
        .filter(|name| has_match(&table.columns, name))
        .count();
    let economic = ECONOMIC_COLUMNS
        .iter()
        .filter(|name| has_match(&table.columns, name))
        .count();
    (salary, economic)
}

/// Decide which reconciliation path an upload takes.
pub fn classify(table: &RawTable, config: &ClassifyConfig) -> DatasetShape {
    let (salary, economic) = match_counts(table);
    let shape = if salary >= config.min_salary_matches && economic >= config.min_economic_matches {
        DatasetShape::Combined
    } else {
        DatasetShape::SalaryOnly
    };
    debug!(
        "classified upload as {shape}: {salary}/{} salary and {economic}/{} economic columns matched",
        SALARY_COLUMNS.len(),
        ECONOMIC_COLUMNS.len()
    );
    shape
}

/// Combined check with the default thresholds (4 salary, 3 economic).
pub fn is_combined(table: &RawTable) -> bool {
    classify(table, &ClassifyConfig::default()) == DatasetShape::Combined
}
