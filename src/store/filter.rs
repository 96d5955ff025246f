use std::borrow::Borrow;
use std::collections::HashMap;

use super::types::EvaluationRecord;

/// Sentinel accepted wherever an employee name selects records.
pub const ALL_EMPLOYEES: &str = "ALL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmployeeFilter {
    #[default]
    All,
    Named(String),
}

impl EmployeeFilter {
    /// `"ALL"` selects everything; any other string is an exact,
    /// case-sensitive employee name.
    pub fn parse(name: &str) -> Self {
        if name == ALL_EMPLOYEES {
            EmployeeFilter::All
        } else {
            EmployeeFilter::Named(name.to_string())
        }
    }

    pub fn matches(&self, record: &EvaluationRecord) -> bool {
        match self {
            EmployeeFilter::All => true,
            EmployeeFilter::Named(name) => record.employee() == name,
        }
    }

    /// Label used in report file names and headings
    pub fn label(&self) -> &str {
        match self {
            EmployeeFilter::All => "All",
            EmployeeFilter::Named(name) => name,
        }
    }
}

/// Keep records matching the filter, preserving their order
pub fn filter_records<'a>(
    records: &'a [EvaluationRecord],
    filter: &EmployeeFilter,
) -> Vec<&'a EvaluationRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Mean final score per distinct supplier over any record set
pub fn average_by_supplier<R: Borrow<EvaluationRecord>>(records: &[R]) -> HashMap<String, f64> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in records {
        let record = record.borrow();
        let entry = totals.entry(record.supplier()).or_insert((0.0, 0));
        entry.0 += record.final_score();
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(supplier, (sum, count))| (supplier.to_string(), sum / count as f64))
        .collect()
}
