use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::report::{report_file_name, write_report, ReportFormat, ReportRenderer};
use crate::store::{EmployeeFilter, EvaluationStore};

/// Render the records selected by `filter` and write them to `out_dir`.
///
/// The file is named after the filter: `Report_All.<ext>` or
/// `Report_<employee>.<ext>`. Nothing is written if rendering fails.
pub fn export_report(
    store: &EvaluationStore,
    filter: &EmployeeFilter,
    renderer: &ReportRenderer,
    format: ReportFormat,
    chart_image: Option<&[u8]>,
    out_dir: &Path,
) -> Result<PathBuf> {
    let records = store.filter(filter);
    if records.is_empty() {
        tracing::warn!(filter = filter.label(), "no evaluations match; report has an empty table");
    }

    let bytes = renderer
        .render(&records, format, chart_image)
        .context("Failed to generate report")?;
    write_report(out_dir, &report_file_name(filter.label(), format), &bytes)
}

/// One ticket per record, named after its supplier.
///
/// Records sharing a supplier overwrite each other's ticket, last one wins,
/// and each replacement is logged as a warning.
pub fn export_tickets(
    store: &EvaluationStore,
    renderer: &ReportRenderer,
    format: ReportFormat,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(store.len());
    for record in store.all() {
        let bytes = renderer
            .render_ticket(record, format)
            .with_context(|| format!("Failed to generate ticket for {}", record.supplier()))?;
        let path = write_report(out_dir, &report_file_name(record.supplier(), format), &bytes)?;
        if written.contains(&path) {
            tracing::warn!(
                supplier = record.supplier(),
                path = %path.display(),
                "ticket replaced by a later evaluation of the same supplier"
            );
        } else {
            written.push(path);
        }
    }
    Ok(written)
}
