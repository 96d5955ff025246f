pub mod chart;
pub mod csv;
pub mod pdf;
pub mod writer;

pub use chart::{decode_chart, ChartImage};
pub use writer::write_report;

use chrono::{Local, NaiveDateTime};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::store::EvaluationRecord;

pub const REPORT_TITLE: &str = "Supplier Evaluation Report";
pub const TICKET_TITLE: &str = "Supplier Evaluation Ticket";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart image could not be decoded: {0}")]
    ImageDecode(#[source] image::ImageError),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("report serialization failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("unsupported report format '{}' (expected pdf or csv)", other)),
        }
    }
}

/// A column of the PDF results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Employee,
    Supplier,
    Quality,
    Delivery,
    Price,
    Support,
    FinalScore,
}

impl Column {
    pub fn heading(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Employee => "Employee",
            Column::Supplier => "Supplier",
            Column::Quality => "Quality",
            Column::Delivery => "Delivery",
            Column::Price => "Price",
            Column::Support => "Support",
            Column::FinalScore => "Final Score",
        }
    }

    /// Relative width when the table is spread across the content area
    fn width_share(&self) -> f32 {
        match self {
            Column::Employee | Column::Supplier => 2.0,
            Column::Date | Column::FinalScore => 1.2,
            Column::Quality | Column::Delivery | Column::Price | Column::Support => 1.0,
        }
    }

    fn cell(&self, record: &EvaluationRecord) -> String {
        let ratings = record.ratings();
        let rating = |r: Option<u8>| r.map(|v| format!("{}/10", v)).unwrap_or_else(|| "-".into());
        match self {
            Column::Date => record.date().to_string(),
            Column::Employee => record.employee().to_string(),
            Column::Supplier => record.supplier().to_string(),
            Column::Quality => rating(Some(ratings.quality)),
            Column::Delivery => rating(Some(ratings.delivery)),
            Column::Price => rating(ratings.price),
            Column::Support => rating(ratings.support),
            Column::FinalScore => format_percent(record.final_score()),
        }
    }
}

pub const DEFAULT_COLUMNS: [Column; 3] = [Column::Supplier, Column::Employee, Column::FinalScore];

/// Final score as shown in documents: one decimal and a percent sign
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    /// Printed on the timestamp line; injected so output is reproducible
    pub generated_at: NaiveDateTime,
    /// PDF table columns. CSV always uses the full field list.
    pub columns: Vec<Column>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            generated_at: Local::now().naive_local(),
            columns: DEFAULT_COLUMNS.to_vec(),
        }
    }
}

/// Turns evaluation records into PDF or CSV bytes.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    options: ReportOptions,
}

impl ReportRenderer {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Render records in order.
    ///
    /// An empty slice produces a header-only table. A chart that fails to
    /// decode is dropped with a warning and the rest of the report is kept.
    pub fn render<R: Borrow<EvaluationRecord>>(
        &self,
        records: &[R],
        format: ReportFormat,
        chart_image: Option<&[u8]>,
    ) -> Result<Vec<u8>, RenderError> {
        tracing::debug!(records = records.len(), %format, "rendering report");
        match format {
            ReportFormat::Csv => {
                if chart_image.is_some() {
                    tracing::debug!("chart image ignored for CSV output");
                }
                csv::render_csv(records)
            }
            ReportFormat::Pdf => {
                let chart = match chart_image.map(decode_chart) {
                    Some(Ok(chart)) => Some(chart),
                    Some(Err(e)) => {
                        tracing::warn!("omitting chart from report: {}", e);
                        None
                    }
                    None => None,
                };
                Ok(pdf::render_pdf(records, &self.options, chart.as_ref()))
            }
        }
    }

    /// Single-record report using the same table layout
    pub fn render_ticket(
        &self,
        record: &EvaluationRecord,
        format: ReportFormat,
    ) -> Result<Vec<u8>, RenderError> {
        let ticket = ReportRenderer::new(ReportOptions {
            title: TICKET_TITLE.to_string(),
            ..self.options.clone()
        });
        ticket.render(&[record], format, None)
    }
}

/// `Report_<supplier>.<ext>` with path-unsafe characters replaced by `_`
pub fn report_file_name(supplier: &str, format: ReportFormat) -> String {
    let safe: String = supplier
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Report_{}.{}", safe, format.extension())
}
