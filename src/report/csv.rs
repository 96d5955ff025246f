use std::borrow::Borrow;

use super::RenderError;
use crate::store::EvaluationRecord;

/// UTF-8 byte-order mark so spreadsheet tools pick the right encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 8] = [
    "date",
    "employee",
    "supplier",
    "quality",
    "delivery",
    "price",
    "support",
    "final_score",
];

fn optional(value: Option<u8>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// One row per record under a fixed header. Absent ratings are empty cells.
pub fn render_csv<R: Borrow<EvaluationRecord>>(records: &[R]) -> Result<Vec<u8>, RenderError> {
    let mut writer = ::csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        let record = record.borrow();
        let ratings = record.ratings();
        writer.write_record([
            record.date().to_string(),
            record.employee().to_string(),
            record.supplier().to_string(),
            ratings.quality.to_string(),
            ratings.delivery.to_string(),
            optional(ratings.price),
            optional(ratings.support),
            format!("{:.1}", record.final_score()),
        ])?;
    }

    writer.into_inner().map_err(|e| RenderError::Io(e.into_error()))
}
