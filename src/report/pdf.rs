//! A4 PDF layout for evaluation reports.
//!
//! Layout is done in millimetres from the top-left corner and converted to
//! PDF points (bottom-left origin) when drawing. Text uses the standard
//! Helvetica fonts, so only printable ASCII is rendered; anything else is
//! replaced with `?`.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use std::borrow::Borrow;

use super::chart::ChartImage;
use super::{Column, ReportOptions, DEFAULT_COLUMNS};
use crate::store::EvaluationRecord;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const CHART_WIDTH: f32 = 180.0;
pub const ROW_HEIGHT: f32 = 10.0;

const BANNER_HEIGHT: f32 = 14.0;
const META_HEIGHT: f32 = 8.0;
const BLOCK_GAP: f32 = 4.0;
const CELL_PADDING: f32 = 2.0;
// Title is inset by two paddings on each side of the banner
const TITLE_WIDTH: f32 = CONTENT_WIDTH - 4.0 * CELL_PADDING;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;
const META_SIZE: f32 = 9.0;
const BORDER_WIDTH: f32 = 1.0; // points

const MM_TO_PT: f32 = 72.0 / 25.4;
// Average Helvetica glyph advance as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.52;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");
const CHART_NAME: Name<'static> = Name(b"Im1");

fn pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Replace anything outside printable ASCII with `?`
pub fn basic_latin(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

/// Shorten text to what fits in `width` millimetres at `size` points
fn fit_text(text: &str, width: f32, size: f32) -> String {
    let glyph_mm = size * AVG_GLYPH_WIDTH / MM_TO_PT;
    let max_chars = ((width / glyph_mm).floor() as usize).max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        text.to_string()
    } else if max_chars > 3 {
        format!("{}...", chars[..max_chars - 3].iter().collect::<String>())
    } else {
        chars[..max_chars].iter().collect()
    }
}

/// Accumulates page content streams while tracking the vertical cursor.
struct PageLayout {
    finished: Vec<Vec<u8>>,
    current: Content,
    cursor: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Content::new(),
            cursor: MARGIN,
        }
    }

    fn bottom() -> f32 {
        PAGE_HEIGHT - MARGIN
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor + height <= Self::bottom()
    }

    fn new_page(&mut self) {
        let done = std::mem::replace(&mut self.current, Content::new());
        self.finished.push(done.finish());
        self.cursor = MARGIN;
    }

    fn text(&mut self, x: f32, baseline: f32, font: Name, size: f32, text: &str) {
        let encoded = basic_latin(text);
        self.current.begin_text();
        self.current.set_font(font, size);
        self.current.next_line(pt(x), pt(PAGE_HEIGHT - baseline));
        self.current.show(Str(encoded.as_bytes()));
        self.current.end_text();
    }

    fn rect(&mut self, x: f32, top: f32, width: f32, height: f32) {
        self.current
            .rect(pt(x), pt(PAGE_HEIGHT - top - height), pt(width), pt(height));
    }

    fn banner(&mut self, title: &str) {
        self.current.set_fill_gray(0.88);
        self.rect(MARGIN, self.cursor, CONTENT_WIDTH, BANNER_HEIGHT);
        self.current.fill_nonzero();
        self.current.set_fill_gray(0.0);

        let title = fit_text(title, TITLE_WIDTH, TITLE_SIZE);
        let baseline = self.cursor + BANNER_HEIGHT * 0.68;
        self.text(MARGIN + CELL_PADDING * 2.0, baseline, FONT_BOLD, TITLE_SIZE, &title);
        self.cursor += BANNER_HEIGHT + BLOCK_GAP / 2.0;
    }

    fn meta_line(&mut self, line: &str) {
        let baseline = self.cursor + META_HEIGHT * 0.6;
        self.text(MARGIN, baseline, FONT_REGULAR, META_SIZE, line);
        self.cursor += META_HEIGHT + BLOCK_GAP;
    }

    /// Chart centered at a fixed width, shrunk only if it would run off the page
    fn chart(&mut self, chart: &ChartImage) {
        let available = Self::bottom() - self.cursor;
        let mut width = CHART_WIDTH;
        let mut height = chart.scaled_height(CHART_WIDTH);
        if height > available {
            width *= available / height;
            height = available;
        }
        let x = (PAGE_WIDTH - width) / 2.0;
        let bottom = PAGE_HEIGHT - self.cursor - height;
        self.current.save_state();
        self.current
            .transform([pt(width), 0.0, 0.0, pt(height), pt(x), pt(bottom)]);
        self.current.x_object(CHART_NAME);
        self.current.restore_state();
        self.cursor += height + BLOCK_GAP;
    }

    fn row(&mut self, cells: &[(f32, String)], header: bool) {
        let top = self.cursor;
        let font = if header { FONT_BOLD } else { FONT_REGULAR };

        if header {
            self.current.set_fill_gray(0.93);
            self.rect(MARGIN, top, CONTENT_WIDTH, ROW_HEIGHT);
            self.current.fill_nonzero();
            self.current.set_fill_gray(0.0);
        }

        self.current.set_line_width(BORDER_WIDTH);
        let mut x = MARGIN;
        for (width, value) in cells {
            self.rect(x, top, *width, ROW_HEIGHT);
            self.current.stroke();
            let value = fit_text(value, width - 2.0 * CELL_PADDING, BODY_SIZE);
            self.text(x + CELL_PADDING, top + ROW_HEIGHT * 0.65, font, BODY_SIZE, &value);
            x += width;
        }
        self.cursor += ROW_HEIGHT;
    }

    fn table<R: Borrow<EvaluationRecord>>(&mut self, columns: &[Column], records: &[R]) {
        let columns = if columns.is_empty() {
            &DEFAULT_COLUMNS[..]
        } else {
            columns
        };
        let total_share: f32 = columns.iter().map(|c| c.width_share()).sum();
        let widths: Vec<f32> = columns
            .iter()
            .map(|c| CONTENT_WIDTH * c.width_share() / total_share)
            .collect();
        let header: Vec<(f32, String)> = widths
            .iter()
            .zip(columns)
            .map(|(w, c)| (*w, c.heading().to_string()))
            .collect();

        // Keep the header together with at least one row
        if !self.fits(ROW_HEIGHT * 2.0) {
            self.new_page();
        }
        self.row(&header, true);

        for record in records {
            if !self.fits(ROW_HEIGHT) {
                self.new_page();
                self.row(&header, true);
            }
            let cells: Vec<(f32, String)> = widths
                .iter()
                .zip(columns)
                .map(|(w, c)| (*w, c.cell(record.borrow())))
                .collect();
            self.row(&cells, false);
        }
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        self.finished.push(self.current.finish());
        self.finished
    }
}

/// Lay out and serialize the whole document.
///
/// Output depends only on the arguments, so identical inputs give identical
/// bytes.
pub fn render_pdf<R: Borrow<EvaluationRecord>>(
    records: &[R],
    options: &ReportOptions,
    chart: Option<&ChartImage>,
) -> Vec<u8> {
    let mut layout = PageLayout::new();
    layout.banner(&options.title);
    layout.meta_line(&format!(
        "Generated: {}",
        options.generated_at.format("%Y-%m-%d %H:%M")
    ));
    if let Some(chart) = chart {
        layout.chart(chart);
    }
    layout.table(&options.columns, records);
    let pages = layout.finish();

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let info_id = Ref::new(5);
    let image_id = Ref::new(6);
    let first_page = 7;

    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(first_page + 2 * i as i32))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);
    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));
    pdf.document_info(info_id)
        .title(TextStr(&basic_latin(&options.title)))
        .producer(TextStr(env!("CARGO_PKG_NAME")));

    if let Some(chart) = chart {
        let mut image = pdf.image_xobject(image_id, &chart.data);
        image.filter(Filter::FlateDecode);
        image.width(chart.width as i32);
        image.height(chart.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();
    }

    for (page_id, data) in page_ids.iter().zip(&pages) {
        let content_id = Ref::new(page_id.get() + 1);

        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, pt(PAGE_WIDTH), pt(PAGE_HEIGHT)));
        page.parent(page_tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        resources
            .fonts()
            .pair(FONT_REGULAR, regular_id)
            .pair(FONT_BOLD, bold_id);
        if chart.is_some() {
            resources.x_objects().pair(CHART_NAME, image_id);
        }
        resources.finish();
        page.finish();

        pdf.stream(content_id, data);
    }

    tracing::debug!(pages = pages.len(), "pdf rendered");
    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::chart::{decode_chart, sample_png};
    use crate::scoring::{Ratings, WeightConfig};
    use crate::store::Evaluation;
    use chrono::NaiveDate;

    fn options() -> ReportOptions {
        ReportOptions {
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            ..ReportOptions::default()
        }
    }

    fn records(n: usize) -> Vec<EvaluationRecord> {
        (0..n)
            .map(|i| {
                let eval = Evaluation::new(
                    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    "Admin",
                    format!("Supplier {}", i),
                    Ratings::new((i % 10 + 1) as u8, 5),
                );
                EvaluationRecord::from_evaluation(eval, &WeightConfig::default()).unwrap()
            })
            .collect()
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle.as_bytes())
            .count()
    }

    #[test]
    fn test_basic_latin() {
        assert_eq!(basic_latin("Acme (EU)"), "Acme (EU)");
        assert_eq!(basic_latin("café"), "caf?");
        assert_eq!(basic_latin("شركة"), "????");
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("Acme", 40.0, BODY_SIZE), "Acme");
        let long = "A".repeat(200);
        let fitted = fit_text(&long, 40.0, BODY_SIZE);
        assert!(fitted.ends_with("..."));
        assert!(fitted.chars().count() < 40);
    }

    #[test]
    fn test_empty_table_single_page() {
        let empty: Vec<EvaluationRecord> = Vec::new();
        let bytes = render_pdf(&empty, &options(), None);
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, "/Count 1"), 1);
        assert_eq!(count(&bytes, "(Supplier)"), 1);
        assert_eq!(count(&bytes, "(Generated: 2024-03-01 09:30)"), 1);
    }

    #[test]
    fn test_rows_rendered_in_order() {
        let recs = records(3);
        let bytes = render_pdf(&recs, &options(), None);
        let text = String::from_utf8_lossy(&bytes);
        let first = text.find("(Supplier 0)").unwrap();
        let second = text.find("(Supplier 1)").unwrap();
        let third = text.find("(Supplier 2)").unwrap();
        assert!(first < second && second < third);
        assert_eq!(count(&bytes, "(10.0%)"), 0);
        assert_eq!(count(&bytes, "(30.0%)"), 1);
    }

    #[test]
    fn test_paginates_and_repeats_header() {
        let recs = records(60);
        let bytes = render_pdf(&recs, &options(), None);
        assert_eq!(count(&bytes, "/Count 3"), 1);
        assert_eq!(count(&bytes, "(Final Score)"), 3);
        assert_eq!(count(&bytes, "(Supplier 59)"), 1);
    }

    #[test]
    fn test_chart_embedded() {
        let chart = decode_chart(&sample_png(6, 3)).unwrap();
        let bytes = render_pdf(&records(2), &options(), Some(&chart));
        assert!(count(&bytes, "/Im1") >= 2);
        assert_eq!(count(&bytes, "/FlateDecode"), 1);
    }

    #[test]
    fn test_square_chart_shares_first_page() {
        // 180mm square chart leaves room for the header and five rows
        let chart = decode_chart(&sample_png(5, 5)).unwrap();
        let bytes = render_pdf(&records(5), &options(), Some(&chart));
        assert_eq!(count(&bytes, "/Count 1"), 1);

        let bytes = render_pdf(&records(6), &options(), Some(&chart));
        assert_eq!(count(&bytes, "/Count 2"), 1);
        assert_eq!(count(&bytes, "(Final Score)"), 2);
    }

    #[test]
    fn test_tall_chart_shrinks_and_pushes_table() {
        // 180mm wide would be 360mm tall; the chart is shrunk to stay on page one
        let chart = decode_chart(&sample_png(1, 2)).unwrap();
        let bytes = render_pdf(&records(1), &options(), Some(&chart));
        assert_eq!(count(&bytes, "/Count 2"), 1);
        assert_eq!(count(&bytes, "(Final Score)"), 1);
    }

    #[test]
    fn test_non_latin_replaced() {
        let eval = Evaluation::new(
            NaiveDate::from_ymd_opt(2023, 10, 25).unwrap(),
            "أحمد",
            "شركة النور",
            Ratings::new(9, 8),
        );
        let record = EvaluationRecord::from_evaluation(eval, &WeightConfig::default()).unwrap();
        let bytes = render_pdf(&[record], &options(), None);
        assert_eq!(count(&bytes, "(???? ?????)"), 1);
        assert_eq!(count(&bytes, "(85.0%)"), 1);
    }

    #[test]
    fn test_deterministic_bytes() {
        let recs = records(5);
        let chart = decode_chart(&sample_png(4, 4)).unwrap();
        let a = render_pdf(&recs, &options(), Some(&chart));
        let b = render_pdf(&recs, &options(), Some(&chart));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_columns() {
        let mut opts = options();
        opts.columns = vec![Column::Date, Column::Supplier, Column::Quality, Column::FinalScore];
        let bytes = render_pdf(&records(1), &opts, None);
        assert_eq!(count(&bytes, "(Quality)"), 1);
        assert_eq!(count(&bytes, "(1/10)"), 1);
        assert_eq!(count(&bytes, "(Employee)"), 0);
    }

    #[test]
    fn test_empty_columns_use_defaults() {
        let mut opts = options();
        opts.columns = Vec::new();
        let bytes = render_pdf(&records(1), &opts, None);
        assert_eq!(count(&bytes, "(Supplier)"), 1);
        assert_eq!(count(&bytes, "(Employee)"), 1);
        assert_eq!(count(&bytes, "(Final Score)"), 1);
        assert_eq!(count(&bytes, "NaN"), 0);
    }

    #[test]
    fn test_long_title_stays_inside_banner() {
        let fitted = fit_text(&"W".repeat(200), TITLE_WIDTH, TITLE_SIZE);
        assert!(fitted.ends_with("..."));
        let glyph_mm = TITLE_SIZE * AVG_GLYPH_WIDTH / MM_TO_PT;
        let right_edge = MARGIN + 2.0 * CELL_PADDING + fitted.chars().count() as f32 * glyph_mm;
        // same inset on the right as on the left
        assert!(right_edge <= MARGIN + CONTENT_WIDTH - 2.0 * CELL_PADDING);
    }
}
