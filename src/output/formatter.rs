use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{ScoreBreakdown, WeightConfig};
use crate::store::EvaluationRecord;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a final score with one decimal (85.0, 66.7)
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to `width` chars; `format!` width counts chars, not bytes
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

fn colored_score(score_padded: &str, score: f64) -> String {
    if score >= 80.0 {
        score_padded.green().bold().to_string()
    } else if score >= 50.0 {
        score_padded.yellow().bold().to_string()
    } else {
        score_padded.red().bold().to_string()
    }
}

/// Format records as a table with columns: Index, Score, Date, Supplier, Employee
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 5 chars wide (fits "100.0")
pub fn format_records_table(records: &[&EvaluationRecord], use_colors: bool) -> String {
    format_records_table_with_width(records, use_colors, get_terminal_width())
}

fn format_records_table_with_width(
    records: &[&EvaluationRecord],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if records.is_empty() {
        return "No evaluations found.".to_string();
    }

    let index_width = 3;
    let score_width = 5;
    let date_width = 10;
    let separator = "  ";

    let employee_width = records
        .iter()
        .map(|r| r.employee().chars().count())
        .max()
        .unwrap_or(0);

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                format_score(record.final_score()),
                width = score_width
            );
            let date = record.date().to_string();

            let fixed_width = index_width
                + 1
                + score_width
                + date_width
                + employee_width
                + separator.len() * 3;
            let supplier = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(record.supplier(), width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate_text(record.supplier(), 20),
                // No terminal (pipe), don't truncate
                None => record.supplier().to_string(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    colored_score(&score_padded, record.final_score()),
                    separator,
                    date.dimmed(),
                    separator,
                    record.employee().cyan(),
                    separator,
                    supplier.bold()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str,
                    score_padded,
                    separator,
                    date,
                    separator,
                    pad(record.employee(), employee_width),
                    separator,
                    supplier
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one record with its per-criterion points (for verbose mode)
pub fn format_record_detail(
    record: &EvaluationRecord,
    breakdown: &ScoreBreakdown,
    use_colors: bool,
) -> String {
    let mut lines = Vec::with_capacity(breakdown.contributions.len() + 2);
    if use_colors {
        lines.push(format!(
            "{}\n  Employee: {}\n  Date: {}",
            record.supplier().bold(),
            record.employee().cyan(),
            record.date()
        ));
    } else {
        lines.push(format!(
            "{}\n  Employee: {}\n  Date: {}",
            record.supplier(),
            record.employee(),
            record.date()
        ));
    }
    for c in &breakdown.contributions {
        lines.push(format!(
            "  {}: {}/10 x {}% = {}",
            c.criterion.label(),
            c.rating,
            c.weight,
            format_score(c.points)
        ));
    }
    lines.push(format!("  Score: {}", format_score(breakdown.score)));
    lines.join("\n")
}

/// A supplier with its mean final score for display
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierAverage {
    pub supplier: String,
    pub average: f64,
}

/// Sort supplier averages best first; ties keep name order so output is stable
pub fn rank_suppliers(averages: HashMap<String, f64>) -> Vec<SupplierAverage> {
    let mut ranked: Vec<SupplierAverage> = averages
        .into_iter()
        .map(|(supplier, average)| SupplierAverage { supplier, average })
        .collect();
    ranked.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.supplier.cmp(&b.supplier))
    });
    ranked
}

/// Format ranked suppliers as "{rank}. {average}  {supplier}"
pub fn format_supplier_ranking(ranked: &[SupplierAverage], use_colors: bool) -> String {
    if ranked.is_empty() {
        return String::new();
    }

    ranked
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>5}", format_score(entry.average));
            if use_colors {
                format!(
                    "{} {}  {}",
                    index_str.dimmed(),
                    colored_score(&score_padded, entry.average),
                    entry.supplier.bold()
                )
            } else {
                format!("{} {}  {}", index_str, score_padded, entry.supplier)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format records as tab-separated values for scripting
/// Columns: date, employee, supplier, final_score (no headers, no colors)
pub fn format_tsv(records: &[&EvaluationRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}",
                r.date(),
                r.employee(),
                r.supplier(),
                format_score(r.final_score())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per weighted criterion, then the total
pub fn format_weights(weights: &WeightConfig, use_colors: bool) -> String {
    let mut lines: Vec<String> = weights
        .iter()
        .map(|(criterion, weight)| {
            if use_colors {
                format!("  {:<9}{:>6}%", criterion.label().cyan(), weight)
            } else {
                format!("  {:<9}{:>6}%", criterion.label(), weight)
            }
        })
        .collect();
    lines.push(format!("  {:<9}{:>6}%", "Total", weights.total()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Criterion, Ratings};
    use crate::store::Evaluation;
    use chrono::NaiveDate;

    fn record(employee: &str, supplier: &str, q: u8, d: u8) -> EvaluationRecord {
        let eval = Evaluation::new(
            NaiveDate::from_ymd_opt(2023, 10, 25).unwrap(),
            employee,
            supplier,
            Ratings::new(q, d),
        );
        EvaluationRecord::from_evaluation(eval, &WeightConfig::default()).unwrap()
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(85.0), "85.0");
        assert_eq!(format_score(66.666), "66.7");
        assert_eq!(format_score(100.0), "100.0");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Al Noor", 20), "Al Noor");
        assert_eq!(truncate_text("Supplier Holdings", 10), "Supplie...");
        assert_eq!(truncate_text("شركة النور", 5), "شر...");
        assert_eq!(truncate_text("abcdef", 2), "ab");
    }

    #[test]
    fn test_records_table_empty() {
        assert_eq!(format_records_table(&[], false), "No evaluations found.");
    }

    #[test]
    fn test_records_table_plain() {
        let a = record("Admin", "Al Noor", 9, 8);
        let b = record("Sara", "Al Amal", 7, 6);
        let table = format_records_table_with_width(&[&a, &b], false, None);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], " 1.  85.0  2023-10-25  Admin  Al Noor");
        assert_eq!(lines[1], " 2.  65.0  2023-10-25  Sara   Al Amal");
    }

    #[test]
    fn test_records_table_truncates_supplier() {
        let a = record("Admin", "An Extremely Long Supplier Name Holdings", 9, 8);
        let table = format_records_table_with_width(&[&a], false, Some(50));
        assert!(table.chars().count() <= 50);
        assert!(table.ends_with("..."));
    }

    #[test]
    fn test_record_detail_lists_points() {
        let a = record("Admin", "Al Noor", 9, 8);
        let breakdown =
            crate::scoring::compute_breakdown(&a.ratings().to_map(), &WeightConfig::default())
                .unwrap();
        let text = format_record_detail(&a, &breakdown, false);
        assert!(text.starts_with("Al Noor\n  Employee: Admin"));
        assert!(text.contains("Quality: 9/10 x 50% = 45.0"));
        assert!(text.contains("Delivery: 8/10 x 50% = 40.0"));
        assert!(text.ends_with("Score: 85.0"));
    }

    #[test]
    fn test_rank_suppliers_descending() {
        let mut averages = HashMap::new();
        averages.insert("B".to_string(), 65.0);
        averages.insert("A".to_string(), 85.0);
        averages.insert("C".to_string(), 65.0);
        let ranked = rank_suppliers(averages);
        let names: Vec<&str> = ranked.iter().map(|r| r.supplier.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_supplier_ranking_plain() {
        let ranked = vec![
            SupplierAverage {
                supplier: "A".to_string(),
                average: 85.0,
            },
            SupplierAverage {
                supplier: "B".to_string(),
                average: 65.0,
            },
        ];
        assert_eq!(
            format_supplier_ranking(&ranked, false),
            " 1.  85.0  A\n 2.  65.0  B"
        );
    }

    #[test]
    fn test_format_tsv() {
        let a = record("Admin", "A", 9, 8);
        assert_eq!(format_tsv(&[&a]), "2023-10-25\tAdmin\tA\t85.0");
    }

    #[test]
    fn test_format_weights_plain() {
        let weights = WeightConfig::from_pairs([(Criterion::Quality, 60.0), (Criterion::Delivery, 30.0)]);
        let text = format_weights(&weights, false);
        assert!(text.contains("Quality"));
        assert!(text.contains("60%"));
        assert!(text.ends_with("Total        90%"));
    }
}
