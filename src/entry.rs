use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};

use crate::output::format_score;
use crate::prompt::Prompter;
use crate::scoring::{Criterion, Ratings, WeightConfig, MAX_RATING, MIN_RATING};
use crate::store::{Evaluation, EvaluationError, EvaluationStore};

fn check_rating(rating: &u8) -> Result<(), String> {
    if (MIN_RATING..=MAX_RATING).contains(rating) {
        Ok(())
    } else {
        Err(format!("must be between {} and {}", MIN_RATING, MAX_RATING))
    }
}

fn prompt_rating<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    criterion: Criterion,
) -> Result<u8> {
    p.prompt_parsed(
        &format!("{} ({}-{})", criterion.label(), MIN_RATING, MAX_RATING),
        "5",
        check_rating,
    )
}

/// Optional criteria can be skipped with "-"
fn prompt_optional_rating<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    criterion: Criterion,
) -> Result<Option<u8>> {
    loop {
        let raw = p.prompt_with_default(
            &format!("{} ({}-{}, - to skip)", criterion.label(), MIN_RATING, MAX_RATING),
            "-",
        )?;
        if raw == "-" {
            return Ok(None);
        }
        match raw.parse::<u8>() {
            Ok(v) => match check_rating(&v) {
                Ok(()) => return Ok(Some(v)),
                Err(e) => p.say(&format!("  Invalid: {}. Try again.", e))?,
            },
            Err(_) => p.say(&format!("  Invalid: '{}' is not a number. Try again.", raw))?,
        }
    }
}

fn prompt_date<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<NaiveDate> {
    let today = Local::now().date_naive().to_string();
    loop {
        let raw = p.prompt_with_default("Date (YYYY-MM-DD)", &today)?;
        match raw.parse::<NaiveDate>() {
            Ok(date) => return Ok(date),
            Err(_) => p.say(&format!("  Invalid: '{}' is not a date. Try again.", raw))?,
        }
    }
}

/// Collect evaluations one form at a time into `store`.
///
/// Only the criteria that carry a weight are asked for; price and support
/// stay unrated otherwise. A rejected submission prints the reason and
/// leaves the store untouched. Returns the number of accepted records.
pub fn run_entry_session<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    store: &mut EvaluationStore,
    weights: &WeightConfig,
) -> Result<usize> {
    let mut accepted = 0;
    let mut last_employee = String::new();

    loop {
        p.say("")?;
        let employee = if last_employee.is_empty() {
            p.prompt("Employee: ")?
        } else {
            p.prompt_with_default("Employee", &last_employee)?
        };
        let supplier = p.prompt("Supplier: ")?;
        let date = prompt_date(p)?;

        let mut ratings = Ratings::new(
            prompt_rating(p, Criterion::Quality)?,
            prompt_rating(p, Criterion::Delivery)?,
        );
        if weights.get(Criterion::Price).is_some() {
            ratings.price = prompt_optional_rating(p, Criterion::Price)?;
        }
        if weights.get(Criterion::Support).is_some() {
            ratings.support = prompt_optional_rating(p, Criterion::Support)?;
        }

        let evaluation = Evaluation::new(date, employee.clone(), supplier, ratings);
        match store.submit(evaluation, weights) {
            Ok(record) => {
                p.say(&format!(
                    "  Saved: {} scored {}%",
                    record.supplier(),
                    format_score(record.final_score())
                ))?;
                accepted += 1;
                last_employee = employee;
            }
            Err(EvaluationError::Validation(e)) => {
                p.say(&format!("  Not saved: {}", e))?;
            }
            Err(e) => return Err(e.into()),
        }

        if !p.prompt_yes_no("Add another evaluation?", true)? {
            break;
        }
    }

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_two_forms_default_weights() {
        let input = "Admin\nA\n2023-10-25\n9\n8\ny\n\nB\n2023-10-26\n7\n6\nn\n";
        let mut p = prompter(input);
        let mut store = EvaluationStore::new();
        let accepted = run_entry_session(&mut p, &mut store, &WeightConfig::default()).unwrap();

        assert_eq!(accepted, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().final_score(), 85.0);
        // employee defaulted to the previous one
        assert_eq!(store.get(1).unwrap().employee(), "Admin");
        assert_eq!(store.get(1).unwrap().final_score(), 65.0);

        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("Saved: A scored 85.0%"));
    }

    #[test]
    fn test_blank_supplier_not_saved() {
        let input = "Admin\n\n2023-10-25\n9\n8\nn\n";
        let mut p = prompter(input);
        let mut store = EvaluationStore::new();
        let accepted = run_entry_session(&mut p, &mut store, &WeightConfig::default()).unwrap();

        assert_eq!(accepted, 0);
        assert!(store.is_empty());
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("Not saved: supplier: must not be empty"));
    }

    #[test]
    fn test_optional_criteria_prompted_when_weighted() {
        let weights = WeightConfig::from_pairs([
            (Criterion::Quality, 40.0),
            (Criterion::Delivery, 30.0),
            (Criterion::Price, 20.0),
            (Criterion::Support, 10.0),
        ]);
        // out-of-range and bad date inputs are re-asked
        let input = "Admin\nA\nyesterday\n2023-10-25\n11\n8\n7\n6\n-\nn\n";
        let mut p = prompter(input);
        let mut store = EvaluationStore::new();
        run_entry_session(&mut p, &mut store, &weights).unwrap();

        let ratings = store.get(0).unwrap().ratings();
        assert_eq!(ratings.quality, 8);
        assert_eq!(ratings.delivery, 7);
        assert_eq!(ratings.price, Some(6));
        assert_eq!(ratings.support, None);

        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("is not a date"));
        assert!(out.contains("must be between 1 and 10"));
    }
}
