use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::{self, Criterion, Ratings, ScoreError, WeightConfig, MAX_RATING, MIN_RATING};

/// A rejected field on an evaluation. Only the first invalid field is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One supplier assessment as submitted by an employee.
///
/// Example JSON:
/// ```json
/// {"date": "2023-10-25", "employee": "Ahmed", "supplier": "Al Noor", "quality": 9, "delivery": 8}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Evaluation {
    /// Evaluation date (defaults to today when omitted)
    #[serde(default = "today")]
    pub date: NaiveDate,
    pub employee: String,
    pub supplier: String,
    pub quality: u8,
    #[serde(alias = "time")]
    pub delivery: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<u8>,
}

impl Evaluation {
    pub fn new(
        date: NaiveDate,
        employee: impl Into<String>,
        supplier: impl Into<String>,
        ratings: Ratings,
    ) -> Self {
        Self {
            date,
            employee: employee.into(),
            supplier: supplier.into(),
            quality: ratings.quality,
            delivery: ratings.delivery,
            price: ratings.price,
            support: ratings.support,
        }
    }

    pub fn ratings(&self) -> Ratings {
        Ratings {
            quality: self.quality,
            delivery: self.delivery,
            price: self.price,
            support: self.support,
        }
    }

    /// Check required fields in order: employee, supplier, then each rating.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.employee.trim().is_empty() {
            return Err(ValidationError::new("employee", "must not be empty"));
        }
        if self.supplier.trim().is_empty() {
            return Err(ValidationError::new("supplier", "must not be empty"));
        }

        let ratings = self.ratings();
        for criterion in Criterion::ALL {
            if let Some(rating) = ratings.get(criterion) {
                if !scoring::criteria::in_range(rating) {
                    return Err(ValidationError::new(
                        criterion.as_str(),
                        format!(
                            "must be between {} and {}, got {}",
                            MIN_RATING, MAX_RATING, rating
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A scored evaluation.
///
/// The final score is computed once from the ratings and the active weights;
/// fields are read-only so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    #[serde(flatten)]
    evaluation: Evaluation,
    final_score: f64,
}

impl EvaluationRecord {
    pub fn from_evaluation(
        evaluation: Evaluation,
        weights: &WeightConfig,
    ) -> Result<Self, ScoreError> {
        let final_score = scoring::compute(&evaluation.ratings().to_map(), weights)?;
        Ok(Self {
            evaluation,
            final_score,
        })
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn date(&self) -> NaiveDate {
        self.evaluation.date
    }

    pub fn employee(&self) -> &str {
        &self.evaluation.employee
    }

    pub fn supplier(&self) -> &str {
        &self.evaluation.supplier
    }

    pub fn ratings(&self) -> Ratings {
        self.evaluation.ratings()
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }
}
