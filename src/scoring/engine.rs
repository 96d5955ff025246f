use std::collections::BTreeMap;
use thiserror::Error;

use super::config::WeightConfig;
use super::criteria::{in_range, Criterion};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("{criterion} rating {value} is outside 1..=10")]
    OutOfRange { criterion: Criterion, value: u8 },
    #[error("no weight configured for rated criterion {criterion}")]
    MissingWeight { criterion: Criterion },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionContribution {
    pub criterion: Criterion,
    pub rating: u8,
    pub weight: f64,
    pub points: f64, // rating * weight / 10
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub contributions: Vec<CriterionContribution>,
}

/// Weighted final score: sum(rating * weight) / 10.
///
/// Weights are percentages, so ten on every criterion with weights summing
/// to 100 yields 100. The result is not normalized by the actual weight sum.
pub fn compute(
    ratings: &BTreeMap<Criterion, u8>,
    weights: &WeightConfig,
) -> Result<f64, ScoreError> {
    let mut sum = 0.0;
    for (criterion, rating) in ratings {
        let weight = checked_weight(*criterion, *rating, weights)?;
        sum += f64::from(*rating) * weight;
    }
    Ok(sum / 10.0)
}

/// Same as [`compute`] but keeps the per-criterion points.
pub fn compute_breakdown(
    ratings: &BTreeMap<Criterion, u8>,
    weights: &WeightConfig,
) -> Result<ScoreBreakdown, ScoreError> {
    let mut contributions = Vec::with_capacity(ratings.len());
    for (criterion, rating) in ratings {
        let weight = checked_weight(*criterion, *rating, weights)?;
        contributions.push(CriterionContribution {
            criterion: *criterion,
            rating: *rating,
            weight,
            points: f64::from(*rating) * weight / 10.0,
        });
    }

    let score = compute(ratings, weights)?;
    Ok(ScoreBreakdown {
        score,
        contributions,
    })
}

fn checked_weight(
    criterion: Criterion,
    rating: u8,
    weights: &WeightConfig,
) -> Result<f64, ScoreError> {
    if !in_range(rating) {
        return Err(ScoreError::OutOfRange {
            criterion,
            value: rating,
        });
    }
    weights
        .get(criterion)
        .ok_or(ScoreError::MissingWeight { criterion })
}
