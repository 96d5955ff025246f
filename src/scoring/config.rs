use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::criteria::Criterion;

const SUM_TOLERANCE: f64 = 1e-9;

/// Percentage weight per criterion.
///
/// Weights are expected to sum to 100, but a different total is only a
/// warning: the score is then expressed on a non-100 basis.
///
/// Example YAML:
/// ```yaml
/// weights:
///   quality: 40
///   delivery: 30
///   price: 20
///   support: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct WeightConfig {
    weights: BTreeMap<Criterion, f64>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::from_pairs([(Criterion::Quality, 50.0), (Criterion::Delivery, 50.0)])
    }
}

impl WeightConfig {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Criterion, f64)>,
    {
        Self {
            weights: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.weights.get(&criterion).copied()
    }

    pub fn set(&mut self, criterion: Criterion, weight: f64) {
        self.weights.insert(criterion, weight);
    }

    pub fn remove(&mut self, criterion: Criterion) -> Option<f64> {
        self.weights.remove(&criterion)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (*c, *w))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Message shown when the weights do not add up to 100
    pub fn sum_warning(&self) -> Option<String> {
        let total = self.total();
        if (total - 100.0).abs() > SUM_TOLERANCE {
            Some(format!(
                "weights sum to {} instead of 100; scores will not be on a 0-100 basis",
                total
            ))
        } else {
            None
        }
    }
}
