use super::config::WeightConfig;
use super::criteria::Criterion;

/// Validate a weight configuration at startup.
///
/// Returns the warnings on success and all errors at once (not just the
/// first) on failure. A sum other than 100 is a warning, never an error.
pub fn validate_weights(weights: &WeightConfig) -> Result<Vec<String>, Vec<String>> {
    let mut errors = Vec::new();

    if weights.is_empty() {
        errors.push("weights: at least one criterion must be weighted".to_string());
    }

    for (criterion, weight) in weights.iter() {
        if !weight.is_finite() {
            errors.push(format!("weights.{}: must be a finite number", criterion));
        } else if weight < 0.0 {
            errors.push(format!(
                "weights.{}: must be non-negative, got {}",
                criterion, weight
            ));
        }
    }

    if !weights.is_empty() {
        for criterion in Criterion::REQUIRED {
            if weights.get(criterion).is_none() {
                errors.push(format!(
                    "weights.{}: required, every evaluation rates {}",
                    criterion, criterion
                ));
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut warnings = Vec::new();
    if let Some(warning) = weights.sum_warning() {
        tracing::warn!(total = weights.total(), "{}", warning);
        warnings.push(warning);
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Ratings;
    use crate::store::{Evaluation, EvaluationRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_valid_weights() {
        let weights = WeightConfig::default();
        assert_eq!(validate_weights(&weights), Ok(vec![]));
    }

    #[test]
    fn test_empty_weights() {
        let mut weights = WeightConfig::default();
        weights.remove(Criterion::Quality);
        weights.remove(Criterion::Delivery);
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least one"));
    }

    #[test]
    fn test_negative_weight() {
        let weights =
            WeightConfig::from_pairs([(Criterion::Quality, 110.0), (Criterion::Delivery, -10.0)]);
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("weights.delivery"));
    }

    #[test]
    fn test_non_finite_weight() {
        let weights = WeightConfig::from_pairs([(Criterion::Quality, f64::NAN)]);
        let errors = validate_weights(&weights).unwrap_err();
        assert!(errors[0].contains("finite"));
    }

    #[test]
    fn test_sum_mismatch_is_warning() {
        let weights =
            WeightConfig::from_pairs([(Criterion::Quality, 60.0), (Criterion::Delivery, 30.0)]);
        let warnings = validate_weights(&weights).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("90"));
    }

    #[test]
    fn test_collects_all_errors() {
        let weights = WeightConfig::from_pairs([
            (Criterion::Quality, -1.0),
            (Criterion::Price, f64::INFINITY),
        ]);
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[2].contains("weights.delivery: required"));
    }

    #[test]
    fn test_missing_required_weight() {
        let weights =
            WeightConfig::from_pairs([(Criterion::Quality, 70.0), (Criterion::Price, 30.0)]);
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors, vec!["weights.delivery: required, every evaluation rates delivery"]);

        // the same weights could never score a submission
        let eval = Evaluation::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            "Admin",
            "A",
            Ratings::new(9, 8),
        );
        assert!(EvaluationRecord::from_evaluation(eval, &weights).is_err());
    }

    #[test]
    fn test_optional_weights_may_be_absent() {
        let weights =
            WeightConfig::from_pairs([(Criterion::Quality, 50.0), (Criterion::Delivery, 50.0)]);
        assert!(validate_weights(&weights).is_ok());
    }
}
