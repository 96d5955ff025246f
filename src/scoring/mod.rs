pub mod config;
pub mod criteria;
pub mod engine;
pub mod validation;

pub use config::*;
pub use criteria::{Criterion, Ratings, MAX_RATING, MIN_RATING};
pub use engine::{compute, compute_breakdown, CriterionContribution, ScoreBreakdown, ScoreError};
pub use validation::validate_weights;
