//! Selection criteria and the weight normalizer keeping their weights at 100.

mod domain;
mod weights;

pub use domain::{EvaluationScale, EvaluationType, SelectionCriterion, UnknownScale};
pub use weights::{
    add_criterion, redistribute_weights, remove_criterion, total_weight, validate_criteria,
    SelectionCriteriaError, TOTAL_WEIGHT,
};
