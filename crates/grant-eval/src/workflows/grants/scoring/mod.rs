//! Weighted marking scores computed from evaluator submissions.

mod index;

pub use index::EvaluationIndex;

use serde::Serialize;

use super::domain::{ApplicationId, QuestionKey};
use super::selection::SelectionCriterion;

/// Contribution of one selection criterion to an application's marking score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion_name: String,
    pub question_key: QuestionKey,
    pub weight: u8,
    pub evaluator_count: usize,
    pub average_score: f64,
    pub weighted_score: f64,
}

/// Marking score with the per-criterion trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingBreakdown {
    pub application_id: ApplicationId,
    pub total_score: f64,
    pub components: Vec<CriterionScore>,
}

/// Position of one application in a program-wide ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedApplication {
    pub rank: usize,
    pub application_id: ApplicationId,
    pub total_score: f64,
    pub evaluated_criteria: usize,
}

/// Sum over criteria of `average evaluator score * weight / 100`.
///
/// Criteria without a question key or without any evaluation contribute nothing, and the
/// remaining weights are not rescaled to make up for them.
pub fn compute_marking_score(
    application_id: &ApplicationId,
    criteria: &[SelectionCriterion],
    evaluations: &EvaluationIndex,
) -> f64 {
    marking_breakdown(application_id, criteria, evaluations).total_score
}

pub fn marking_breakdown(
    application_id: &ApplicationId,
    criteria: &[SelectionCriterion],
    evaluations: &EvaluationIndex,
) -> MarkingBreakdown {
    let mut components = Vec::new();
    let mut total_score = 0.0;

    for criterion in criteria {
        let Some(question_key) = criterion.question_key() else {
            continue;
        };
        let recorded = evaluations.lookup(application_id, &question_key);
        if recorded.is_empty() {
            continue;
        }

        let sum: f64 = recorded.iter().map(|evaluation| evaluation.value).sum();
        let average_score = sum / recorded.len() as f64;
        let weighted_score = average_score * f64::from(criterion.weight) / 100.0;
        total_score += weighted_score;

        components.push(CriterionScore {
            criterion_name: criterion.criterion_name.clone(),
            question_key,
            weight: criterion.weight,
            evaluator_count: recorded.len(),
            average_score,
            weighted_score,
        });
    }

    MarkingBreakdown {
        application_id: application_id.clone(),
        total_score,
        components,
    }
}

/// Ranks every application with at least one evaluation, highest score first. Ties keep
/// application-id order.
pub fn rank_applications(
    criteria: &[SelectionCriterion],
    evaluations: &EvaluationIndex,
) -> Vec<RankedApplication> {
    let mut breakdowns: Vec<MarkingBreakdown> = evaluations
        .application_ids()
        .map(|application_id| marking_breakdown(application_id, criteria, evaluations))
        .collect();

    breakdowns.sort_by(|left, right| {
        right
            .total_score
            .total_cmp(&left.total_score)
            .then_with(|| left.application_id.cmp(&right.application_id))
    });

    breakdowns
        .into_iter()
        .enumerate()
        .map(|(position, breakdown)| RankedApplication {
            rank: position + 1,
            application_id: breakdown.application_id,
            total_score: breakdown.total_score,
            evaluated_criteria: breakdown.components.len(),
        })
        .collect()
}
