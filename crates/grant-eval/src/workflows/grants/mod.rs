//! Grant program selection: eligibility rules, weighted criteria, and marking scores.

pub mod domain;
pub mod eligibility;
pub mod import;
pub mod program;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationId, CriterionId, Evaluation, GrantProgramId, QuestionId, QuestionKey};
pub use eligibility::{
    check_eligibility, evaluate_criterion, AnswerValue, ComparisonOperator, CriterionValues,
    DateParts, EligibilityReport, EligibilityRule, RuleVerdict, Scalar,
};
pub use import::{EvaluationCsvImporter, EvaluationImportError};
pub use program::{GrantProgram, GrantProgramStatus};
pub use repository::{EvaluationRepository, ProgramRepository, RepositoryError};
pub use router::{grant_router, EligibilityCheckRequest, RankingView, WeightUpdate};
pub use scoring::{
    compute_marking_score, marking_breakdown, rank_applications, CriterionScore, EvaluationIndex,
    MarkingBreakdown, RankedApplication,
};
pub use selection::{
    add_criterion, redistribute_weights, remove_criterion, total_weight, validate_criteria,
    EvaluationScale, EvaluationType, SelectionCriteriaError, SelectionCriterion, UnknownScale,
    TOTAL_WEIGHT,
};
pub use service::{CriterionDraft, GrantSelectionService, NewGrantProgram, SelectionServiceError};
