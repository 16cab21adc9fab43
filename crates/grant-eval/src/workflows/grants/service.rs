use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SelectionConfig;

use super::domain::{
    ApplicationId, CriterionId, Evaluation, GrantProgramId, QuestionId, QuestionKey,
};
use super::program::{GrantProgram, GrantProgramStatus};
use super::repository::{EvaluationRepository, ProgramRepository, RepositoryError};
use super::scoring::{
    marking_breakdown, rank_applications, EvaluationIndex, MarkingBreakdown, RankedApplication,
};
use super::selection::{
    self, validate_criteria, EvaluationScale, EvaluationType, SelectionCriteriaError,
    SelectionCriterion, TOTAL_WEIGHT,
};

/// Service composing program storage, evaluation storage, and the selection rules.
pub struct GrantSelectionService<P, E> {
    programs: Arc<P>,
    evaluations: Arc<E>,
    config: SelectionConfig,
}

static PROGRAM_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CRITERION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_program_id() -> GrantProgramId {
    let id = PROGRAM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    GrantProgramId(format!("gp-{id:06}"))
}

fn next_criterion_id() -> CriterionId {
    let id = CRITERION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CriterionId(format!("sc-{id:06}"))
}

/// Payload for drafting a new grant program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrantProgram {
    pub title: String,
}

/// Provider input for a new selection criterion. Weight is always assigned by redistribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionDraft {
    pub criterion_name: String,
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub question_group_id: Option<QuestionId>,
    #[serde(default)]
    pub evaluation_type: EvaluationType,
    #[serde(default)]
    pub evaluation_scale: Option<EvaluationScale>,
}

impl CriterionDraft {
    pub fn for_question(criterion_name: impl Into<String>, question_id: impl Into<String>) -> Self {
        Self {
            criterion_name: criterion_name.into(),
            question_id: Some(QuestionId::new(question_id)),
            question_group_id: None,
            evaluation_type: EvaluationType::Manual,
            evaluation_scale: None,
        }
    }

    pub fn custom(criterion_name: impl Into<String>) -> Self {
        Self {
            criterion_name: criterion_name.into(),
            question_id: None,
            question_group_id: None,
            evaluation_type: EvaluationType::Manual,
            evaluation_scale: None,
        }
    }
}

impl<P, E> GrantSelectionService<P, E>
where
    P: ProgramRepository + 'static,
    E: EvaluationRepository + 'static,
{
    pub fn new(programs: Arc<P>, evaluations: Arc<E>, config: SelectionConfig) -> Self {
        Self {
            programs,
            evaluations,
            config,
        }
    }

    /// Draft a new grant program without criteria.
    pub fn create_program(
        &self,
        request: NewGrantProgram,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let program = GrantProgram::draft(next_program_id(), request.title);
        let stored = self.programs.insert(program)?;
        info!(program_id = %stored.id, "grant program drafted");
        Ok(stored)
    }

    pub fn program(
        &self,
        program_id: &GrantProgramId,
    ) -> Result<GrantProgram, SelectionServiceError> {
        self.programs
            .fetch(program_id)?
            .ok_or_else(|| SelectionServiceError::ProgramNotFound(program_id.clone()))
    }

    /// Append a criterion and split the weights evenly across the whole set.
    pub fn add_criterion(
        &self,
        program_id: &GrantProgramId,
        draft: CriterionDraft,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let mut program = self.editable_program(program_id)?;

        let evaluation_scale = match (draft.evaluation_scale, program.evaluation_scale()) {
            (Some(requested), Some(existing)) if requested != existing => {
                return Err(SelectionCriteriaError::MixedScales {
                    expected: existing,
                    found: requested,
                }
                .into());
            }
            (Some(requested), _) => requested,
            (None, Some(existing)) => existing,
            (None, None) => self.config.default_scale,
        };

        let criterion = SelectionCriterion {
            id: Some(next_criterion_id()),
            grant_program_id: program.id.clone(),
            criterion_name: draft.criterion_name,
            question_id: draft.question_id,
            question_group_id: draft.question_group_id,
            weight: 0,
            evaluation_type: draft.evaluation_type,
            evaluation_scale,
        };

        program.criteria = selection::add_criterion(&program.criteria, criterion);
        let program = self.programs.update(program)?;

        info!(
            program_id = %program.id,
            criteria = program.criteria.len(),
            "selection criterion added"
        );
        Ok(program)
    }

    /// Remove a criterion. Remaining weights are left as they are.
    pub fn remove_criterion(
        &self,
        program_id: &GrantProgramId,
        criterion_id: &CriterionId,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let mut program = self.editable_program(program_id)?;
        if program.criterion(criterion_id).is_none() {
            return Err(SelectionServiceError::CriterionNotFound(criterion_id.clone()));
        }

        program.criteria = selection::remove_criterion(&program.criteria, criterion_id);
        let program = self.programs.update(program)?;

        let total = selection::total_weight(&program.criteria);
        if total != TOTAL_WEIGHT {
            warn!(
                program_id = %program.id,
                total_weight = total,
                "selection criteria no longer total 100 until weights are edited"
            );
        }
        Ok(program)
    }

    /// Manually set one criterion's weight.
    pub fn set_weight(
        &self,
        program_id: &GrantProgramId,
        criterion_id: &CriterionId,
        weight: u8,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let mut program = self.editable_program(program_id)?;
        let Some(criterion) = program
            .criteria
            .iter_mut()
            .find(|criterion| criterion.id.as_ref() == Some(criterion_id))
        else {
            return Err(SelectionServiceError::CriterionNotFound(criterion_id.clone()));
        };

        if u32::from(weight) > TOTAL_WEIGHT {
            return Err(SelectionCriteriaError::WeightOutOfRange {
                criterion_name: criterion.criterion_name.clone(),
                weight,
            }
            .into());
        }
        criterion.weight = weight;

        let program = self.programs.update(program)?;
        debug!(
            program_id = %program.id,
            criterion_id = %criterion_id,
            weight,
            total_weight = selection::total_weight(&program.criteria),
            "selection criterion weight edited"
        );
        Ok(program)
    }

    /// Re-split weights evenly, e.g. after a removal left the total short of 100.
    pub fn redistribute_weights(
        &self,
        program_id: &GrantProgramId,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let mut program = self.editable_program(program_id)?;
        program.criteria = selection::redistribute_weights(&program.criteria);
        Ok(self.programs.update(program)?)
    }

    /// Freeze the criteria set. Publishing an already published program is a no-op.
    pub fn publish(
        &self,
        program_id: &GrantProgramId,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let mut program = self.program(program_id)?;
        if program.status == GrantProgramStatus::Published {
            return Ok(program);
        }

        if let Err(error) = validate_criteria(&program.criteria) {
            warn!(program_id = %program.id, %error, "publish rejected");
            return Err(error.into());
        }

        program.status = GrantProgramStatus::Published;
        let program = self.programs.update(program)?;
        info!(
            program_id = %program.id,
            criteria = program.criteria.len(),
            "grant program published"
        );
        Ok(program)
    }

    /// Store one evaluator's score for an application on a question scored by the program.
    pub fn record_evaluation(
        &self,
        program_id: &GrantProgramId,
        evaluation: Evaluation,
    ) -> Result<Evaluation, SelectionServiceError> {
        let program = self.program(program_id)?;
        if program.is_editable() {
            return Err(SelectionServiceError::ProgramNotPublished(program.id));
        }

        let question_key = evaluation
            .question_key()
            .ok_or(SelectionServiceError::MissingQuestion)?;
        if !program.scores_question(&question_key) {
            return Err(SelectionServiceError::UnknownQuestion(question_key));
        }

        let scale = program
            .evaluation_scale()
            .unwrap_or(self.config.default_scale);
        if !scale.accepts(evaluation.value) {
            return Err(SelectionServiceError::ScoreOutOfRange {
                value: evaluation.value,
                scale,
            });
        }

        self.evaluations.record(&program.id, evaluation.clone())?;
        debug!(
            program_id = %program.id,
            application_id = %evaluation.application_id,
            question_key = %question_key,
            value = evaluation.value,
            "evaluation recorded"
        );
        Ok(evaluation)
    }

    /// Weighted score for one application. Applications nobody evaluated score zero.
    pub fn marking_score(
        &self,
        program_id: &GrantProgramId,
        application_id: &ApplicationId,
    ) -> Result<MarkingBreakdown, SelectionServiceError> {
        let program = self.program(program_id)?;
        let index = self.evaluation_index(&program.id)?;
        let breakdown = marking_breakdown(application_id, &program.criteria, &index);
        debug!(
            program_id = %program.id,
            application_id = %application_id,
            total_score = breakdown.total_score,
            "marking score computed"
        );
        Ok(breakdown)
    }

    /// Every evaluated application ranked by marking score.
    pub fn ranking(
        &self,
        program_id: &GrantProgramId,
    ) -> Result<Vec<RankedApplication>, SelectionServiceError> {
        let program = self.program(program_id)?;
        let index = self.evaluation_index(&program.id)?;
        Ok(rank_applications(&program.criteria, &index))
    }

    fn evaluation_index(
        &self,
        program_id: &GrantProgramId,
    ) -> Result<EvaluationIndex, SelectionServiceError> {
        let evaluations = self.evaluations.for_program(program_id)?;
        Ok(EvaluationIndex::from_evaluations(evaluations))
    }

    fn editable_program(
        &self,
        program_id: &GrantProgramId,
    ) -> Result<GrantProgram, SelectionServiceError> {
        let program = self.program(program_id)?;
        if !program.is_editable() {
            warn!(program_id = %program.id, "selection criteria are read-only once published");
            return Err(SelectionServiceError::ProgramLocked(program.id));
        }
        Ok(program)
    }
}

/// Error raised by the selection service.
#[derive(Debug, thiserror::Error)]
pub enum SelectionServiceError {
    #[error("grant program {0} not found")]
    ProgramNotFound(GrantProgramId),
    #[error("selection criterion {0} not found")]
    CriterionNotFound(CriterionId),
    #[error("grant program {0} is published; its selection criteria are read-only")]
    ProgramLocked(GrantProgramId),
    #[error("grant program {0} is still a draft; evaluations open once it is published")]
    ProgramNotPublished(GrantProgramId),
    #[error("evaluation must reference a question or question group")]
    MissingQuestion,
    #[error("question {0} is not scored by any selection criterion")]
    UnknownQuestion(QuestionKey),
    #[error("score {value} is outside the {scale} evaluation scale")]
    ScoreOutOfRange { value: f64, scale: EvaluationScale },
    #[error(transparent)]
    Criteria(#[from] SelectionCriteriaError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
