use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::SelectionConfig;
use crate::workflows::grants::domain::{CriterionId, Evaluation, GrantProgramId, QuestionId};
use crate::workflows::grants::program::GrantProgram;
use crate::workflows::grants::repository::{
    EvaluationRepository, ProgramRepository, RepositoryError,
};
use crate::workflows::grants::selection::{add_criterion, EvaluationScale, SelectionCriterion};
use crate::workflows::grants::service::{CriterionDraft, GrantSelectionService, NewGrantProgram};

pub(super) fn program_id() -> GrantProgramId {
    GrantProgramId::new("gp-test")
}

/// Criterion scored through a form question, weight left for the caller to set.
pub(super) fn question_criterion(name: &str, question_id: &str, weight: u8) -> SelectionCriterion {
    let mut criterion = SelectionCriterion::new(program_id(), name);
    criterion.id = Some(CriterionId::new(format!("sc-{question_id}")));
    criterion.question_id = Some(QuestionId::new(question_id));
    criterion.weight = weight;
    criterion
}

/// Criteria built through the normalizer, one per question.
pub(super) fn balanced_criteria(question_ids: &[&str]) -> Vec<SelectionCriterion> {
    question_ids.iter().fold(Vec::new(), |criteria, question_id| {
        add_criterion(
            &criteria,
            question_criterion(&format!("Criterion {question_id}"), question_id, 0),
        )
    })
}

pub(super) fn build_service() -> (
    GrantSelectionService<MemoryPrograms, MemoryEvaluations>,
    Arc<MemoryPrograms>,
    Arc<MemoryEvaluations>,
) {
    let programs = Arc::new(MemoryPrograms::default());
    let evaluations = Arc::new(MemoryEvaluations::default());
    let service = GrantSelectionService::new(
        programs.clone(),
        evaluations.clone(),
        SelectionConfig::default(),
    );
    (service, programs, evaluations)
}

/// Draft program with one criterion per question, published and ready for evaluations.
pub(super) fn published_program(
    service: &GrantSelectionService<MemoryPrograms, MemoryEvaluations>,
    question_ids: &[&str],
) -> GrantProgram {
    let program = service
        .create_program(NewGrantProgram {
            title: "Community Arts Fund".to_string(),
        })
        .expect("program drafted");
    for question_id in question_ids {
        service
            .add_criterion(
                &program.id,
                CriterionDraft::for_question(format!("Criterion {question_id}"), *question_id),
            )
            .expect("criterion added");
    }
    service.publish(&program.id).expect("program publishes")
}

#[derive(Default, Clone)]
pub(super) struct MemoryPrograms {
    pub(super) records: Arc<Mutex<HashMap<GrantProgramId, GrantProgram>>>,
}

impl ProgramRepository for MemoryPrograms {
    fn insert(&self, program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&program.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(program.id.clone(), program.clone());
        Ok(program)
    }

    fn update(&self, mut program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get(&program.id).ok_or(RepositoryError::NotFound)?;
        if stored.revision != program.revision {
            return Err(RepositoryError::Conflict);
        }
        program.revision += 1;
        guard.insert(program.id.clone(), program.clone());
        Ok(program)
    }

    fn fetch(&self, id: &GrantProgramId) -> Result<Option<GrantProgram>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvaluations {
    events: Arc<Mutex<Vec<(GrantProgramId, Evaluation)>>>,
}

impl MemoryEvaluations {
    pub(super) fn recorded(&self) -> usize {
        self.events.lock().expect("evaluation mutex poisoned").len()
    }
}

impl EvaluationRepository for MemoryEvaluations {
    fn record(
        &self,
        program_id: &GrantProgramId,
        evaluation: Evaluation,
    ) -> Result<(), RepositoryError> {
        self.events
            .lock()
            .expect("evaluation mutex poisoned")
            .push((program_id.clone(), evaluation));
        Ok(())
    }

    fn for_program(&self, program_id: &GrantProgramId) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.events.lock().expect("evaluation mutex poisoned");
        Ok(guard
            .iter()
            .filter(|(owner, _)| owner == program_id)
            .map(|(_, evaluation)| evaluation.clone())
            .collect())
    }
}

/// Shares storage with a [`MemoryPrograms`] but holds the first `parties` fetches until all of
/// them have read the same stored copy.
pub(super) struct GatedPrograms {
    inner: MemoryPrograms,
    gate: Barrier,
    parties: usize,
    fetches: AtomicUsize,
}

impl GatedPrograms {
    pub(super) fn new(inner: MemoryPrograms, parties: usize) -> Self {
        Self {
            inner,
            gate: Barrier::new(parties),
            parties,
            fetches: AtomicUsize::new(0),
        }
    }
}

impl ProgramRepository for GatedPrograms {
    fn insert(&self, program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        self.inner.insert(program)
    }

    fn update(&self, program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        self.inner.update(program)
    }

    fn fetch(&self, id: &GrantProgramId) -> Result<Option<GrantProgram>, RepositoryError> {
        let fetched = self.inner.fetch(id);
        if self.fetches.fetch_add(1, Ordering::SeqCst) < self.parties {
            self.gate.wait();
        }
        fetched
    }
}

pub(super) struct ConflictPrograms;

impl ProgramRepository for ConflictPrograms {
    fn insert(&self, _program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &GrantProgramId) -> Result<Option<GrantProgram>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailablePrograms;

impl ProgramRepository for UnavailablePrograms {
    fn insert(&self, _program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &GrantProgramId) -> Result<Option<GrantProgram>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn scale_config(default_scale: EvaluationScale) -> SelectionConfig {
    SelectionConfig { default_scale }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
