use grant_eval::workflows::grants::{
    Evaluation, EvaluationRepository, GrantProgram, GrantProgramId, ProgramRepository,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProgramRepository {
    records: Arc<Mutex<HashMap<GrantProgramId, GrantProgram>>>,
}

impl ProgramRepository for InMemoryProgramRepository {
    fn insert(&self, program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("program store poisoned".to_string()))?;
        if guard.contains_key(&program.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(program.id.clone(), program.clone());
        Ok(program)
    }

    fn update(&self, mut program: GrantProgram) -> Result<GrantProgram, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("program store poisoned".to_string()))?;
        let Some(stored) = guard.get(&program.id) else {
            return Err(RepositoryError::NotFound);
        };
        if stored.revision != program.revision {
            return Err(RepositoryError::Conflict);
        }

        program.revision += 1;
        guard.insert(program.id.clone(), program.clone());
        Ok(program)
    }

    fn fetch(&self, id: &GrantProgramId) -> Result<Option<GrantProgram>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("program store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Evaluations kept per program in submission order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<GrantProgramId, Vec<Evaluation>>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn record(
        &self,
        program_id: &GrantProgramId,
        evaluation: Evaluation,
    ) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("evaluation store poisoned".to_string()))?;
        guard
            .entry(program_id.clone())
            .or_default()
            .push(evaluation);
        Ok(())
    }

    fn for_program(&self, program_id: &GrantProgramId) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("evaluation store poisoned".to_string()))?;
        Ok(guard.get(program_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_require_an_existing_program() {
        let repository = InMemoryProgramRepository::default();
        let program = GrantProgram::draft(GrantProgramId::new("gp-1"), "Arts");

        match repository.update(program.clone()) {
            Err(RepositoryError::NotFound) => {}
            other => panic!("expected not found, got {other:?}"),
        }
        repository.insert(program.clone()).expect("insert succeeds");
        match repository.insert(program) {
            Err(RepositoryError::Conflict) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn stale_revisions_are_rejected() {
        let repository = InMemoryProgramRepository::default();
        let program = repository
            .insert(GrantProgram::draft(GrantProgramId::new("gp-1"), "Arts"))
            .expect("insert succeeds");

        let updated = repository
            .update(program.clone())
            .expect("first update succeeds");
        assert_eq!(updated.revision, 1);

        match repository.update(program) {
            Err(RepositoryError::Conflict) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
        let stored = repository
            .fetch(&updated.id)
            .expect("fetch succeeds")
            .expect("program present");
        assert_eq!(stored.revision, 1);
    }

    #[test]
    fn evaluations_are_listed_per_program() {
        let repository = InMemoryEvaluationRepository::default();
        let arts = GrantProgramId::new("gp-arts");
        let sport = GrantProgramId::new("gp-sport");
        repository
            .record(&arts, Evaluation::for_question("app-1", "q-1", 70.0))
            .expect("record succeeds");
        repository
            .record(&arts, Evaluation::for_question("app-1", "q-1", 90.0))
            .expect("record succeeds");

        assert_eq!(repository.for_program(&arts).expect("list").len(), 2);
        assert!(repository.for_program(&sport).expect("list").is_empty());
    }
}
