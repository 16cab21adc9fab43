use super::domain::{Evaluation, GrantProgramId};
use super::program::GrantProgram;

/// Storage abstraction for grant programs and their selection criteria.
pub trait ProgramRepository: Send + Sync {
    fn insert(&self, program: GrantProgram) -> Result<GrantProgram, RepositoryError>;
    /// Stores `program` only if the stored copy still has `program.revision`, returning the
    /// stored copy with the revision bumped. A stale revision is a [`RepositoryError::Conflict`].
    fn update(&self, program: GrantProgram) -> Result<GrantProgram, RepositoryError>;
    fn fetch(&self, id: &GrantProgramId) -> Result<Option<GrantProgram>, RepositoryError>;
}

/// Append-only store of evaluator submissions, listed in bulk per grant program.
pub trait EvaluationRepository: Send + Sync {
    fn record(
        &self,
        program_id: &GrantProgramId,
        evaluation: Evaluation,
    ) -> Result<(), RepositoryError>;
    fn for_program(&self, program_id: &GrantProgramId) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
