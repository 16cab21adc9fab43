use serde::{Deserialize, Serialize};

use super::domain::{CriterionId, GrantProgramId, QuestionKey};
use super::selection::{EvaluationScale, SelectionCriterion};

/// Publication state of a grant program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantProgramStatus {
    #[serde(rename = "DRAFT")]
    Draft,
    #[serde(rename = "PUBLISHED")]
    Published,
}

impl GrantProgramStatus {
    pub const fn label(self) -> &'static str {
        match self {
            GrantProgramStatus::Draft => "DRAFT",
            GrantProgramStatus::Published => "PUBLISHED",
        }
    }
}

/// Grant program together with its ordered selection criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantProgram {
    pub id: GrantProgramId,
    pub title: String,
    pub status: GrantProgramStatus,
    #[serde(default)]
    pub criteria: Vec<SelectionCriterion>,
    /// Bumped by the repository on every successful update.
    #[serde(default)]
    pub revision: u64,
}

impl GrantProgram {
    pub fn draft(id: GrantProgramId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: GrantProgramStatus::Draft,
            criteria: Vec::new(),
            revision: 0,
        }
    }

    /// Criteria may only change while the program is still a draft.
    pub fn is_editable(&self) -> bool {
        self.status == GrantProgramStatus::Draft
    }

    pub fn evaluation_scale(&self) -> Option<EvaluationScale> {
        self.criteria
            .first()
            .map(|criterion| criterion.evaluation_scale)
    }

    pub fn criterion(&self, id: &CriterionId) -> Option<&SelectionCriterion> {
        self.criteria
            .iter()
            .find(|criterion| criterion.id.as_ref() == Some(id))
    }

    pub fn scores_question(&self, key: &QuestionKey) -> bool {
        self.criteria
            .iter()
            .any(|criterion| criterion.question_key().as_ref() == Some(key))
    }
}
