use std::collections::BTreeMap;

use super::super::domain::{ApplicationId, Evaluation, QuestionKey};

/// Evaluations grouped by application, then by question key.
///
/// Every evaluator's record is retained; repeated inserts for the same pair accumulate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationIndex {
    by_application: BTreeMap<ApplicationId, BTreeMap<QuestionKey, Vec<Evaluation>>>,
}

impl EvaluationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reshapes a bulk evaluation listing. Records without a question key are dropped.
    pub fn from_evaluations<I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = Evaluation>,
    {
        let mut index = Self::new();
        for evaluation in evaluations {
            index.insert(evaluation);
        }
        index
    }

    /// Returns `false` when the evaluation names neither a question nor a question group.
    pub fn insert(&mut self, evaluation: Evaluation) -> bool {
        let Some(question_key) = evaluation.question_key() else {
            return false;
        };

        self.by_application
            .entry(evaluation.application_id.clone())
            .or_default()
            .entry(question_key)
            .or_default()
            .push(evaluation);
        true
    }

    pub fn lookup(
        &self,
        application_id: &ApplicationId,
        question_key: &QuestionKey,
    ) -> &[Evaluation] {
        self.by_application
            .get(application_id)
            .and_then(|questions| questions.get(question_key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn application_ids(&self) -> impl Iterator<Item = &ApplicationId> {
        self.by_application.keys()
    }

    pub fn len(&self) -> usize {
        self.by_application
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_application.is_empty()
    }
}
