//! Pass/fail comparison of applicant answers against configured eligibility rules.

mod date;
mod matcher;
mod operator;
mod values;

pub use matcher::evaluate_criterion;
pub use operator::ComparisonOperator;
pub use values::{AnswerValue, CriterionValues, DateParts, Scalar};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::QuestionId;

/// One eligibility condition attached to an application-form question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRule {
    pub question_id: QuestionId,
    pub operator: ComparisonOperator,
    #[serde(default)]
    pub values: CriterionValues,
}

impl EligibilityRule {
    pub fn evaluate(&self, answer: &AnswerValue) -> bool {
        evaluate_criterion(answer, self.operator, &self.values)
    }
}

/// Verdict recorded for a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleVerdict {
    pub question_id: QuestionId,
    pub operator: ComparisonOperator,
    pub passed: bool,
}

/// Outcome of checking a full rule set against one applicant's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub eligible: bool,
    pub verdicts: Vec<RuleVerdict>,
}

impl EligibilityReport {
    pub fn failed_questions(&self) -> impl Iterator<Item = &QuestionId> {
        self.verdicts
            .iter()
            .filter(|verdict| !verdict.passed)
            .map(|verdict| &verdict.question_id)
    }
}

/// Applies every rule to the answer stored under its question; unanswered questions are
/// evaluated as [`AnswerValue::Missing`]. An empty rule set is eligible.
pub fn check_eligibility(
    rules: &[EligibilityRule],
    answers: &BTreeMap<QuestionId, AnswerValue>,
) -> EligibilityReport {
    let verdicts: Vec<RuleVerdict> = rules
        .iter()
        .map(|rule| {
            let passed = match answers.get(&rule.question_id) {
                Some(answer) => rule.evaluate(answer),
                None => rule.evaluate(&AnswerValue::Missing),
            };
            RuleVerdict {
                question_id: rule.question_id.clone(),
                operator: rule.operator,
                passed,
            }
        })
        .collect();

    EligibilityReport {
        eligible: verdicts.iter().all(|verdict| verdict.passed),
        verdicts,
    }
}
