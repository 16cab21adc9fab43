use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::domain::{CriterionId, GrantProgramId, QuestionId, QuestionKey};

/// Whether evaluators score a criterion by hand or the platform scores it automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluationType {
    #[default]
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "AUTO")]
    Auto,
}

/// Range evaluators score within; shared by every criterion of a grant program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluationScale {
    #[default]
    #[serde(rename = "HUNDRED")]
    Hundred,
    #[serde(rename = "TEN")]
    Ten,
    #[serde(rename = "FIVE")]
    Five,
    /// Letter grades A..E, recorded numerically with A = 5 down to E = 1.
    #[serde(rename = "A2E")]
    A2E,
}

impl EvaluationScale {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationScale::Hundred => "HUNDRED",
            EvaluationScale::Ten => "TEN",
            EvaluationScale::Five => "FIVE",
            EvaluationScale::A2E => "A2E",
        }
    }

    /// Inclusive `(min, max)` bounds for one evaluator score.
    pub const fn score_range(self) -> (f64, f64) {
        match self {
            EvaluationScale::Hundred => (0.0, 100.0),
            EvaluationScale::Ten => (0.0, 10.0),
            EvaluationScale::Five => (0.0, 5.0),
            EvaluationScale::A2E => (1.0, 5.0),
        }
    }

    pub fn accepts(self, value: f64) -> bool {
        let (min, max) = self.score_range();
        value.is_finite() && value >= min && value <= max
    }

    pub fn grade_value(self, grade: char) -> Option<f64> {
        if self != EvaluationScale::A2E {
            return None;
        }

        match grade.to_ascii_uppercase() {
            'A' => Some(5.0),
            'B' => Some(4.0),
            'C' => Some(3.0),
            'D' => Some(2.0),
            'E' => Some(1.0),
            _ => None,
        }
    }
}

impl fmt::Display for EvaluationScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown evaluation scale '{0}' (expected HUNDRED, TEN, FIVE, or A2E)")]
pub struct UnknownScale(pub String);

impl FromStr for EvaluationScale {
    type Err = UnknownScale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HUNDRED" => Ok(EvaluationScale::Hundred),
            "TEN" => Ok(EvaluationScale::Ten),
            "FIVE" => Ok(EvaluationScale::Five),
            "A2E" => Ok(EvaluationScale::A2E),
            _ => Err(UnknownScale(value.to_string())),
        }
    }
}

/// One weighted, scored dimension used to rank applications to a grant program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCriterion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CriterionId>,
    pub grant_program_id: GrantProgramId,
    pub criterion_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_group_id: Option<QuestionId>,
    /// Integer percentage in `0..=100`.
    #[serde(default)]
    pub weight: u8,
    #[serde(default)]
    pub evaluation_type: EvaluationType,
    #[serde(default)]
    pub evaluation_scale: EvaluationScale,
}

impl SelectionCriterion {
    pub fn new(grant_program_id: GrantProgramId, criterion_name: impl Into<String>) -> Self {
        Self {
            id: None,
            grant_program_id,
            criterion_name: criterion_name.into(),
            question_id: None,
            question_group_id: None,
            weight: 0,
            evaluation_type: EvaluationType::Manual,
            evaluation_scale: EvaluationScale::Hundred,
        }
    }

    /// Evaluations for this criterion are grouped under its question, then its question group,
    /// then its own id for custom criteria that are not linked to the form.
    pub fn question_key(&self) -> Option<QuestionKey> {
        self.question_id
            .as_ref()
            .or(self.question_group_id.as_ref())
            .map(QuestionKey::from)
            .or_else(|| self.id.as_ref().map(QuestionKey::from))
    }
}
