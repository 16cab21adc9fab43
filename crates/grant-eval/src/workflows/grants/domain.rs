use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a grant program owned by a provider.
    GrantProgramId
);
string_id!(
    /// Identifier wrapper for submitted applications.
    ApplicationId
);
string_id!(
    /// Persisted identifier of a selection criterion.
    CriterionId
);
string_id!(
    /// Identifier of an application-form question or question group.
    QuestionId
);
string_id!(
    /// Key under which evaluations for one scored dimension are grouped.
    QuestionKey
);

impl From<&QuestionId> for QuestionKey {
    fn from(value: &QuestionId) -> Self {
        Self(value.0.clone())
    }
}

impl From<&CriterionId> for QuestionKey {
    fn from(value: &CriterionId) -> Self {
        Self(value.0.clone())
    }
}

/// One evaluator's numeric score for one application on one question or question group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub application_id: ApplicationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_group_id: Option<QuestionId>,
    pub value: f64,
}

impl Evaluation {
    pub fn for_question(
        application_id: impl Into<String>,
        question_id: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            application_id: ApplicationId::new(application_id),
            question_id: Some(QuestionId::new(question_id)),
            question_group_id: None,
            value,
        }
    }

    pub fn for_question_group(
        application_id: impl Into<String>,
        question_group_id: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            application_id: ApplicationId::new(application_id),
            question_id: None,
            question_group_id: Some(QuestionId::new(question_group_id)),
            value,
        }
    }

    /// A question id wins over a question group id when both are present.
    pub fn question_key(&self) -> Option<QuestionKey> {
        self.question_id
            .as_ref()
            .or(self.question_group_id.as_ref())
            .map(QuestionKey::from)
    }
}
