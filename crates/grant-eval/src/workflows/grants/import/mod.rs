//! Bulk evaluation import from CSV exports.

mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{ApplicationId, Evaluation, QuestionId};
use super::selection::EvaluationScale;

#[derive(Debug)]
pub enum EvaluationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingQuestion { line: u64 },
    InvalidValue { line: u64, value: String },
}

impl std::fmt::Display for EvaluationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationImportError::Io(err) => {
                write!(f, "failed to read evaluation export: {}", err)
            }
            EvaluationImportError::Csv(err) => write!(f, "invalid evaluation CSV data: {}", err),
            EvaluationImportError::MissingQuestion { line } => write!(
                f,
                "line {}: evaluation names neither a question nor a question group",
                line
            ),
            EvaluationImportError::InvalidValue { line, value } => {
                write!(f, "line {}: '{}' is not a valid score", line, value)
            }
        }
    }
}

impl std::error::Error for EvaluationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationImportError::Io(err) => Some(err),
            EvaluationImportError::Csv(err) => Some(err),
            EvaluationImportError::MissingQuestion { .. }
            | EvaluationImportError::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for EvaluationImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for EvaluationImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads exports with the columns `Application ID`, `Question ID`, `Question Group ID`, `Value`.
///
/// Values are numeric scores within the importer's scale; on the A2E scale a letter grade is
/// accepted as well.
pub struct EvaluationCsvImporter {
    scale: EvaluationScale,
}

impl EvaluationCsvImporter {
    pub fn new(scale: EvaluationScale) -> Self {
        Self { scale }
    }

    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<Evaluation>, EvaluationImportError> {
        let file = std::fs::File::open(path)?;
        self.from_reader(file)
    }

    pub fn from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<Evaluation>, EvaluationImportError> {
        let mut evaluations = Vec::new();

        for row in parser::parse_rows(reader)? {
            if row.question_id.is_none() && row.question_group_id.is_none() {
                return Err(EvaluationImportError::MissingQuestion { line: row.line });
            }

            let value = self
                .parse_value(&row.value)
                .ok_or_else(|| EvaluationImportError::InvalidValue {
                    line: row.line,
                    value: row.value.clone(),
                })?;

            evaluations.push(Evaluation {
                application_id: ApplicationId(row.application_id),
                question_id: row.question_id.map(QuestionId),
                question_group_id: row.question_group_id.map(QuestionId),
                value,
            });
        }

        Ok(evaluations)
    }

    fn parse_value(&self, raw: &str) -> Option<f64> {
        let value = match raw.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(grade), None) => self.scale.grade_value(grade),
                    _ => None,
                }
            }
        };
        value.filter(|value| self.scale.accepts(*value))
    }
}
