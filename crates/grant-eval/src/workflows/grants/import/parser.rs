use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct EvaluationRow {
    pub(crate) line: u64,
    pub(crate) application_id: String,
    pub(crate) question_id: Option<String>,
    pub(crate) question_group_id: Option<String>,
    pub(crate) value: String,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<EvaluationRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        // physical line the record starts on
        let line = record.position().map(csv::Position::line).unwrap_or_default();
        let row: RawEvaluationRow = record.deserialize(Some(&headers))?;
        rows.push(EvaluationRow {
            line,
            application_id: row.application_id,
            question_id: row.question_id,
            question_group_id: row.question_group_id,
            value: row.value,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawEvaluationRow {
    #[serde(rename = "Application ID")]
    application_id: String,
    #[serde(
        rename = "Question ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    question_id: Option<String>,
    #[serde(
        rename = "Question Group ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    question_group_id: Option<String>,
    #[serde(rename = "Value")]
    value: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
