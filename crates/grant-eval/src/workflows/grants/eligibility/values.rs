use serde::{Deserialize, Serialize};

/// Calendar date kept as the three strings a date picker submits (base-1 month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateParts {
    pub fn new(day: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            month: month.into(),
            year: year.into(),
        }
    }

    /// Joins the parts as `year-MM-DD`, left-padding month and day to two characters.
    pub fn to_date_string(&self) -> String {
        format!("{}-{:0>2}-{:0>2}", self.year, self.month, self.day)
    }
}

/// Primitive answer or comparison target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn text(value: impl Into<String>) -> Self {
        Scalar::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub(crate) fn lowercased(&self) -> Scalar {
        match self {
            Scalar::Text(text) => Scalar::Text(text.to_lowercase()),
            other => other.clone(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

/// Applicant answer with its shape fixed at ingestion.
///
/// JSON `{day, month, year}` objects become [`AnswerValue::Date`] and arrays of them
/// [`AnswerValue::DateList`]. Arrays of primitives become [`AnswerValue::List`], primitives
/// [`AnswerValue::Scalar`], and `null` [`AnswerValue::Missing`]. An empty array is a `List`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Date(DateParts),
    List(Vec<Scalar>),
    DateList(Vec<DateParts>),
    Scalar(Scalar),
    #[default]
    Missing,
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Scalar(Scalar::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        AnswerValue::Scalar(Scalar::Number(value))
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        AnswerValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Defined, non-null, and not an empty string.
    pub fn is_present(&self) -> bool {
        match self {
            AnswerValue::Missing => false,
            AnswerValue::Scalar(Scalar::Text(text)) => !text.is_empty(),
            _ => true,
        }
    }

    pub(crate) fn lowercased(&self) -> AnswerValue {
        match self {
            AnswerValue::Scalar(scalar) => AnswerValue::Scalar(scalar.lowercased()),
            AnswerValue::List(items) => {
                AnswerValue::List(items.iter().map(Scalar::lowercased).collect())
            }
            other => other.clone(),
        }
    }
}

impl From<DateParts> for AnswerValue {
    fn from(value: DateParts) -> Self {
        AnswerValue::Date(value)
    }
}

impl From<Scalar> for AnswerValue {
    fn from(value: Scalar) -> Self {
        AnswerValue::Scalar(value)
    }
}

/// Ordered comparison targets attached to an operator.
///
/// A non-empty `Dates` set switches the matcher into date mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValues {
    Scalars(Vec<Scalar>),
    Dates(Vec<DateParts>),
}

impl CriterionValues {
    pub fn scalars<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        CriterionValues::Scalars(items.into_iter().map(Into::into).collect())
    }

    pub fn dates<I>(items: I) -> Self
    where
        I: IntoIterator<Item = DateParts>,
    {
        CriterionValues::Dates(items.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CriterionValues::Scalars(items) => items.is_empty(),
            CriterionValues::Dates(items) => items.is_empty(),
        }
    }
}

impl Default for CriterionValues {
    fn default() -> Self {
        CriterionValues::Scalars(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn date_string_pads_month_and_day() {
        let parts = DateParts::new("5", "7", "2025");
        assert_eq!(parts.to_date_string(), "2025-07-05");

        let padded = DateParts::new("22", "07", "2025");
        assert_eq!(padded.to_date_string(), "2025-07-22");
    }

    #[test]
    fn answers_take_their_shape_from_json() {
        let date: AnswerValue =
            serde_json::from_value(json!({ "day": "22", "month": "07", "year": "2025" }))
                .expect("date answer");
        assert_eq!(date, AnswerValue::Date(DateParts::new("22", "07", "2025")));

        let dates: AnswerValue =
            serde_json::from_value(json!([{ "day": "1", "month": "2", "year": "2024" }]))
                .expect("date list answer");
        assert!(matches!(dates, AnswerValue::DateList(ref items) if items.len() == 1));

        let list: AnswerValue = serde_json::from_value(json!(["a", 3, true])).expect("list");
        assert_eq!(
            list,
            AnswerValue::List(vec![
                Scalar::text("a"),
                Scalar::Number(3.0),
                Scalar::Boolean(true)
            ])
        );

        let empty: AnswerValue = serde_json::from_value(json!([])).expect("empty list");
        assert_eq!(empty, AnswerValue::List(Vec::new()));

        let missing: AnswerValue = serde_json::from_value(json!(null)).expect("null answer");
        assert_eq!(missing, AnswerValue::Missing);
    }

    #[test]
    fn criterion_values_detect_date_targets() {
        let values: CriterionValues =
            serde_json::from_value(json!([{ "day": "21", "month": "07", "year": "2025" }]))
                .expect("date targets");
        assert!(matches!(values, CriterionValues::Dates(_)));

        let values: CriterionValues = serde_json::from_value(json!(["Yes", 4])).expect("scalars");
        assert_eq!(
            values,
            CriterionValues::Scalars(vec![Scalar::text("Yes"), Scalar::Number(4.0)])
        );
    }

    #[test]
    fn empty_text_is_not_present() {
        assert!(!AnswerValue::text("").is_present());
        assert!(!AnswerValue::Missing.is_present());
        assert!(AnswerValue::text(" ").is_present());
        assert!(AnswerValue::List(Vec::new()).is_present());
    }
}
