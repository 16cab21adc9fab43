use chrono::NaiveDate;

use super::values::{AnswerValue, Scalar};

/// Parses `year-month-day` (or `/`-separated) strings; every component must be a non-zero number
/// and together they must name a real calendar day.
pub(crate) fn parse_date_string(raw: &str) -> Option<NaiveDate> {
    let mut components = raw.trim().split(|c| c == '-' || c == '/');
    let year = parse_component::<i32>(components.next())?;
    let month = parse_component::<u32>(components.next())?;
    let day = parse_component::<u32>(components.next())?;
    if components.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_component<T>(component: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let value = component?.trim().parse::<T>().ok()?;
    (value != T::default()).then_some(value)
}

/// Date-string for an answer compared in date mode. Lists contribute their first element.
pub(crate) fn answer_date_string(answer: &AnswerValue) -> Option<String> {
    match answer {
        AnswerValue::Date(parts) => Some(parts.to_date_string()),
        AnswerValue::DateList(items) => items.first().map(|parts| parts.to_date_string()),
        AnswerValue::Scalar(Scalar::Text(text)) => Some(text.clone()),
        AnswerValue::List(items) => match items.first() {
            Some(Scalar::Text(text)) => Some(text.clone()),
            _ => None,
        },
        AnswerValue::Scalar(_) | AnswerValue::Missing => None,
    }
}
