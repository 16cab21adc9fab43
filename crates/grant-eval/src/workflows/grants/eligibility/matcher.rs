use std::cmp::Ordering;

use super::date::{answer_date_string, parse_date_string};
use super::operator::ComparisonOperator;
use super::values::{AnswerValue, CriterionValues, DateParts, Scalar};

/// Decides whether one applicant answer satisfies one comparison.
///
/// Never panics. Unrecognized operators, unparseable dates, and comparisons between mismatched
/// shapes all evaluate to `false`.
///
/// Date parts must name a real calendar day. Overflowing parts such as 30 February or month 13
/// are rejected rather than rolled into the following month or year, so every date comparison
/// against them (`not_equals` included) is `false`.
pub fn evaluate_criterion(
    answer: &AnswerValue,
    operator: ComparisonOperator,
    values: &CriterionValues,
) -> bool {
    match values {
        CriterionValues::Dates(targets) => match targets.first() {
            Some(target) => compare_dates(answer, operator, target),
            None => compare_generic(answer, operator, &[]),
        },
        CriterionValues::Scalars(targets) => compare_generic(answer, operator, targets),
    }
}

fn compare_dates(answer: &AnswerValue, operator: ComparisonOperator, target: &DateParts) -> bool {
    let Some(answer_date) = answer_date_string(answer)
        .as_deref()
        .and_then(parse_date_string)
    else {
        return false;
    };
    let Some(target_date) = parse_date_string(&target.to_date_string()) else {
        return false;
    };

    match operator {
        ComparisonOperator::Equals => answer_date == target_date,
        ComparisonOperator::NotEquals => answer_date != target_date,
        ComparisonOperator::GreaterThan => answer_date > target_date,
        ComparisonOperator::LessThan => answer_date < target_date,
        ComparisonOperator::GreaterThanOrEqual => answer_date >= target_date,
        ComparisonOperator::LessThanOrEqual => answer_date <= target_date,
        _ => false,
    }
}

fn compare_generic(answer: &AnswerValue, operator: ComparisonOperator, raw: &[Scalar]) -> bool {
    if operator.is_ordering() {
        return compare_numeric(answer, operator, raw.first());
    }

    let targets: Vec<Scalar> = raw.iter().map(Scalar::lowercased).collect();
    let normalized = answer.lowercased();

    match operator {
        ComparisonOperator::Equals => equals_any(&normalized, &targets),
        ComparisonOperator::NotEquals => !equals_any(&normalized, &targets),
        ComparisonOperator::InList => is_member(&normalized, &targets),
        ComparisonOperator::NotInList => is_absent(&normalized, &targets),
        ComparisonOperator::Contains => match &normalized {
            AnswerValue::Scalar(Scalar::Text(text)) => contains_any(text, &targets),
            _ => false,
        },
        ComparisonOperator::NotContains => match &normalized {
            AnswerValue::Scalar(Scalar::Text(text)) => !contains_any(text, &targets),
            _ => false,
        },
        ComparisonOperator::Exists => answer.is_present(),
        ComparisonOperator::NotExists => !answer.is_present(),
        _ => false,
    }
}

// Only scalars compare equal; lists and dates never match a primitive target.
fn equals_any(answer: &AnswerValue, targets: &[Scalar]) -> bool {
    match answer {
        AnswerValue::Scalar(scalar) => targets.contains(scalar),
        _ => false,
    }
}

fn is_member(answer: &AnswerValue, targets: &[Scalar]) -> bool {
    match answer {
        AnswerValue::List(items) => items.iter().any(|item| targets.contains(item)),
        AnswerValue::Scalar(scalar) => targets.contains(scalar),
        _ => false,
    }
}

fn is_absent(answer: &AnswerValue, targets: &[Scalar]) -> bool {
    match answer {
        AnswerValue::List(items) => items.iter().all(|item| !targets.contains(item)),
        AnswerValue::Scalar(scalar) => !targets.contains(scalar),
        _ => true,
    }
}

fn contains_any(text: &str, targets: &[Scalar]) -> bool {
    targets
        .iter()
        .filter_map(Scalar::as_text)
        .any(|needle| text.contains(needle))
}

fn compare_numeric(
    answer: &AnswerValue,
    operator: ComparisonOperator,
    target: Option<&Scalar>,
) -> bool {
    let AnswerValue::Scalar(Scalar::Number(value)) = answer else {
        return false;
    };
    let Some(threshold) = target.and_then(numeric_target) else {
        return false;
    };
    let Some(ordering) = value.partial_cmp(&threshold) else {
        return false;
    };

    match operator {
        ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
        ComparisonOperator::LessThan => ordering == Ordering::Less,
        ComparisonOperator::GreaterThanOrEqual => ordering != Ordering::Less,
        ComparisonOperator::LessThanOrEqual => ordering != Ordering::Greater,
        _ => false,
    }
}

fn numeric_target(target: &Scalar) -> Option<f64> {
    match target {
        Scalar::Number(number) => Some(*number),
        Scalar::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite()),
        Scalar::Boolean(_) => None,
    }
}
