use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comparison applied between an applicant answer and the configured target values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    InList,
    NotInList,
    Exists,
    NotExists,
    Contains,
    NotContains,
    /// Any tag not listed above. Always evaluates to `false`.
    #[serde(other)]
    Unrecognized,
}

impl ComparisonOperator {
    pub const fn label(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::NotEquals => "not_equals",
            ComparisonOperator::GreaterThan => "greater_than",
            ComparisonOperator::LessThan => "less_than",
            ComparisonOperator::GreaterThanOrEqual => "greater_than_or_equal",
            ComparisonOperator::LessThanOrEqual => "less_than_or_equal",
            ComparisonOperator::InList => "in_list",
            ComparisonOperator::NotInList => "not_in_list",
            ComparisonOperator::Exists => "exists",
            ComparisonOperator::NotExists => "not_exists",
            ComparisonOperator::Contains => "contains",
            ComparisonOperator::NotContains => "not_contains",
            ComparisonOperator::Unrecognized => "unrecognized",
        }
    }

    pub(crate) const fn is_ordering(self) -> bool {
        matches!(
            self,
            ComparisonOperator::GreaterThan
                | ComparisonOperator::LessThan
                | ComparisonOperator::GreaterThanOrEqual
                | ComparisonOperator::LessThanOrEqual
        )
    }
}

impl FromStr for ComparisonOperator {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let operator = match value.trim() {
            "equals" => ComparisonOperator::Equals,
            "not_equals" => ComparisonOperator::NotEquals,
            "greater_than" => ComparisonOperator::GreaterThan,
            "less_than" => ComparisonOperator::LessThan,
            "greater_than_or_equal" => ComparisonOperator::GreaterThanOrEqual,
            "less_than_or_equal" => ComparisonOperator::LessThanOrEqual,
            "in_list" => ComparisonOperator::InList,
            "not_in_list" => ComparisonOperator::NotInList,
            "exists" => ComparisonOperator::Exists,
            "not_exists" => ComparisonOperator::NotExists,
            "contains" => ComparisonOperator::Contains,
            "not_contains" => ComparisonOperator::NotContains,
            _ => ComparisonOperator::Unrecognized,
        };
        Ok(operator)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
