use super::super::domain::CriterionId;
use super::domain::{EvaluationScale, SelectionCriterion};

/// Weights of one grant program's criteria must add up to this total.
pub const TOTAL_WEIGHT: u32 = 100;

/// Reasons a criteria set cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionCriteriaError {
    #[error("grant program has no selection criteria")]
    Empty,
    #[error("criterion '{criterion_name}' has weight {weight}; weights must be within 0..=100")]
    WeightOutOfRange { criterion_name: String, weight: u8 },
    #[error("selection criteria weights must total 100 (found {total})")]
    WeightTotal { total: u32 },
    #[error("selection criteria mix evaluation scales {expected} and {found}")]
    MixedScales {
        expected: EvaluationScale,
        found: EvaluationScale,
    },
}

/// Appends `criterion` and gives every entry an equal share of 100, the first entry absorbing
/// the integer-division remainder.
pub fn add_criterion(
    existing: &[SelectionCriterion],
    criterion: SelectionCriterion,
) -> Vec<SelectionCriterion> {
    let mut criteria = Vec::with_capacity(existing.len() + 1);
    criteria.extend_from_slice(existing);
    criteria.push(criterion);
    redistribute_weights(&criteria)
}

/// Equal split of [`TOTAL_WEIGHT`] across the list; index 0 takes the remainder.
pub fn redistribute_weights(criteria: &[SelectionCriterion]) -> Vec<SelectionCriterion> {
    if criteria.is_empty() {
        return Vec::new();
    }

    let count = u32::try_from(criteria.len()).unwrap_or(u32::MAX);
    let equal_share = TOTAL_WEIGHT / count;
    let remainder = TOTAL_WEIGHT - equal_share * count;

    criteria
        .iter()
        .enumerate()
        .map(|(index, criterion)| {
            let share = if index == 0 {
                equal_share + remainder
            } else {
                equal_share
            };
            SelectionCriterion {
                weight: share as u8,
                ..criterion.clone()
            }
        })
        .collect()
}

/// Drops the criterion with `id`, leaving the remaining weights untouched.
pub fn remove_criterion(
    criteria: &[SelectionCriterion],
    id: &CriterionId,
) -> Vec<SelectionCriterion> {
    criteria
        .iter()
        .filter(|criterion| criterion.id.as_ref() != Some(id))
        .cloned()
        .collect()
}

pub fn total_weight(criteria: &[SelectionCriterion]) -> u32 {
    criteria
        .iter()
        .map(|criterion| u32::from(criterion.weight))
        .sum()
}

/// Checks that a criteria set is ready to be saved with a published program.
pub fn validate_criteria(criteria: &[SelectionCriterion]) -> Result<(), SelectionCriteriaError> {
    let Some(first) = criteria.first() else {
        return Err(SelectionCriteriaError::Empty);
    };

    for criterion in criteria {
        if u32::from(criterion.weight) > TOTAL_WEIGHT {
            return Err(SelectionCriteriaError::WeightOutOfRange {
                criterion_name: criterion.criterion_name.clone(),
                weight: criterion.weight,
            });
        }
        if criterion.evaluation_scale != first.evaluation_scale {
            return Err(SelectionCriteriaError::MixedScales {
                expected: first.evaluation_scale,
                found: criterion.evaluation_scale,
            });
        }
    }

    let total = total_weight(criteria);
    if total != TOTAL_WEIGHT {
        return Err(SelectionCriteriaError::WeightTotal { total });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::grants::domain::GrantProgramId;

    fn criterion(name: &str) -> SelectionCriterion {
        let mut criterion = SelectionCriterion::new(GrantProgramId::new("gp-1"), name);
        criterion.id = Some(CriterionId::new(name));
        criterion
    }

    fn criteria(count: usize) -> Vec<SelectionCriterion> {
        (0..count).fold(Vec::new(), |list, index| {
            add_criterion(&list, criterion(&format!("c{index}")))
        })
    }

    #[test]
    fn weights_total_one_hundred_for_any_list_length() {
        for count in 1..=120 {
            let list = criteria(count);
            assert_eq!(list.len(), count);
            assert_eq!(total_weight(&list), TOTAL_WEIGHT, "count {count}");
        }
    }

    #[test]
    fn first_criterion_absorbs_the_remainder() {
        let list = criteria(3);
        let weights: Vec<u8> = list.iter().map(|criterion| criterion.weight).collect();
        assert_eq!(weights, vec![34, 33, 33]);

        let list = criteria(7);
        assert_eq!(list[0].weight, 16);
        assert!(list[1..].iter().all(|criterion| criterion.weight == 14));
    }

    #[test]
    fn add_leaves_the_input_untouched() {
        let existing = criteria(2);
        let snapshot = existing.clone();

        let updated = add_criterion(&existing, criterion("late"));

        assert_eq!(existing, snapshot);
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[2].criterion_name, "late");
    }

    #[test]
    fn removal_does_not_renormalize() {
        let list = criteria(4);
        let id = list[1].id.clone().expect("id assigned");

        let remaining = remove_criterion(&list, &id);

        assert_eq!(remaining.len(), 3);
        assert_eq!(total_weight(&remaining), 75);
        assert_eq!(
            validate_criteria(&remaining),
            Err(SelectionCriteriaError::WeightTotal { total: 75 })
        );
        assert_eq!(total_weight(&redistribute_weights(&remaining)), 100);
    }

    #[test]
    fn validation_rejects_empty_and_mixed_scales() {
        assert_eq!(validate_criteria(&[]), Err(SelectionCriteriaError::Empty));

        let mut list = criteria(2);
        list[1].evaluation_scale = EvaluationScale::Ten;
        assert_eq!(
            validate_criteria(&list),
            Err(SelectionCriteriaError::MixedScales {
                expected: EvaluationScale::Hundred,
                found: EvaluationScale::Ten,
            })
        );
    }

    #[test]
    fn validation_rejects_weights_above_one_hundred() {
        let mut list = criteria(2);
        list[0].weight = 150;
        list[1].weight = 0;
        assert!(matches!(
            validate_criteria(&list),
            Err(SelectionCriteriaError::WeightOutOfRange { weight: 150, .. })
        ));
    }
}
