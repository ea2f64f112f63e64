//! Ordering engine for placement groups.
//!
//! Pure functions over the members of one (template, phase, round) group.
//! Callers persist whatever these return; nothing here touches storage.
//! Members are ranked by `order_in_round`, with `created_at` then id as
//! tie-breakers so an already-corrupt group still renumbers deterministically.

use chrono::{DateTime, Utc};
use fitplan_domain::{PlacementId, TemplateExercisePlacement};

/// Order for the next append, given the group's current maximum.
pub fn order_after(max_order: Option<u32>) -> u32 {
    max_order.map_or(1, |max| max + 1)
}

/// `max(order_in_round) + 1`, or 1 for an empty group.
pub fn next_order(group: &[TemplateExercisePlacement]) -> u32 {
    order_after(group.iter().map(|p| p.order_in_round).max())
}

/// Group members in display order.
pub fn sorted(group: &[TemplateExercisePlacement]) -> Vec<TemplateExercisePlacement> {
    let mut ordered = group.to_vec();
    ordered.sort_by(|a, b| {
        (a.order_in_round, a.created_at, a.id).cmp(&(b.order_in_round, b.created_at, b.id))
    });
    ordered
}

/// Moves `placement_id` to `target_order` (clamped to `1..=len`) and shifts
/// the members in between by one.
///
/// Returns every member whose order changed, or `None` if the placement is
/// not in the group. Moving a placement onto its current position in a
/// dense group changes nothing.
pub fn reorder(
    group: &[TemplateExercisePlacement],
    placement_id: PlacementId,
    target_order: u32,
    now: DateTime<Utc>,
) -> Option<Vec<TemplateExercisePlacement>> {
    let mut ordered = sorted(group);
    let current = ordered.iter().position(|p| p.id == placement_id)?;

    let size = ordered.len();
    let target = usize::try_from(target_order).unwrap_or(size).clamp(1, size) - 1;

    let moved = ordered.remove(current);
    ordered.insert(target, moved);
    Some(renumber(ordered, now))
}

/// Renumbers the group to `1..=N`, preserving relative order. Returns the
/// members whose order changed.
pub fn compact(
    group: &[TemplateExercisePlacement],
    now: DateTime<Utc>,
) -> Vec<TemplateExercisePlacement> {
    renumber(sorted(group), now)
}

fn renumber(
    ordered: Vec<TemplateExercisePlacement>,
    now: DateTime<Utc>,
) -> Vec<TemplateExercisePlacement> {
    ordered
        .into_iter()
        .zip(1u32..)
        .filter_map(|(mut placement, order)| {
            if placement.order_in_round == order {
                return None;
            }
            placement.set_order(order, now);
            Some(placement)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use fitplan_domain::{
        ExerciseId, ExerciseMetadata, PlacementGroup, RoundNumber, WorkoutPhase,
        WorkoutTemplateId,
    };

    fn group_of(orders: &[u32]) -> Vec<TemplateExercisePlacement> {
        let group = PlacementGroup::new(WorkoutTemplateId::new(), WorkoutPhase::Main, RoundNumber::FIRST);
        let base = Utc::now();
        orders
            .iter()
            .enumerate()
            .map(|(i, order)| {
                TemplateExercisePlacement::new(
                    group,
                    ExerciseId::new(),
                    *order,
                    ExerciseMetadata::empty_object(),
                    base + Duration::seconds(i as i64),
                )
            })
            .collect()
    }

    fn orders_by_id(
        group: &[TemplateExercisePlacement],
        changed: &[TemplateExercisePlacement],
    ) -> Vec<u32> {
        group
            .iter()
            .map(|p| {
                changed
                    .iter()
                    .find(|c| c.id == p.id)
                    .map_or(p.order_in_round, |c| c.order_in_round)
            })
            .collect()
    }

    #[test]
    fn next_order_starts_at_one() {
        assert_eq!(next_order(&[]), 1);
        assert_eq!(next_order(&group_of(&[1, 2, 3])), 4);
        assert_eq!(order_after(Some(7)), 8);
    }

    #[test]
    fn reorder_to_current_position_changes_nothing() {
        let group = group_of(&[1, 2, 3]);
        let changed = reorder(&group, group[1].id, 2, Utc::now()).expect("member");
        assert!(changed.is_empty());
    }

    #[test]
    fn moving_down_shifts_intermediate_members_up() {
        let group = group_of(&[1, 2, 3, 4]);
        let changed = reorder(&group, group[0].id, 3, Utc::now()).expect("member");
        assert_eq!(changed.len(), 3);
        assert_eq!(orders_by_id(&group, &changed), vec![3, 1, 2, 4]);
    }

    #[test]
    fn moving_up_shifts_intermediate_members_down() {
        let group = group_of(&[1, 2, 3, 4]);
        let changed = reorder(&group, group[3].id, 2, Utc::now()).expect("member");
        assert_eq!(orders_by_id(&group, &changed), vec![1, 3, 4, 2]);
    }

    #[test]
    fn target_is_clamped_into_group_bounds() {
        let group = group_of(&[1, 2, 3]);
        let changed = reorder(&group, group[0].id, 99, Utc::now()).expect("member");
        assert_eq!(orders_by_id(&group, &changed), vec![3, 1, 2]);

        let changed = reorder(&group, group[2].id, 0, Utc::now()).expect("member");
        assert_eq!(orders_by_id(&group, &changed), vec![2, 3, 1]);
    }

    #[test]
    fn reorder_of_foreign_placement_is_none() {
        let group = group_of(&[1, 2]);
        assert!(reorder(&group, PlacementId::new(), 1, Utc::now()).is_none());
    }

    #[test]
    fn compact_closes_gaps_and_stamps_changes() {
        let group = group_of(&[1, 3, 4]);
        let now = Utc::now() + Duration::minutes(1);
        let changed = compact(&group, now);
        assert_eq!(orders_by_id(&group, &changed), vec![1, 2, 3]);
        assert!(changed.iter().all(|p| p.updated_at == now));
    }

    #[test]
    fn compact_breaks_duplicate_orders_by_creation_time() {
        let group = group_of(&[2, 2, 5]);
        let changed = compact(&group, Utc::now());
        assert_eq!(orders_by_id(&group, &changed), vec![1, 2, 3]);
    }
}
