use tracing::{debug, warn};

use crate::error::StoreError;
use super::memory::AssignmentMemory;
use super::random::{shuffled, RandomSource};
use super::types::{Assignment, Distribution, PreviousAssignment, ShiftCategory};

/// Shuffles tried before giving up on avoiding a repeat
pub const MAX_ATTEMPTS: usize = 200;

/// Whether `candidate` puts any operator back on the PDV it held last time.
/// Stops at the first collision. PDVs without a candidate operator, or
/// with no previous operator, never collide.
fn repeats_previous(pdvs: &[String], candidate: &[String], previous: &PreviousAssignment) -> bool {
    pdvs.iter().zip(candidate.iter()).any(|(pdv, operator)| {
        matches!(previous.get(pdv), Some(Some(last)) if last == operator)
    })
}

/// Draws operators onto `pdvs` for `category`, avoiding any pairing from
/// that category's previous draw.
///
/// An accepted draw replaces the category's record. After `MAX_ATTEMPTS`
/// rejected shuffles an unconstrained shuffle is returned with
/// `retry_exhausted` set, and the record is left as it was.
pub fn distribute<R: RandomSource + ?Sized>(
    memory: &AssignmentMemory,
    rng: &mut R,
    pdvs: &[String],
    operators: &[String],
    category: ShiftCategory,
) -> Result<Distribution, StoreError> {
    let record = memory.lock(category)?;
    let previous = record.previous()?;

    for attempt in 1..=MAX_ATTEMPTS {
        let candidate = shuffled(operators, rng);
        if repeats_previous(pdvs, &candidate, &previous) {
            continue;
        }

        let assignment = Assignment::pair(pdvs, &candidate);
        record.replace(&assignment)?;
        debug!(category = category.label(), attempt, "accepted non-repeating draw");

        return Ok(Distribution {
            category,
            assignment,
            attempts: attempt,
            retry_exhausted: false,
        });
    }

    warn!(
        category = category.label(),
        attempts = MAX_ATTEMPTS,
        "could not avoid repeating the previous draw, using an unconstrained result"
    );
    let candidate = shuffled(operators, rng);
    Ok(Distribution {
        category,
        assignment: Assignment::pair(pdvs, &candidate),
        attempts: MAX_ATTEMPTS,
        retry_exhausted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn memory() -> (Arc<MemoryStore>, AssignmentMemory) {
        let store = Arc::new(MemoryStore::new());
        let memory = AssignmentMemory::new(store.clone());
        (store, memory)
    }

    #[test]
    fn first_draw_is_accepted_immediately_and_covers_every_pdv() {
        let (_, memory) = memory();
        let mut rng = StdRng::seed_from_u64(3);
        let pdvs = list(&["P1", "P2", "P3", "P4"]);
        let operators = list(&["Ana", "Bia", "Caio", "Duda"]);

        let result = distribute(&memory, &mut rng, &pdvs, &operators, ShiftCategory::Holiday).unwrap();

        assert_eq!(result.attempts, 1);
        assert!(!result.retry_exhausted);
        let keys: Vec<&str> = result.assignment.rows.iter().map(|r| r.pdv.as_str()).collect();
        assert_eq!(keys, vec!["P1", "P2", "P3", "P4"]);
        let drawn: HashSet<String> = result
            .assignment
            .rows
            .iter()
            .filter_map(|r| r.operator.clone())
            .collect();
        assert_eq!(drawn, operators.into_iter().collect());
        assert_eq!(
            memory.previous(ShiftCategory::Holiday).unwrap(),
            result.assignment.to_record()
        );
    }

    #[test]
    fn never_repeats_a_recorded_pairing() {
        let (_, memory) = memory();
        let mut rng = StdRng::seed_from_u64(11);
        let pdvs = list(&["P1", "P2", "P3"]);
        let operators = list(&["Ana", "Bia", "Caio"]);
        let category = ShiftCategory::BusinessDayOpening;

        for _ in 0..50 {
            let previous = memory.previous(category).unwrap();
            let result = distribute(&memory, &mut rng, &pdvs, &operators, category).unwrap();
            assert!(!result.retry_exhausted);
            for row in &result.assignment.rows {
                if let Some(Some(last)) = previous.get(&row.pdv) {
                    assert_ne!(row.operator.as_ref(), Some(last));
                }
            }
        }
    }

    #[test]
    fn exhausted_retries_fall_back_without_touching_memory() {
        let (store, memory) = memory();
        let mut rng = StdRng::seed_from_u64(5);
        let pdvs = list(&["P1"]);
        let operators = list(&["X"]);
        store.set("last_draw_holiday", r#"{"P1":"X"}"#).unwrap();

        let result = distribute(&memory, &mut rng, &pdvs, &operators, ShiftCategory::Holiday).unwrap();

        assert!(result.retry_exhausted);
        assert_eq!(result.attempts, MAX_ATTEMPTS);
        assert_eq!(result.assignment.operator_for("P1"), Some("X"));
        assert_eq!(
            store.get("last_draw_holiday").unwrap().as_deref(),
            Some(r#"{"P1":"X"}"#)
        );
    }

    #[test]
    fn short_operator_list_leaves_trailing_pdvs_unfilled() {
        let (_, memory) = memory();
        let mut rng = StdRng::seed_from_u64(9);
        let pdvs = list(&["P1", "P2", "P3"]);
        let operators = list(&["Ana", "Bia"]);

        let result =
            distribute(&memory, &mut rng, &pdvs, &operators, ShiftCategory::BusinessDayClosing).unwrap();

        assert_eq!(result.assignment.len(), 3);
        assert_eq!(result.assignment.rows[2].operator, None);
        let previous = memory.previous(ShiftCategory::BusinessDayClosing).unwrap();
        assert_eq!(previous.get("P3"), Some(&None));
    }

    #[test]
    fn unfilled_pdv_never_collides() {
        let (store, memory) = memory();
        let mut rng = StdRng::seed_from_u64(13);
        store.set("last_draw_closing", r#"{"P1":"Ana","P2":null}"#).unwrap();

        let result = distribute(
            &memory,
            &mut rng,
            &list(&["P1", "P2"]),
            &list(&["Bia"]),
            ShiftCategory::BusinessDayClosing,
        )
        .unwrap();

        assert!(!result.retry_exhausted);
        assert_eq!(result.assignment.operator_for("P1"), Some("Bia"));
        assert_eq!(result.assignment.operator_for("P2"), None);
    }

    #[test]
    fn extra_operators_are_dropped() {
        let (_, memory) = memory();
        let mut rng = StdRng::seed_from_u64(17);
        let operators = list(&["Ana", "Bia", "Caio"]);

        let result =
            distribute(&memory, &mut rng, &list(&["P1"]), &operators, ShiftCategory::Holiday).unwrap();

        assert_eq!(result.assignment.len(), 1);
        let drawn = result.assignment.rows[0].operator.clone().unwrap();
        assert!(operators.contains(&drawn));
    }

    #[test]
    fn categories_are_independent() {
        let (store, memory) = memory();
        let mut rng = StdRng::seed_from_u64(21);
        store.set("last_draw_opening", r#"{"P1":"X"}"#).unwrap();

        let result = distribute(
            &memory,
            &mut rng,
            &list(&["P1"]),
            &list(&["X"]),
            ShiftCategory::BusinessDayClosing,
        )
        .unwrap();

        assert!(!result.retry_exhausted);
        assert_eq!(result.assignment.operator_for("P1"), Some("X"));
    }

    #[test]
    fn guarantee_resumes_after_a_fallback() {
        let (store, memory) = memory();
        let mut rng = StdRng::seed_from_u64(23);
        store.set("last_draw_holiday", r#"{"P1":"X"}"#).unwrap();

        let fallback =
            distribute(&memory, &mut rng, &list(&["P1"]), &list(&["X"]), ShiftCategory::Holiday).unwrap();
        assert!(fallback.retry_exhausted);

        // With a second operator available the old record still applies
        for _ in 0..20 {
            let previous = memory.previous(ShiftCategory::Holiday).unwrap();
            let result = distribute(
                &memory,
                &mut rng,
                &list(&["P1"]),
                &list(&["X", "Y"]),
                ShiftCategory::Holiday,
            )
            .unwrap();
            let last = previous.get("P1").cloned().flatten();
            assert_ne!(result.assignment.operator_for("P1").map(str::to_string), last);
        }
    }

    #[test]
    fn failed_write_leaves_previous_record_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        store.set("last_draw_holiday", r#"{"P1":"X"}"#).unwrap();
        let memory = AssignmentMemory::new(store.clone());
        let mut rng = StdRng::seed_from_u64(29);

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = distribute(
            &memory,
            &mut rng,
            &list(&["P1"]),
            &list(&["X", "Y"]),
            ShiftCategory::Holiday,
        );

        assert!(result.is_err());
        assert_eq!(
            store.get("last_draw_holiday").unwrap().as_deref(),
            Some(r#"{"P1":"X"}"#)
        );
    }
}
