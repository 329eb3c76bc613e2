//! Property-based tests for the bulk-delete outcome.
//!
//! Whatever the backend reports — partial splits, ids it was never asked
//! about, ids it forgot to mention, ids on both sides — the outcome must
//! partition the de-duplicated input exactly: every requested id on
//! exactly one side, nothing else on either.

use std::collections::{BTreeMap, BTreeSet};

use bulletin_collection::{BulkDeleteData, BulkOutcome};
use bulletin_types::EntityId;
use proptest::prelude::*;

/// An input id plus the backend's treatment of it: whether it reports
/// the id at all, and on which side.
fn entry_strategy() -> impl Strategy<Value = (String, bool, bool)> {
    ("[a-z][a-z0-9]{0,6}", any::<bool>(), any::<bool>())
}

/// Ids the backend mentions but the caller never requested. Uppercase
/// so they cannot collide with requested ids.
fn extraneous_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Z]{1,6}", 0..5)
}

/// Collapses generated entries into one mask per distinct id, then
/// builds the wire report the masks describe.
fn build_report(
    entries: &[(String, bool, bool)],
    extraneous: &[String],
) -> (Vec<EntityId>, BTreeMap<String, (bool, bool)>, BulkDeleteData) {
    let mut masks: BTreeMap<String, (bool, bool)> = BTreeMap::new();
    for (id, reported, deleted) in entries {
        masks.entry(id.clone()).or_insert((*reported, *deleted));
    }

    let requested: Vec<EntityId> = entries.iter().map(|(id, _, _)| EntityId::new(id)).collect();
    let mut data = BulkDeleteData::default();
    for (id, (reported, deleted)) in &masks {
        if !reported {
            continue;
        }
        if *deleted {
            data.deleted.push(EntityId::new(id));
        } else {
            data.failed
                .insert(EntityId::new(id), format!("cannot delete {id}"));
        }
    }
    for (i, extra) in extraneous.iter().enumerate() {
        if i % 2 == 0 {
            data.deleted.push(EntityId::new(extra));
        } else {
            data.failed
                .insert(EntityId::new(extra), "phantom".to_string());
        }
    }

    (requested, masks, data)
}

proptest! {
    /// Every requested id lands on exactly one side, and nothing but
    /// requested ids appears on either.
    #[test]
    fn outcome_partitions_the_input_exactly(
        entries in prop::collection::vec(entry_strategy(), 0..24),
        extraneous in extraneous_strategy(),
    ) {
        let (requested, masks, data) = build_report(&entries, &extraneous);

        let outcome = BulkOutcome::from_parts(&requested, data);

        let distinct: BTreeSet<EntityId> =
            masks.keys().map(|id| EntityId::new(id.as_str())).collect();
        prop_assert_eq!(outcome.len(), distinct.len());
        for id in &distinct {
            let succeeded = outcome.succeeded.contains(id);
            let failed = outcome.failed.contains_key(id);
            prop_assert!(succeeded ^ failed, "id {} must be on exactly one side", id);
        }
        for id in &outcome.succeeded {
            prop_assert!(distinct.contains(id));
        }
        for id in outcome.failed.keys() {
            prop_assert!(distinct.contains(id));
        }
    }

    /// Ids the backend never mentions resolve as failed with the
    /// sentinel reason; reported failures keep the backend's reason.
    #[test]
    fn unreported_ids_carry_the_sentinel_reason(
        entries in prop::collection::vec(entry_strategy(), 1..24),
    ) {
        let (requested, masks, data) = build_report(&entries, &[]);

        let outcome = BulkOutcome::from_parts(&requested, data);

        for (id, (reported, deleted)) in &masks {
            let key = EntityId::new(id.as_str());
            match (reported, deleted) {
                (false, _) => prop_assert_eq!(
                    outcome.failed.get(&key).map(String::as_str),
                    Some(BulkOutcome::UNREPORTED)
                ),
                (true, true) => prop_assert!(outcome.succeeded.contains(&key)),
                (true, false) => {
                    let reason = format!("cannot delete {id}");
                    prop_assert_eq!(
                        outcome.failed.get(&key).map(String::as_str),
                        Some(reason.as_str())
                    );
                }
            }
        }
    }

    /// The success/failure summary flags agree with the split itself.
    #[test]
    fn summary_flags_agree_with_the_split(
        entries in prop::collection::vec(entry_strategy(), 0..24),
    ) {
        let (requested, _, data) = build_report(&entries, &[]);

        let outcome = BulkOutcome::from_parts(&requested, data);

        prop_assert_eq!(outcome.is_complete_success(), outcome.failed.is_empty());
        prop_assert_eq!(outcome.has_failures(), !outcome.failed.is_empty());
        prop_assert_eq!(outcome.is_empty(), outcome.len() == 0);
    }
}
