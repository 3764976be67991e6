#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use list_reconciler::{DiffConfig, DiffEngine, MoveStrategy, Operation, SimpleItem};

pub fn items(keys: &[u64]) -> Vec<SimpleItem> {
    keys.iter().map(|&k| SimpleItem::new(k, k as i64)).collect()
}

pub fn keys(items: &[SimpleItem]) -> Vec<u64> {
    items.iter().map(|item| item.key).collect()
}

pub fn engine(move_strategy: MoveStrategy) -> DiffEngine {
    DiffEngine::with_config(DiffConfig::default().with_move_strategy(move_strategy))
}

/// Engine whose previous generation is `before`.
pub fn engine_with(move_strategy: MoveStrategy, before: &[SimpleItem]) -> DiffEngine {
    let mut engine = engine(move_strategy);
    engine.set_items(before).unwrap();
    engine.build_diff().unwrap();
    engine
}

pub fn diff(move_strategy: MoveStrategy, before: &[SimpleItem], after: &[SimpleItem]) -> Vec<Operation> {
    let mut engine = engine_with(move_strategy, before);
    engine.set_items(after).unwrap();
    engine.build_diff().unwrap().into_operations()
}

/// Apply `ops` to the keys of `before` the way a rendering surface would. Inserted
/// slots are `None` since the script only says where new items go.
///
/// Returns the resulting slots and, per updated key, the position it was reported at.
pub fn apply(before: &[SimpleItem], ops: &[Operation]) -> (Vec<Option<u64>>, HashMap<u64, usize>) {
    let mut slots: Vec<Option<u64>> = before.iter().map(|item| Some(item.key)).collect();
    let mut updated = HashMap::new();
    let mut seen_update = false;

    for op in ops {
        match op {
            Operation::Insert { start, count } => {
                assert!(!seen_update, "structural op after update: {ops:?}");
                assert!(*count > 0);
                slots.splice(*start..*start, std::iter::repeat_n(None, *count));
            }
            Operation::Remove { start, count } => {
                assert!(!seen_update, "structural op after update: {ops:?}");
                assert!(*count > 0);
                slots.drain(*start..*start + *count);
            }
            Operation::Move { from, to } => {
                assert!(!seen_update, "structural op after update: {ops:?}");
                assert_ne!(from, to);
                let slot = slots.remove(*from);
                slots.insert(*to, slot);
            }
            Operation::Update {
                start,
                count,
                changed_keys,
            } => {
                seen_update = true;
                assert!(*count >= changed_keys.len());
                for &key in changed_keys {
                    let position = slots[*start..*start + *count]
                        .iter()
                        .position(|slot| *slot == Some(key))
                        .map(|offset| start + offset)
                        .unwrap_or_else(|| panic!("key {key} outside its update batch: {ops:?}"));
                    assert!(updated.insert(key, position).is_none(), "key {key} updated twice");
                }
            }
        }
    }
    (slots, updated)
}

/// Check that `ops` turns `before` into `after`, reporting exactly the changed items.
pub fn assert_round_trip(before: &[SimpleItem], after: &[SimpleItem], ops: &[Operation]) {
    let (slots, updated) = apply(before, ops);
    let old_keys: HashSet<u64> = before.iter().map(|item| item.key).collect();

    assert_eq!(slots.len(), after.len(), "length mismatch for {ops:?}");
    for (position, (slot, item)) in slots.iter().zip(after).enumerate() {
        match slot {
            Some(key) => assert_eq!(*key, item.key, "wrong key at {position} for {ops:?}"),
            None => assert!(
                !old_keys.contains(&item.key),
                "{} was inserted but already existed: {ops:?}",
                item.key
            ),
        }
    }

    let old_signatures: HashMap<u64, i64> =
        before.iter().map(|item| (item.key, item.signature)).collect();
    let expected: HashSet<u64> = after
        .iter()
        .filter(|item| matches!(old_signatures.get(&item.key), Some(&sig) if sig != item.signature))
        .map(|item| item.key)
        .collect();
    let reported: HashSet<u64> = updated.keys().copied().collect();
    assert_eq!(reported, expected, "update mismatch for {ops:?}");
}
