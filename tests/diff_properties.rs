mod common;

use common::{assert_round_trip, diff, engine_with, items, keys};
use list_reconciler::{
    DiffEngine, DiffError, DiffPayload, MoveStrategy, Operation, OperationScript, SimpleItem,
};

const STRATEGIES: [MoveStrategy; 2] = [
    MoveStrategy::Sequential,
    MoveStrategy::LongestIncreasingSubsequence,
];

fn range(n: u64) -> Vec<u64> {
    (0..n).collect()
}

#[test]
fn twenty_item_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = DiffEngine::new();
    let mut list = items(&range(20));
    let mut emitted: Vec<Vec<Operation>> = Vec::new();
    let mut sink = |script: &OperationScript| emitted.push(script.operations().to_vec());

    engine.notify_item_changes(&list, &mut sink).unwrap();

    list.drain(6..9);
    let ops = engine.notify_item_changes(&list, &mut sink).unwrap();
    assert_eq!(ops.operations(), &[Operation::Remove { start: 6, count: 3 }]);

    let new_items = items(&[100, 101, 102]);
    list.splice(6..6, new_items);
    let ops = engine.notify_item_changes(&list, &mut sink).unwrap();
    assert_eq!(ops.operations(), &[Operation::Insert { start: 6, count: 3 }]);

    let first = list.remove(0);
    list.push(first);
    let ops = engine.notify_item_changes(&list, &mut sink).unwrap();
    assert_eq!(ops.operations(), &[Operation::Move { from: 0, to: 19 }]);

    for item in &mut list[10..14] {
        item.signature += 1000;
    }
    let changed: Vec<u64> = keys(&list[10..14]);
    let ops = engine.notify_item_changes(&list, &mut sink).unwrap();
    assert_eq!(
        ops.operations(),
        &[Operation::Update {
            start: 10,
            count: 4,
            changed_keys: changed.clone(),
        }]
    );

    let payload = DiffPayload::for_update(&ops.operations()[0], &list).unwrap();
    assert_eq!(payload.keys().collect::<Vec<_>>(), changed);

    drop(sink);
    assert_eq!(emitted.len(), 5);
    assert_eq!(emitted[0], vec![Operation::Insert { start: 0, count: 20 }]);
}

#[test]
fn diff_of_identical_lists_is_empty() {
    for strategy in STRATEGIES {
        let list = items(&[5, 3, 9, 1]);
        assert!(diff(strategy, &list, &list).is_empty());
        assert!(diff(strategy, &[], &[]).is_empty());
    }
}

#[test]
fn sink_is_not_called_for_empty_script() {
    let list = items(&range(4));
    let mut engine = engine_with(MoveStrategy::Sequential, &list);
    let mut calls = 0;
    engine
        .notify_item_changes(&list, &mut |_: &OperationScript| calls += 1)
        .unwrap();
    assert_eq!(calls, 0);
}

#[test]
fn contiguous_insertion_is_one_operation() {
    for strategy in STRATEGIES {
        for position in [0, 4, 10] {
            let before = items(&range(10));
            let mut after = before.clone();
            after.splice(position..position, items(&[50, 51, 52]));

            let ops = diff(strategy, &before, &after);
            assert_eq!(
                ops,
                vec![Operation::Insert {
                    start: position,
                    count: 3
                }],
                "{strategy:?} at {position}"
            );
        }
    }
}

#[test]
fn contiguous_removal_is_one_operation() {
    for strategy in STRATEGIES {
        for position in [0, 3, 7] {
            let before = items(&range(10));
            let mut after = before.clone();
            after.drain(position..position + 3);

            let ops = diff(strategy, &before, &after);
            assert_eq!(
                ops,
                vec![Operation::Remove {
                    start: position,
                    count: 3
                }],
                "{strategy:?} at {position}"
            );
        }
    }
}

#[test]
fn single_item_move_is_one_operation() {
    let before = items(&range(10));
    for from in 0..10 {
        for to in 0..10 {
            if from == to {
                continue;
            }
            let mut after = before.clone();
            let moved = after.remove(from);
            after.insert(to, moved);

            let ops = diff(MoveStrategy::Sequential, &before, &after);
            // Swapping neighbours can be reported as moving either of them
            let swapped = to == from + 1 && ops == vec![Operation::Move { from: to, to: from }];
            assert!(
                ops == vec![Operation::Move { from, to }] || swapped,
                "{from} -> {to}: {ops:?}"
            );

            let ops = diff(MoveStrategy::LongestIncreasingSubsequence, &before, &after);
            assert_eq!(ops.len(), 1, "{from} -> {to}: {ops:?}");
            assert_round_trip(&before, &after, &ops);
        }
    }
}

#[test]
fn contiguous_updates_are_one_operation() {
    for strategy in STRATEGIES {
        let before = items(&range(10));
        let mut after = before.clone();
        for item in &mut after[2..6] {
            item.signature = -1;
        }

        let ops = diff(strategy, &before, &after);
        assert_eq!(
            ops,
            vec![Operation::Update {
                start: 2,
                count: 4,
                changed_keys: vec![2, 3, 4, 5],
            }]
        );
    }
}

#[test]
fn duplicate_keys_abort_the_cycle() {
    let before = items(&range(3));
    let mut engine = engine_with(MoveStrategy::Sequential, &before);
    let mut calls = 0;

    let result = engine.notify_item_changes(&items(&[0, 1, 0]), &mut |_: &OperationScript| calls += 1);
    assert!(matches!(
        result,
        Err(DiffError::DuplicateKey {
            key: 0,
            position: 2,
            existing_position: 0
        })
    ));
    assert_eq!(calls, 0);
    assert_eq!(engine.previous().keys().collect::<Vec<_>>(), vec![0, 1, 2]);

    // The engine is still usable afterwards
    let ops = engine.notify_item_changes(&items(&[2, 1, 0]), &mut |_: &OperationScript| calls += 1);
    assert!(ops.is_ok());
    assert_eq!(calls, 1);
}

#[test]
fn mixed_changes_round_trip() {
    let before = items(&range(12));
    let mut after: Vec<SimpleItem> = items(&[11, 40, 3, 2, 0, 41, 7, 9, 8, 5]);
    after[3].signature = 99;
    after[8].signature = 98;

    for strategy in STRATEGIES {
        let ops = diff(strategy, &before, &after);
        assert_round_trip(&before, &after, &ops);
    }
}

#[test]
fn full_reversal_round_trips() {
    let before = items(&range(8));
    let after: Vec<SimpleItem> = before.iter().rev().copied().collect();
    for strategy in STRATEGIES {
        let ops = diff(strategy, &before, &after);
        assert!(ops.iter().all(|op| matches!(op, Operation::Move { .. })));
        assert_round_trip(&before, &after, &ops);
    }
}

#[test]
fn replacing_everything_is_remove_then_insert() {
    for strategy in STRATEGIES {
        let ops = diff(strategy, &items(&[1, 2, 3]), &items(&[4, 5]));
        assert_eq!(
            ops,
            vec![
                Operation::Remove { start: 0, count: 3 },
                Operation::Insert { start: 0, count: 2 },
            ]
        );
    }
}

#[test]
fn operations_serialize_with_type_tag() {
    let ops = diff(MoveStrategy::Sequential, &items(&[1, 2]), &items(&[2, 1, 3]));
    let json = serde_json::to_value(&ops).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "INSERT", "start": 2, "count": 1},
            {"type": "MOVE", "from": 1, "to": 0},
        ])
    );
}
