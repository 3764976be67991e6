//! Diff engine: turns two generations of item state into an operation script
//!
//! The script is built in four passes over the previous and current generations:
//! removals, insertions, moves and finally content updates. Each pass rewrites the
//! tracked positions of old items so the next pass sees the list as it looks after
//! every operation found so far has been applied.
use log::{debug, warn};

use crate::config::{DiffConfig, MoveStrategy};
use crate::errors::DiffError;
use crate::observed_list::ListObserver;
use crate::snapshot::Snapshot;
use crate::timer::DebugTimer;
use crate::types::{KeyedItem, OperationSink};
use crate::update_ops::OperationScript;

pub struct DiffEngine {
    config: DiffConfig,
    timer: DebugTimer,
    /// The generation the sink last received.
    previous: Snapshot,
    /// The generation to diff against `previous`; `None` when nothing changed since
    /// the last cycle.
    pending: Option<Snapshot>,
    observing: bool,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::with_config(DiffConfig::default())
    }

    pub fn with_config(config: DiffConfig) -> Self {
        let timer = DebugTimer::new(config.debug_tag.clone(), config.debug_timing);
        DiffEngine {
            previous: Snapshot::with_capacity(config.capacity_hint),
            pending: None,
            observing: true,
            timer,
            config,
        }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    /// The generation the next cycle will diff against `previous`.
    pub fn current(&self) -> &Snapshot {
        self.pending.as_ref().unwrap_or(&self.previous)
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending.is_some()
    }

    /// False only while a script is being handed to a sink.
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Forget both generations; the next cycle diffs against an empty list.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.pending = None;
    }

    /// Replace the current generation with `items`.
    ///
    /// Fails on a duplicate key, in which case the current generation is unchanged.
    pub fn set_items<T: KeyedItem>(&mut self, items: &[T]) -> Result<(), DiffError> {
        let mut current = Snapshot::with_capacity(items.len().max(self.config.capacity_hint));
        current.extend_from(items)?;
        self.pending = Some(current);
        Ok(())
    }

    /// Pull-based cycle: take `items` as the current generation, diff and emit.
    pub fn notify_item_changes<T, S>(
        &mut self,
        items: &[T],
        sink: &mut S,
    ) -> Result<OperationScript, DiffError>
    where
        T: KeyedItem,
        S: OperationSink + ?Sized,
    {
        self.set_items(items)?;
        self.compute_and_emit_changes(sink)
    }

    /// Diff without a sink. The generations are swapped as after a normal cycle.
    pub fn build_diff(&mut self) -> Result<OperationScript, DiffError> {
        self.compute_and_emit_changes(&mut |_: &OperationScript| {})
    }

    /// Run one diff cycle and hand the script to `sink`.
    ///
    /// The sink is only called for a non-empty script, and never when the diff fails,
    /// so it cannot observe a partial script. Afterwards the current generation
    /// becomes the previous one.
    pub fn compute_and_emit_changes<S>(&mut self, sink: &mut S) -> Result<OperationScript, DiffError>
    where
        S: OperationSink + ?Sized,
    {
        let Some(mut current) = self.pending.take() else {
            debug!("{}: no pending changes", self.config.debug_tag);
            return Ok(OperationScript::new());
        };

        let script = match self.run_passes(&mut current) {
            Ok(script) => script,
            Err(err) => {
                self.pending = Some(current);
                return Err(err);
            }
        };

        debug!(
            "{}: {} -> {} items, {} ops ({} inserted in {} batches, {} removed in {} batches, {} moved, {} updated)",
            self.config.debug_tag,
            self.previous.len(),
            current.len(),
            script.len(),
            script.num_insertions(),
            script.num_insertion_batches(),
            script.num_removals(),
            script.num_removal_batches(),
            script.num_moves(),
            script.num_updates()
        );

        if !script.is_empty() {
            let _section = self.timer.section("emit");
            // Don't react to notifications caused by our own emission
            let _detached = ObserverDetached::new(&mut self.observing);
            sink.on_operations(&script);
        }

        self.swap_generations(current);
        Ok(script)
    }

    fn run_passes(&mut self, current: &mut Snapshot) -> Result<OperationScript, DiffError> {
        let _section = self.timer.section("build diff");
        let previous_len = self.previous.len();
        self.previous.reset_for_diff();
        current.reset_for_diff();

        let mut script = OperationScript::new();
        let result = DiffPasses {
            previous: &mut self.previous,
            current,
            ops: &mut script,
        }
        .run(self.config.move_strategy);

        if let Err(err) = result {
            // Drop the stand-ins the move pass appended
            self.previous.truncate(previous_len);
            self.previous.reset_for_diff();
            return Err(err);
        }
        Ok(script)
    }

    fn swap_generations(&mut self, mut current: Snapshot) {
        current.clear_pairs();
        self.previous.clear();
        self.previous = current;
        debug!(
            "{}: generation swapped, {} items",
            self.config.debug_tag,
            self.previous.len()
        );
    }

    /// The generation incremental notifications apply to, seeded from `previous`
    /// when nothing changed since the last cycle.
    fn observed_generation(&mut self, notification: &str) -> Option<&mut Snapshot> {
        if !self.observing {
            warn!(
                "{}: ignoring '{}' received while emitting",
                self.config.debug_tag, notification
            );
            return None;
        }
        Some(self.pending.get_or_insert_with(|| self.previous.fork()))
    }

    /// Only single-item moves can be reported.
    pub fn on_range_moved(&mut self, from: usize, to: usize, count: usize) -> Result<(), DiffError> {
        if from == to {
            return Ok(());
        }
        if count != 1 {
            return Err(DiffError::UnsupportedMutation {
                operation: "range moved",
                details: format!(
                    "moving more than 1 item at a time is not supported, number of items moved: {count}"
                ),
            });
        }
        match self.observed_generation("item moved") {
            Some(generation) => generation.move_state(from, to),
            None => Ok(()),
        }
    }

    pub fn on_data_set_changed(&self) -> Result<(), DiffError> {
        Err(DiffError::UnsupportedMutation {
            operation: "data set changed",
            details: "diffing is enabled, report fine-grained changes or run a diff cycle instead"
                .to_string(),
        })
    }
}

impl<T: KeyedItem> ListObserver<T> for DiffEngine {
    fn on_range_inserted(&mut self, start: usize, items: &[T]) -> Result<(), DiffError> {
        if items.is_empty() {
            return Ok(());
        }
        match self.observed_generation("range inserted") {
            Some(generation) => generation.insert_range(start, items),
            None => Ok(()),
        }
    }

    fn on_range_removed(&mut self, start: usize, count: usize) -> Result<(), DiffError> {
        if count == 0 {
            return Ok(());
        }
        match self.observed_generation("range removed") {
            Some(generation) => generation.remove_range(start, count),
            None => Ok(()),
        }
    }

    fn on_range_changed(&mut self, start: usize, items: &[T]) -> Result<(), DiffError> {
        if items.is_empty() {
            return Ok(());
        }
        match self.observed_generation("range changed") {
            Some(generation) => generation.update_signatures(start, items),
            None => Ok(()),
        }
    }

    fn on_item_moved(&mut self, from: usize, to: usize) -> Result<(), DiffError> {
        self.on_range_moved(from, to, 1)
    }

    fn on_reset(&mut self, items: &[T]) -> Result<(), DiffError> {
        if !self.observing {
            warn!("{}: ignoring 'reset' received while emitting", self.config.debug_tag);
            return Ok(());
        }
        self.set_items(items)
    }
}

/// Clears the observing flag for as long as it lives, restoring it on every exit path.
struct ObserverDetached<'a> {
    observing: &'a mut bool,
    was_observing: bool,
}

impl<'a> ObserverDetached<'a> {
    fn new(observing: &'a mut bool) -> Self {
        let was_observing = std::mem::replace(observing, false);
        ObserverDetached {
            observing,
            was_observing,
        }
    }
}

impl Drop for ObserverDetached<'_> {
    fn drop(&mut self) {
        *self.observing = self.was_observing;
    }
}

struct DiffPasses<'a> {
    previous: &'a mut Snapshot,
    current: &'a mut Snapshot,
    ops: &'a mut OperationScript,
}

impl DiffPasses<'_> {
    fn run(mut self, move_strategy: MoveStrategy) -> Result<(), DiffError> {
        // Focusing on one type of operation at a time makes it easy to coalesce batches
        self.collect_removals();

        // Only need to check for insertions if the new list is bigger
        let has_insertions = self.previous.len() - self.ops.num_removals() != self.current.len();
        if has_insertions {
            self.collect_insertions();
        }

        match move_strategy {
            MoveStrategy::Sequential => self.collect_moves()?,
            MoveStrategy::LongestIncreasingSubsequence => self.collect_moves_lis()?,
        }
        self.collect_changes()
    }

    /// Walk the old list in order, pairing every item with its counterpart in the new
    /// list. Items without one are removals.
    fn collect_removals(&mut self) {
        for old_slot in 0..self.previous.len() {
            let num_removals = self.ops.num_removals();
            let state = &mut self.previous[old_slot];
            // Later operations must reference positions after earlier removals
            state.position -= num_removals;

            match self.current.index_of(state.key) {
                Some(new_slot) => {
                    state.pair = Some(new_slot);
                    self.current[new_slot].pair = Some(old_slot);
                }
                None => {
                    let position = state.position;
                    self.ops.remove(position);
                }
            }
        }
    }

    /// Walk the new list in order; unpaired items are insertions at their final
    /// position.
    fn collect_insertions(&mut self) {
        let old_len = self.previous.len();
        let mut old_cursor = 0;

        for new_slot in 0..self.current.len() {
            let item = &self.current[new_slot];
            if item.pair.is_some() {
                // The next surviving old item sits after every insertion found so far
                if let Some(old_slot) = next_paired(self.previous, &mut old_cursor, old_len) {
                    self.previous[old_slot].position += self.ops.num_insertions();
                }
                continue;
            }
            let position = item.position;
            self.ops.add(position);
        }
    }

    /// Walk both lists together and move items until every paired item sits at its
    /// final position. Moves can't be batched.
    fn collect_moves(&mut self) -> Result<(), DiffError> {
        // Stand-ins appended below lie past this bound and are never visited directly
        let old_len = self.previous.len();
        let mut old_cursor = 0;
        let mut next_old: Option<usize> = None;

        for new_slot in 0..self.current.len() {
            let new_pair = if self.current[new_slot].pair.is_some() {
                self.paired_old_slot(new_slot)?
            } else if self.ops.moves().is_empty() {
                // Inserted at its final position and nothing moved since
                continue;
            } else {
                // Earlier moves may have shifted the inserted item, track it like an
                // old one from here on
                let stand_in = self.previous.push_stand_in(&self.current[new_slot], new_slot);
                self.current[new_slot].pair = Some(stand_in);
                stand_in
            };

            if next_old.is_none() {
                // Once every old item has been visited, later moves may still have
                // shifted this one
                next_old = next_paired(self.previous, &mut old_cursor, old_len).or(Some(new_pair));
            }

            while let Some(old_slot) = next_old {
                let moves = self.ops.moves();
                self.previous[new_pair].apply_moves(moves);
                self.previous[old_slot].apply_moves(moves);

                let new_item = &self.current[new_slot];
                let old_item = &self.previous[old_slot];
                if new_item.key == old_item.key && new_item.position == old_item.position {
                    next_old = None;
                    break;
                }

                let old_target = self.current[self.paired_new_slot(old_slot)?].position;
                let new_source = self.previous[new_pair].position;
                let new_item_distance = new_source as i64 - new_item.position as i64;
                let old_item_distance = old_target as i64 - old_item.position as i64;

                if new_item_distance == 0 && old_item_distance == 0 {
                    next_old = None;
                    break;
                }

                if old_item_distance > new_item_distance {
                    let from = old_item.position;
                    self.ops.move_item(from, old_target);
                    let moved = &mut self.previous[old_slot];
                    moved.position = old_target;
                    moved.last_move_op = self.ops.num_moves();
                    next_old = next_paired(self.previous, &mut old_cursor, old_len);
                } else {
                    let to = new_item.position;
                    // Already in place once earlier moves are folded in
                    if new_source != to {
                        self.ops.move_item(new_source, to);
                    }
                    let moved = &mut self.previous[new_pair];
                    moved.position = to;
                    moved.last_move_op = self.ops.num_moves();
                    break;
                }
            }
        }
        Ok(())
    }

    /// Keep the items on a longest increasing run of final positions in place and
    /// move each other item right behind its final predecessor.
    fn collect_moves_lis(&mut self) -> Result<(), DiffError> {
        let len = self.current.len();
        if len == 0 {
            return Ok(());
        }

        // After removals and insertions the inserted items sit at their final index and
        // the surviving old items fill the remaining slots in old order
        let mut arrangement: Vec<Option<usize>> = (0..len)
            .map(|new_slot| self.current[new_slot].pair.is_none().then_some(new_slot))
            .collect();
        let free_indices: Vec<usize> = (0..len).filter(|&index| arrangement[index].is_none()).collect();
        let mut free = free_indices.into_iter();
        for old_slot in 0..self.previous.len() {
            if self.previous[old_slot].pair.is_none() {
                continue;
            }
            let new_slot = self.paired_new_slot(old_slot)?;
            let Some(index) = free.next() else {
                return Err(inconsistent(
                    self.previous[old_slot].key,
                    old_slot,
                    "more surviving old items than paired new items".to_string(),
                ));
            };
            arrangement[index] = Some(new_slot);
        }
        let mut arrangement: Vec<usize> = arrangement.into_iter().flatten().collect();
        if arrangement.len() != len {
            return Err(inconsistent(
                0,
                arrangement.len(),
                format!("arranged {} of {} items", arrangement.len(), len),
            ));
        }

        // New slots equal final positions, so this is also the sequence of final positions
        let mut anchored = vec![false; len];
        for index in lis::longest_increasing_subsequence(&arrangement) {
            anchored[arrangement[index]] = true;
        }

        for new_slot in 0..len {
            if anchored[new_slot] {
                continue;
            }
            let Some(from) = arrangement.iter().position(|&slot| slot == new_slot) else {
                continue;
            };
            let to = match new_slot.checked_sub(1) {
                None => 0,
                Some(predecessor) => {
                    let Some(after) = arrangement.iter().position(|&slot| slot == predecessor) else {
                        return Err(inconsistent(
                            self.current[new_slot].key,
                            new_slot,
                            format!("predecessor at final position {predecessor} is not arranged"),
                        ));
                    };
                    if from < after { after } else { after + 1 }
                }
            };
            if from != to {
                self.ops.move_item(from, to);
                let moved = arrangement.remove(from);
                arrangement.insert(to, moved);
            }
        }
        Ok(())
    }

    /// Compare content signatures of paired items, batching adjacent changes.
    fn collect_changes(&mut self) -> Result<(), DiffError> {
        for new_slot in 0..self.current.len() {
            if self.current[new_slot].pair.is_none() {
                continue;
            }
            let old_slot = self.paired_old_slot(new_slot)?;
            let new_item = &self.current[new_slot];
            if self.previous[old_slot].signature != new_item.signature {
                let (position, key) = (new_item.position, new_item.key);
                self.ops.update(position, key);
            }
        }
        Ok(())
    }

    fn paired_old_slot(&self, new_slot: usize) -> Result<usize, DiffError> {
        reciprocal_pair(self.current, self.previous, new_slot)
    }

    fn paired_new_slot(&self, old_slot: usize) -> Result<usize, DiffError> {
        reciprocal_pair(self.previous, self.current, old_slot)
    }
}

/// Next old item, starting at `cursor`, that still exists in the new list.
fn next_paired(previous: &Snapshot, cursor: &mut usize, end: usize) -> Option<usize> {
    while *cursor < end {
        let slot = *cursor;
        *cursor += 1;
        if previous[slot].pair.is_some() {
            return Some(slot);
        }
    }
    None
}

/// The slot `from[slot]` is paired with, after checking the pair points back.
fn reciprocal_pair(from: &Snapshot, to: &Snapshot, slot: usize) -> Result<usize, DiffError> {
    let state = &from[slot];
    let Some(pair) = state.pair else {
        return Err(inconsistent(state.key, state.position, "item has no pair".to_string()));
    };
    match to.slot(pair) {
        Some(other) if other.key == state.key && other.pair == Some(slot) => Ok(pair),
        Some(other) => Err(inconsistent(
            state.key,
            state.position,
            format!(
                "pair at slot {} has key {} and points back to {:?}, expected slot {}",
                pair, other.key, other.pair, slot
            ),
        )),
        None => Err(inconsistent(
            state.key,
            state.position,
            format!("pair slot {} is outside a generation of {} items", pair, to.len()),
        )),
    }
}

fn inconsistent(key: u64, position: usize, details: String) -> DiffError {
    DiffError::PairingInconsistency {
        key,
        position,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Operation, SimpleItem};

    fn items(keys: &[u64]) -> Vec<SimpleItem> {
        keys.iter().map(|&k| SimpleItem::new(k, k as i64)).collect()
    }

    fn diff(engine: &mut DiffEngine, keys: &[u64]) -> Vec<Operation> {
        engine.set_items(&items(keys)).unwrap();
        engine.build_diff().unwrap().into_operations()
    }

    #[test]
    fn first_cycle_inserts_everything() {
        let mut engine = DiffEngine::new();
        assert_eq!(
            diff(&mut engine, &[1, 2, 3]),
            vec![Operation::Insert { start: 0, count: 3 }]
        );
        assert_eq!(engine.previous().len(), 3);
        assert!(!engine.has_pending_changes());
    }

    #[test]
    fn no_changes_gives_empty_script() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3]);
        assert!(diff(&mut engine, &[1, 2, 3]).is_empty());
        assert!(engine.build_diff().unwrap().is_empty());
    }

    #[test]
    fn removal_then_insertion_at_same_spot() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3, 4]);

        assert_eq!(
            diff(&mut engine, &[1, 7, 8, 4]),
            vec![
                Operation::Remove { start: 1, count: 2 },
                Operation::Insert { start: 1, count: 2 },
            ]
        );
    }

    #[test]
    fn swap_of_two_items_is_one_move() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3]);

        assert_eq!(
            diff(&mut engine, &[2, 1, 3]),
            vec![Operation::Move { from: 1, to: 0 }]
        );
    }

    #[test]
    fn updates_report_changed_keys() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3]);

        let changed = vec![
            SimpleItem::new(1, 1),
            SimpleItem::new(2, 20),
            SimpleItem::new(3, 30),
        ];
        engine.set_items(&changed).unwrap();
        assert_eq!(
            engine.build_diff().unwrap().into_operations(),
            vec![Operation::Update {
                start: 1,
                count: 2,
                changed_keys: vec![2, 3],
            }]
        );
    }

    #[test]
    fn inserted_item_is_tracked_through_later_moves() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3]);
        engine.set_items(&items(&[3, 9, 1, 2])).unwrap();
        let script = engine.build_diff().unwrap();

        // [1, 2, 3] -> [1, 9, 2, 3] -> [3, 1, 9, 2] -> [3, 9, 1, 2]
        assert_eq!(
            script.operations(),
            &[
                Operation::Insert { start: 1, count: 1 },
                Operation::Move { from: 3, to: 0 },
                Operation::Move { from: 2, to: 1 },
            ]
        );
        assert!(engine.previous().iter().all(|s| s.pair().is_none()));
        assert_eq!(engine.previous().keys().collect::<Vec<_>>(), vec![3, 9, 1, 2]);
    }

    #[test]
    fn duplicate_keys_abort_before_diffing() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2]);

        let err = engine.set_items(&items(&[1, 2, 1])).unwrap_err();
        assert!(matches!(err, DiffError::DuplicateKey { key: 1, .. }));
        assert!(!engine.has_pending_changes());
    }

    #[test]
    fn sink_receives_the_script_once() {
        let mut engine = DiffEngine::new();
        let mut seen = Vec::new();
        let mut calls = 0;
        engine.set_items(&items(&[4, 5])).unwrap();

        let script = engine
            .compute_and_emit_changes(&mut |script: &OperationScript| {
                calls += 1;
                seen.extend(script.operations().iter().cloned());
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(seen, script.operations());
        assert_eq!(seen, vec![Operation::Insert { start: 0, count: 2 }]);
        assert!(engine.is_observing());
    }

    #[test]
    fn detached_guard_restores_flag() {
        let mut observing = true;
        {
            let guard = ObserverDetached::new(&mut observing);
            assert!(!*guard.observing);
        }
        assert!(observing);
    }

    #[test]
    fn observer_flag_restored_when_sink_panics() {
        let mut engine = DiffEngine::new();
        engine.set_items(&items(&[1])).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = engine.compute_and_emit_changes(&mut failing_sink);
        }));

        assert!(result.is_err());
        assert!(engine.is_observing());
    }

    fn failing_sink(_: &OperationScript) {
        panic!("sink failed");
    }

    #[test]
    fn broken_pairing_is_reported() {
        let mut previous = Snapshot::build(&items(&[1, 2])).unwrap();
        let mut current = Snapshot::build(&items(&[2, 1])).unwrap();
        let mut ops = OperationScript::new();
        let mut passes = DiffPasses {
            previous: &mut previous,
            current: &mut current,
            ops: &mut ops,
        };
        passes.collect_removals();
        // Corrupt the back-reference of key 2
        passes.previous[1].pair = Some(1);

        let err = passes.collect_changes().unwrap_err();
        assert!(err.is_internal());
        assert!(matches!(err, DiffError::PairingInconsistency { key: 2, .. }));
    }

    #[test]
    fn notifications_seed_from_previous_generation() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3]);

        ListObserver::<SimpleItem>::on_range_removed(&mut engine, 0, 1).unwrap();
        engine
            .on_range_inserted(2, &[SimpleItem::new(8, 8)])
            .unwrap();
        assert_eq!(engine.current().keys().collect::<Vec<_>>(), vec![2, 3, 8]);

        let ops = engine.build_diff().unwrap().into_operations();
        assert_eq!(
            ops,
            vec![
                Operation::Remove { start: 0, count: 1 },
                Operation::Insert { start: 2, count: 1 },
            ]
        );
    }

    #[test]
    fn multi_item_moves_and_data_set_changes_are_rejected() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2, 3]);

        assert!(matches!(
            engine.on_range_moved(0, 2, 2),
            Err(DiffError::UnsupportedMutation { .. })
        ));
        assert!(engine.on_data_set_changed().is_err());
        engine.on_range_moved(0, 2, 1).unwrap();
        assert_eq!(engine.current().keys().collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn item_already_in_place_after_earlier_moves_is_not_moved() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[0, 1, 2, 3]);

        let ops = diff(&mut engine, &[3, 100, 2, 0, 1]);
        assert!(
            ops.iter().all(|op| !matches!(op, Operation::Move { from, to } if from == to)),
            "{ops:?}"
        );
        assert_eq!(
            ops,
            vec![
                Operation::Insert { start: 1, count: 1 },
                Operation::Move { from: 4, to: 0 },
                Operation::Move { from: 1, to: 3 },
                Operation::Move { from: 2, to: 4 },
                Operation::Move { from: 3, to: 2 },
            ]
        );
    }

    #[test]
    fn lis_strategy_handles_empty_generations() {
        let config = DiffConfig::default().with_move_strategy(MoveStrategy::LongestIncreasingSubsequence);
        let mut engine = DiffEngine::with_config(config);

        assert!(diff(&mut engine, &[]).is_empty());
        diff(&mut engine, &[1, 2, 3]);
        assert_eq!(diff(&mut engine, &[]), vec![Operation::Remove { start: 0, count: 3 }]);
        assert!(diff(&mut engine, &[]).is_empty());
    }

    #[test]
    fn reset_notification_replaces_current_generation() {
        let mut engine = DiffEngine::new();
        diff(&mut engine, &[1, 2]);

        ListObserver::<SimpleItem>::on_reset(&mut engine, &items(&[2, 3])).unwrap();
        assert_eq!(engine.current().keys().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(
            engine.build_diff().unwrap().into_operations(),
            vec![
                Operation::Remove { start: 0, count: 1 },
                Operation::Insert { start: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn lis_strategy_moves_fewer_items_on_rotation() {
        let config = DiffConfig::default().with_move_strategy(MoveStrategy::LongestIncreasingSubsequence);
        let mut engine = DiffEngine::with_config(config);
        diff(&mut engine, &[1, 2, 3, 4, 5]);

        assert_eq!(
            diff(&mut engine, &[5, 1, 2, 3, 4]),
            vec![Operation::Move { from: 4, to: 0 }]
        );
    }
}
