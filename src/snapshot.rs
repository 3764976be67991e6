//! One generation of diff state: item states in list order, indexed by key
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::{Index, IndexMut};

use crate::errors::DiffError;
use crate::types::KeyedItem;
use crate::update_ops::MoveOp;

/// Bookkeeping for one item in one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemState {
    pub key: u64,
    /// Index in the generation's list, adjusted while a diff is being built.
    pub position: usize,
    pub signature: i64,
    /// Slot of the same-keyed state in the other generation. Slots are indices into
    /// the other snapshot, so they never outlive it as dangling references.
    #[serde(skip)]
    pub(crate) pair: Option<usize>,
    /// How many of the script's moves have already been folded into `position`.
    #[serde(skip)]
    pub(crate) last_move_op: usize,
}

impl ItemState {
    pub fn new<T: KeyedItem + ?Sized>(item: &T, position: usize) -> Self {
        ItemState {
            key: item.key(),
            position,
            signature: item.signature(),
            pair: None,
            last_move_op: 0,
        }
    }

    pub fn pair(&self) -> Option<usize> {
        self.pair
    }

    /// Bring `position` up to date with moves recorded after the last call.
    pub(crate) fn apply_moves(&mut self, moves: &[MoveOp]) {
        for op in moves.iter().skip(self.last_move_op) {
            self.position = op.shift(self.position);
        }
        self.last_move_op = moves.len();
    }

    fn reset_for_diff(&mut self, position: usize) {
        self.position = position;
        self.pair = None;
        self.last_move_op = 0;
    }
}

/// Ordered sequence of [`ItemState`] with O(1) lookup by key.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    states: IndexMap<u64, ItemState>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Snapshot {
            states: IndexMap::with_capacity(capacity),
        }
    }

    /// Build a generation from items in list order. Fails on the first duplicate key.
    pub fn build<T: KeyedItem>(items: &[T]) -> Result<Self, DiffError> {
        let mut snapshot = Snapshot::with_capacity(items.len());
        snapshot.extend_from(items)?;
        Ok(snapshot)
    }

    pub(crate) fn extend_from<T: KeyedItem>(&mut self, items: &[T]) -> Result<(), DiffError> {
        self.states.reserve(items.len());
        for item in items {
            let position = self.states.len();
            let state = ItemState::new(item, position);
            if let Some(existing_position) = self.states.get_index_of(&state.key) {
                return Err(DiffError::DuplicateKey {
                    key: state.key,
                    position,
                    existing_position,
                });
            }
            self.states.insert(state.key, state);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, key: u64) -> Option<&ItemState> {
        self.states.get(&key)
    }

    pub fn index_of(&self, key: u64) -> Option<usize> {
        self.states.get_index_of(&key)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.states.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.states.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemState> {
        self.states.values()
    }

    pub(crate) fn slot(&self, slot: usize) -> Option<&ItemState> {
        self.states.get_index(slot).map(|(_, state)| state)
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut ItemState> {
        self.states.get_index_mut(slot).map(|(_, state)| state)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.states.truncate(len);
    }

    /// Drop every state. Pair links die with them.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Forget pairings from a previous cycle and make positions match list order.
    pub(crate) fn reset_for_diff(&mut self) {
        for (index, state) in self.states.values_mut().enumerate() {
            state.reset_for_diff(index);
        }
    }

    pub(crate) fn clear_pairs(&mut self) {
        for state in self.states.values_mut() {
            state.pair = None;
            state.last_move_op = 0;
        }
    }

    /// Copy of this generation without any cross-generation links.
    pub fn fork(&self) -> Snapshot {
        let mut fork = self.clone();
        fork.reset_for_diff();
        fork
    }

    /// Append a stand-in for an inserted item so later moves can shift it like any
    /// other item of this generation. Returns the new slot.
    pub(crate) fn push_stand_in(&mut self, inserted: &ItemState, paired_slot: usize) -> usize {
        let slot = self.states.len();
        self.states.insert(
            inserted.key,
            ItemState {
                key: inserted.key,
                position: inserted.position,
                signature: inserted.signature,
                pair: Some(paired_slot),
                last_move_op: 0,
            },
        );
        slot
    }

    /// Insert states for `items` at `start`, shifting later states.
    ///
    /// Duplicate keys are rejected before anything is modified.
    pub fn insert_range<T: KeyedItem>(&mut self, start: usize, items: &[T]) -> Result<(), DiffError> {
        if start > self.states.len() {
            return Err(DiffError::out_of_bounds(start, self.states.len()));
        }
        for (offset, item) in items.iter().enumerate() {
            let key = item.key();
            let existing = self.states.get_index_of(&key).or_else(|| {
                items[..offset]
                    .iter()
                    .position(|earlier| earlier.key() == key)
                    .map(|earlier| start + earlier)
            });
            if let Some(existing_position) = existing {
                return Err(DiffError::DuplicateKey {
                    key,
                    position: start + offset,
                    existing_position,
                });
            }
        }

        let tail = self.states.split_off(start);
        self.extend_from(items)?;
        self.states.extend(tail);
        self.renumber_from(start + items.len());
        Ok(())
    }

    /// Remove `count` states starting at `start`, shifting later states.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<(), DiffError> {
        let end = start + count;
        if end > self.states.len() {
            return Err(DiffError::out_of_bounds(end, self.states.len()));
        }
        self.states.drain(start..end);
        self.renumber_from(start);
        Ok(())
    }

    pub fn move_state(&mut self, from: usize, to: usize) -> Result<(), DiffError> {
        let len = self.states.len();
        if from >= len {
            return Err(DiffError::out_of_bounds(from, len));
        }
        if to >= len {
            return Err(DiffError::out_of_bounds(to, len));
        }
        self.states.move_index(from, to);
        self.renumber_from(from.min(to));
        Ok(())
    }

    /// Recompute signatures for the states at `start..start + items.len()`.
    pub fn update_signatures<T: KeyedItem>(&mut self, start: usize, items: &[T]) -> Result<(), DiffError> {
        let len = self.states.len();
        if start + items.len() > len {
            return Err(DiffError::out_of_bounds(start + items.len(), len));
        }
        for (offset, item) in items.iter().enumerate() {
            let position = start + offset;
            if let Some(state) = self.slot_mut(position) {
                if state.key != item.key() {
                    return Err(DiffError::UnsupportedMutation {
                        operation: "range changed",
                        details: format!(
                            "item at position {} changed key from {} to {}; report a removal and an insertion instead",
                            position,
                            state.key,
                            item.key()
                        ),
                    });
                }
                state.signature = item.signature();
            }
        }
        Ok(())
    }

    fn renumber_from(&mut self, start: usize) {
        for (index, state) in self.states.values_mut().enumerate().skip(start) {
            state.position = index;
        }
    }
}

impl Index<usize> for Snapshot {
    type Output = ItemState;

    fn index(&self, slot: usize) -> &ItemState {
        &self.states[slot]
    }
}

impl IndexMut<usize> for Snapshot {
    fn index_mut(&mut self, slot: usize) -> &mut ItemState {
        &mut self.states[slot]
    }
}
