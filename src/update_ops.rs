//! Collects the operations found by a diff, batching adjacent ones when possible
use log::trace;

use crate::types::{OpKind, Operation};

/// A recorded move, kept separately so item positions can be replayed against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOp {
    pub from: usize,
    pub to: usize,
}

impl MoveOp {
    /// Shift `position` the way applying this move shifts any item it did not move.
    pub fn shift(&self, position: usize) -> usize {
        if position > self.from && position <= self.to {
            position - 1
        } else if position < self.from && position >= self.to {
            position + 1
        } else {
            position
        }
    }
}

/// Ordered operation script with running counts.
///
/// Insertions, removals and updates extend the last operation when it has the same
/// kind and the new range is contiguous with it. Moves are never batched and close
/// any open batch.
#[derive(Debug, Clone, Default)]
pub struct OperationScript {
    ops: Vec<Operation>,
    // Item positions must be updated for every MOVE, so we keep track of all
    // moves and apply them lazily when an up to date position is needed
    moves: Vec<MoveOp>,
    last_op: Option<usize>,
    num_insertions: usize,
    num_insertion_batches: usize,
    num_removals: usize,
    num_removal_batches: usize,
}

impl OperationScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, index_to_insert: usize) {
        self.add_range(index_to_insert, 1);
    }

    pub fn add_range(&mut self, start: usize, count: usize) {
        self.num_insertions += count;

        // New items may land anywhere inside the previous insert batch or right after it
        if let Some(Operation::Insert {
            start: last_start,
            count: last_count,
        }) = self.last_op_mut(OpKind::Insert)
        {
            if start >= *last_start && start <= *last_start + *last_count {
                *last_count += count;
                trace!("extend INSERT batch to {}+{}", last_start, last_count);
                return;
            }
        }

        self.num_insertion_batches += 1;
        self.push_op(Operation::Insert { start, count });
    }

    pub fn remove(&mut self, index_to_remove: usize) {
        self.remove_range(index_to_remove, 1);
    }

    pub fn remove_range(&mut self, start: usize, count: usize) {
        self.num_removals += count;

        if let Some(Operation::Remove {
            start: last_start,
            count: last_count,
        }) = self.last_op_mut(OpKind::Remove)
        {
            if *last_start == start {
                // Removes additional items at the end of the batch range
                *last_count += count;
                trace!("extend REMOVE batch to {}+{}", last_start, last_count);
                return;
            }
            if start < *last_start && start + count >= *last_start {
                // Removes additional items at the start and (possibly) end of the batch
                *last_start = start;
                *last_count += count;
                trace!("extend REMOVE batch to {}+{}", last_start, last_count);
                return;
            }
        }

        self.num_removal_batches += 1;
        self.push_op(Operation::Remove { start, count });
    }

    pub fn update(&mut self, index_to_change: usize, key: u64) {
        if let Some(Operation::Update {
            start,
            count,
            changed_keys,
        }) = self.last_op_mut(OpKind::Update)
        {
            if *start == index_to_change + 1 {
                *start = index_to_change;
                *count += 1;
                changed_keys.push(key);
                return;
            }
            if *start + *count == index_to_change {
                *count += 1;
                changed_keys.push(key);
                return;
            }
            if index_to_change >= *start && index_to_change < *start + *count {
                // Already inside the range, only the key is new
                if !changed_keys.contains(&key) {
                    changed_keys.push(key);
                }
                return;
            }
        }

        self.push_op(Operation::Update {
            start: index_to_change,
            count: 1,
            changed_keys: vec![key],
        });
    }

    pub fn move_item(&mut self, from: usize, to: usize) {
        // Moves can't be batched
        self.last_op = None;
        trace!("MOVE {} -> {}", from, to);
        self.ops.push(Operation::Move { from, to });
        self.moves.push(MoveOp { from, to });
    }

    fn last_op_mut(&mut self, kind: OpKind) -> Option<&mut Operation> {
        let index = self.last_op?;
        self.ops.get_mut(index).filter(|op| op.kind() == kind)
    }

    fn push_op(&mut self, op: Operation) {
        trace!("new {} batch {:?}", op.kind(), op);
        self.last_op = Some(self.ops.len());
        self.ops.push(op);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.ops
    }

    pub fn moves(&self) -> &[MoveOp] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn num_removals(&self) -> usize {
        self.num_removals
    }

    pub fn num_insertions(&self) -> usize {
        self.num_insertions
    }

    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn num_insertion_batches(&self) -> usize {
        self.num_insertion_batches
    }

    pub fn num_removal_batches(&self) -> usize {
        self.num_removal_batches
    }

    pub fn num_updates(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind() == OpKind::Update)
            .map(Operation::item_count)
            .sum()
    }
}

impl<'a> IntoIterator for &'a OperationScript {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
