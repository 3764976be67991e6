//! Lookup of the items behind an `Update` operation
//!
//! A sink receiving `Update { start, count, changed_keys }` can build a payload from
//! its current items and fetch exactly the changed ones by key, instead of comparing
//! every item in the range.
use indexmap::IndexMap;

use crate::errors::DiffError;
use crate::types::{KeyedItem, Operation};

#[derive(Debug, Clone)]
pub struct DiffPayload<'a, T> {
    /// Fast path for the common case of a single changed item.
    single: Option<&'a T>,
    by_key: IndexMap<u64, &'a T>,
}

impl<'a, T: KeyedItem> DiffPayload<'a, T> {
    pub fn new(changed: Vec<&'a T>) -> Result<Self, DiffError> {
        match changed.as_slice() {
            [] => Err(DiffError::Payload {
                details: "payload must contain at least one changed item".to_string(),
            }),
            [item] => Ok(DiffPayload::single(*item)),
            _ => {
                let by_key = changed.into_iter().map(|item| (item.key(), item)).collect();
                Ok(DiffPayload { single: None, by_key })
            }
        }
    }

    pub fn single(item: &'a T) -> Self {
        DiffPayload {
            single: Some(item),
            by_key: IndexMap::new(),
        }
    }

    /// Resolve the changed keys of `operation` against `items`, the list as it looks
    /// after the whole script has been applied.
    pub fn for_update(operation: &Operation, items: &'a [T]) -> Result<Self, DiffError> {
        let Operation::Update {
            start,
            count,
            changed_keys,
        } = operation
        else {
            return Err(DiffError::Payload {
                details: format!("expected an UPDATE operation, got {}", operation.kind()),
            });
        };
        let end = start + count;
        let range = items.get(*start..end).ok_or(DiffError::IndexOutOfBounds {
            index: end,
            len: items.len(),
        })?;

        let mut changed = Vec::with_capacity(changed_keys.len());
        for &key in changed_keys {
            let item = range.iter().find(|item| item.key() == key).ok_or_else(|| {
                DiffError::Payload {
                    details: format!("changed key {key} not found in positions {start}..{end}"),
                }
            })?;
            changed.push(item);
        }
        Self::new(changed)
    }

    pub fn get(&self, key: u64) -> Option<&'a T> {
        match self.single {
            Some(item) => (item.key() == key).then_some(item),
            None => self.by_key.get(&key).copied(),
        }
    }

    pub fn len(&self) -> usize {
        if self.single.is_some() { 1 } else { self.by_key.len() }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter().map(|item| item.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.single.into_iter().chain(self.by_key.values().copied())
    }
}

/// Find the item with `key` in any of `payloads`. Returns `None` when there is not
/// exactly one payload, since the sink then can't tell which update it belongs to.
pub fn get_item_from_payloads<'a, T: KeyedItem>(
    payloads: &[DiffPayload<'a, T>],
    key: u64,
) -> Option<&'a T> {
    match payloads {
        [payload] => payload.get(key),
        _ => None,
    }
}
