//! Core value types shared by the differ and its collaborators
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::update_ops::OperationScript;

/// An item that can be diffed: a stable identity plus a cheap content signature.
///
/// Two items with the same key in consecutive generations are the same logical item.
/// The signature only needs to be stable for unchanged content; a collision is a
/// missed update, never a wrong script.
pub trait KeyedItem {
    fn key(&self) -> u64;
    fn signature(&self) -> i64;
}

impl<T: KeyedItem + ?Sized> KeyedItem for &T {
    fn key(&self) -> u64 {
        (**self).key()
    }

    fn signature(&self) -> i64 {
        (**self).signature()
    }
}

/// Plain `(key, signature)` pair, handy when the caller already has both values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleItem {
    pub key: u64,
    pub signature: i64,
}

impl SimpleItem {
    pub fn new(key: u64, signature: i64) -> Self {
        SimpleItem { key, signature }
    }
}

impl KeyedItem for SimpleItem {
    fn key(&self) -> u64 {
        self.key
    }

    fn signature(&self) -> i64 {
        self.signature
    }
}

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Insert,
    Remove,
    Move,
    Update,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Insert => "INSERT",
            OpKind::Remove => "REMOVE",
            OpKind::Move => "MOVE",
            OpKind::Update => "UPDATE",
        };
        f.write_str(name)
    }
}

/// One step of an operation script. Positions are only valid once every earlier
/// operation of the same script has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Operation {
    Insert {
        start: usize,
        count: usize,
    },
    Remove {
        start: usize,
        count: usize,
    },
    /// Single-item move: remove at `from`, then insert at `to`.
    Move {
        from: usize,
        to: usize,
    },
    Update {
        start: usize,
        count: usize,
        changed_keys: Vec<u64>,
    },
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Insert { .. } => OpKind::Insert,
            Operation::Remove { .. } => OpKind::Remove,
            Operation::Move { .. } => OpKind::Move,
            Operation::Update { .. } => OpKind::Update,
        }
    }

    /// Number of items touched; a move always touches exactly one.
    pub fn item_count(&self) -> usize {
        match self {
            Operation::Insert { count, .. }
            | Operation::Remove { count, .. }
            | Operation::Update { count, .. } => *count,
            Operation::Move { .. } => 1,
        }
    }
}

/// The rendering surface that receives finished scripts. It is handed the script
/// exactly once per cycle and must apply the operations in order.
pub trait OperationSink {
    fn on_operations(&mut self, script: &OperationScript);
}

impl<F> OperationSink for F
where
    F: FnMut(&OperationScript),
{
    fn on_operations(&mut self, script: &OperationScript) {
        self(script)
    }
}
