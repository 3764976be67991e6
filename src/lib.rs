//! Keyed list reconciliation
//!
//! Given the previous and current contents of an ordered list of keyed items, compute
//! a minimal-ish script of INSERT, REMOVE, MOVE and UPDATE operations that turns the
//! first into the second, and hand it to a rendering surface.
//!
//! ```
//! use list_reconciler::{DiffEngine, Operation, SimpleItem};
//!
//! let mut engine = DiffEngine::new();
//! let before: Vec<SimpleItem> = (1..=3).map(|k| SimpleItem::new(k, 0)).collect();
//! engine.set_items(&before).unwrap();
//! engine.build_diff().unwrap();
//!
//! let after = vec![before[2], before[0], before[1]];
//! engine.set_items(&after).unwrap();
//! let script = engine.build_diff().unwrap();
//! assert_eq!(script.operations(), &[Operation::Move { from: 2, to: 0 }]);
//! ```
pub mod config;
pub mod diff_engine;
pub mod errors;
pub mod ids;
pub mod observed_list;
pub mod payload;
pub mod snapshot;
pub mod timer;
pub mod types;
pub mod update_ops;

#[cfg(feature = "python")]
mod converters;
#[cfg(feature = "python")]
mod python;

pub use config::{DiffConfig, MoveStrategy};
pub use diff_engine::DiffEngine;
pub use errors::DiffError;
pub use ids::{hash_long_64, hash_str_64};
pub use observed_list::{ListObserver, ObservedList, PausedNotifications};
pub use payload::{DiffPayload, get_item_from_payloads};
pub use snapshot::{ItemState, Snapshot};
pub use types::{KeyedItem, OpKind, Operation, OperationSink, SimpleItem};
pub use update_ops::OperationScript;
