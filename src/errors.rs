// /src/errors.rs
//! Error handling for the differ. Every failure is raised synchronously with enough
//! context (key, positions) to diagnose it without reproducing the cycle.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error(
        "Two items have the same key {key}. Keys must be unique! \
         Item at position {position} conflicts with item at position {existing_position}"
    )]
    DuplicateKey {
        key: u64,
        position: usize,
        existing_position: usize,
    },

    #[error("Pairing inconsistency for key {key} at position {position}: {details}")]
    PairingInconsistency {
        key: u64,
        position: usize,
        details: String,
    },

    #[error("Unsupported mutation '{operation}': {details}")]
    UnsupportedMutation {
        operation: &'static str,
        details: String,
    },

    #[error("Index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Notifications already paused")]
    NotificationsAlreadyPaused,

    #[error("Notifications already resumed")]
    NotificationsAlreadyResumed,

    #[error("Payload error: {details}")]
    Payload { details: String },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[cfg(feature = "python")]
    #[error("Python call failed: {0}")]
    PythonError(String),
}

impl DiffError {
    pub(crate) fn out_of_bounds(index: usize, len: usize) -> Self {
        DiffError::IndexOutOfBounds { index, len }
    }

    /// True for errors that indicate a bug in the differ itself rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, DiffError::PairingInconsistency { .. })
    }
}

// Helper macro for key extraction from Python dicts
#[cfg(feature = "python")]
#[macro_export]
macro_rules! safe_get {
    ($dict:expr, $key:expr, $ty:ty) => {{
        // get_item returns Result<Option<...>, PyErr>, so unwrap the Result first
        let item = ($dict.get_item($key)?).ok_or_else(|| {
            $crate::errors::DiffError::Payload {
                details: format!("Missing key '{}'", $key),
            }
        })?;
        item.extract::<$ty>()
            .map_err(|e| $crate::errors::DiffError::PythonError(format!(
                "expected {} for '{}': {}",
                stringify!($ty),
                $key,
                e
            )))?
    }};
}

#[cfg(feature = "python")]
impl From<DiffError> for pyo3::PyErr {
    fn from(err: DiffError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for DiffError {
    fn from(err: pyo3::PyErr) -> Self {
        DiffError::PythonError(err.to_string())
    }
}
