//! Python module entry point
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::DiffConfig;
use crate::converters::{json_to_pyobject, python_to_json};
use crate::diff_engine::DiffEngine;
use crate::errors::DiffError;
use crate::ids::hash_str_64;
use crate::types::SimpleItem;
use crate::update_ops::OperationScript;

/// Stateful differ: each call to `diff` compares against the items of the previous call.
#[pyclass]
pub struct ListDiffer {
    engine: DiffEngine,
}

#[pymethods]
impl ListDiffer {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(py: Python<'_>, config: Option<Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => serde_json::from_value::<DiffConfig>(python_to_json(py, dict.as_any())?)
                .map_err(DiffError::from)?,
            None => DiffConfig::default(),
        };
        log::debug!("{}: ListDiffer created with {:?}", config.debug_tag, config);
        Ok(ListDiffer {
            engine: DiffEngine::with_config(config),
        })
    }

    /// Diff `items` against the previous call and return the operations as dicts.
    ///
    /// Items are `(key, signature)` tuples or dicts with `key` and `signature`.
    fn diff<'py>(&mut self, py: Python<'py>, items: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyList>> {
        let items = extract_items(items)?;
        let script = self.engine.notify_item_changes(&items, &mut |_: &OperationScript| {})?;

        let result = PyList::empty(py);
        for op in &script {
            let value = serde_json::to_value(op).map_err(DiffError::from)?;
            result.append(json_to_pyobject(py, &value)?)?;
        }
        Ok(result)
    }

    /// The last diffed generation as `{key: {"key", "position", "signature"}}`.
    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let value = serde_json::to_value(self.engine.previous()).map_err(DiffError::from)?;
        json_to_pyobject(py, &value)
    }

    fn reset(&mut self) {
        self.engine.reset();
    }

    fn __len__(&self) -> usize {
        self.engine.previous().len()
    }
}

fn extract_items(items: &Bound<'_, PyAny>) -> Result<Vec<SimpleItem>, DiffError> {
    let mut extracted = Vec::new();
    for item in items.try_iter()? {
        extracted.push(extract_item(&item?)?);
    }
    Ok(extracted)
}

fn extract_item(item: &Bound<'_, PyAny>) -> Result<SimpleItem, DiffError> {
    if let Ok(dict) = item.cast::<PyDict>() {
        return Ok(SimpleItem::new(
            crate::safe_get!(dict, "key", u64),
            crate::safe_get!(dict, "signature", i64),
        ));
    }
    let (key, signature) = item.extract::<(u64, i64)>().map_err(|e| DiffError::Payload {
        details: format!("item must be a (key, signature) tuple or a dict: {e}"),
    })?;
    Ok(SimpleItem::new(key, signature))
}

/// 64-bit key for a string id, stable across runs and platforms.
#[pyfunction]
fn hash_string_64(value: &str) -> u64 {
    hash_str_64(value)
}

#[pymodule]
fn list_reconciler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ListDiffer>()?;
    m.add_function(wrap_pyfunction!(hash_string_64, m)?)?;

    m.add("INSERT", "INSERT")?;
    m.add("REMOVE", "REMOVE")?;
    m.add("MOVE", "MOVE")?;
    m.add("UPDATE", "UPDATE")?;

    Ok(())
}
