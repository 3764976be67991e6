//! Conversion between Python objects and serde_json values, without panicking
use crate::errors::DiffError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyModule};

/// Convert a Python object to JSON by round-tripping it through the `json` module
pub fn python_to_json<'py>(
    py: Python<'py>,
    obj: &Bound<'py, PyAny>,
) -> Result<serde_json::Value, DiffError> {
    let json_mod = PyModule::import(py, "json")?;
    let dumped = json_mod.getattr("dumps")?.call1((obj,))?;
    let s: String = dumped.extract()?;
    Ok(serde_json::from_str(&s)?)
}

/// Convert JSON back to Python with proper type mapping
pub fn json_to_pyobject<'py>(
    py: Python<'py>,
    value: &serde_json::Value,
) -> PyResult<Bound<'py, PyAny>> {
    match value {
        serde_json::Value::Null => Ok(py.None().into_bound(py).into_any()),
        serde_json::Value::Bool(b) => Ok((*b).into_pyobject(py)?.to_owned().into_any()),
        serde_json::Value::Number(n) => {
            // Keys are u64 and may not fit an i64
            if let Some(i) = n.as_i64() {
                Ok(i.into_pyobject(py)?.into_any())
            } else if let Some(u) = n.as_u64() {
                Ok(u.into_pyobject(py)?.into_any())
            } else if let Some(f) = n.as_f64() {
                Ok(f.into_pyobject(py)?.into_any())
            } else {
                Ok(n.to_string().into_pyobject(py)?.into_any())
            }
        }
        serde_json::Value::String(s) => Ok(s.as_str().into_pyobject(py)?.into_any()),
        serde_json::Value::Array(arr) => {
            let list = PyList::empty(py);
            for v in arr {
                list.append(json_to_pyobject(py, v)?)?;
            }
            Ok(list.into_any())
        }
        serde_json::Value::Object(map) => {
            let dict = PyDict::new(py);
            for (k, v) in map {
                dict.set_item(k, json_to_pyobject(py, v)?)?;
            }
            Ok(dict.into_any())
        }
    }
}
