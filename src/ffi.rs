//! Python FFI bindings via PyO3.
//!
//! The web layer that talks to users is written in Python. These bindings
//! let it load the catalog once at start-up and call [`identify`] on every
//! request without going through a database query per turn.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from ident_core import Catalog, identify
//!
//! catalog = Catalog(
//!     ["plumage_colour", "size"],
//!     [{"id": 1, "name": "Robin", "plumage_colour": "brown, red", "size": "small"},
//!      {"id": 2, "name": "Magpie", "plumage_colour": "black, white", "size": None}],
//! )
//! result = identify(catalog, {"plumage_colour": ["red"]}, candidate_threshold=2)
//! print(result["question"], result["matches"])
//! ```
//!
//! [`identify`]: crate::session::identify

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::attribute::{AttributeSpec, TokenSet};
use crate::catalog::{Catalog, EntityId, EntityRecord};
use crate::config::IdentifyConfig;
use crate::constraint::{ConstraintMap, FREE_FORM_KEY};
use crate::session;

const ID_KEY: &str = "id";
const NAME_KEY: &str = "name";

// Keys of one quiz-mode error record, as the web layer stores them.
const ERROR_CATEGORY_KEY: &str = "category";
const ERROR_ADJECTIVE_KEY: &str = "adjective";
const ERROR_VALUE_KEY: &str = "bird_value";

fn to_py_err(err: crate::error::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Render any Python value as text; strings pass through unchanged.
fn text_of(value: &Bound<'_, PyAny>) -> PyResult<String> {
    match value.extract::<String>() {
        Ok(text) => Ok(text),
        Err(_) => Ok(value.str()?.to_string()),
    }
}

/// A Python value as a token set: `None`, a string, or a list of strings.
fn tokens_of(value: &Bound<'_, PyAny>) -> PyResult<TokenSet> {
    if value.is_none() {
        return Ok(TokenSet::new());
    }
    if let Ok(raw) = value.extract::<String>() {
        return Ok(TokenSet::from_raw(&raw));
    }
    let values: Vec<String> = value.extract()?;
    Ok(values.into())
}

fn record_from_dict(columns: &AttributeSpec, dict: &Bound<'_, PyDict>) -> PyResult<EntityRecord> {
    let id: u32 = dict
        .get_item(ID_KEY)?
        .ok_or_else(|| PyValueError::new_err("entity is missing `id`"))?
        .extract()?;
    let name = dict
        .get_item(NAME_KEY)?
        .ok_or_else(|| PyValueError::new_err(format!("entity {id} is missing `name`")))?;
    let mut record = EntityRecord::new(id, text_of(&name)?);

    for (key, value) in dict.iter() {
        let key: String = key.extract()?;
        if key == ID_KEY || key == NAME_KEY {
            continue;
        }
        if columns.contains(&key) {
            record = if value.is_none() {
                record.with_null(key)
            } else {
                record.with_value(key, text_of(&value)?)
            };
        } else if !value.is_none() {
            record = record.with_detail(key, text_of(&value)?);
        }
    }
    Ok(record)
}

fn constraints_from_dict(dict: &Bound<'_, PyDict>) -> PyResult<ConstraintMap> {
    let mut constraints = ConstraintMap::new();
    for (key, value) in dict.iter() {
        let key: String = key.extract()?;
        if key == FREE_FORM_KEY {
            if let Ok(notes) = value.downcast::<PyDict>() {
                for (label, note) in notes.iter() {
                    constraints.note(text_of(&label)?, tokens_of(&note)?);
                }
                continue;
            }
        }
        constraints.insert(key, tokens_of(&value)?);
    }
    Ok(constraints)
}

// ── Catalog ──────────────────────────────────────────────────────────────────

/// Read-only entity catalog.
///
/// Args:
///     columns:  attribute names stored for every entity
///     entities: list of dicts with `id`, `name`, one key per column, and any
///               number of display-only keys
#[pyclass(name = "Catalog", frozen)]
pub struct PyCatalog {
    inner: Catalog,
}

#[pymethods]
impl PyCatalog {
    /// Validate and load a catalog. Raises ValueError on malformed entities.
    #[new]
    pub fn new(columns: Vec<String>, entities: Vec<Bound<'_, PyDict>>) -> PyResult<Self> {
        let columns = AttributeSpec::new(&columns).map_err(to_py_err)?;
        let records = entities
            .iter()
            .map(|dict| record_from_dict(&columns, dict))
            .collect::<PyResult<Vec<_>>>()?;
        let inner = Catalog::new(columns, records).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Distinct values per attribute, for prompting the extraction model.
    pub fn vocabulary(&self, attributes: Vec<String>) -> PyResult<Vec<(String, Vec<String>)>> {
        let attributes = AttributeSpec::new(&attributes).map_err(to_py_err)?;
        Ok(self.inner.vocabulary(&attributes))
    }

    /// Number of entities.
    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Catalog(columns={}, entities={})",
            self.inner.columns().len(),
            self.inner.len()
        )
    }
}

// ── identify ─────────────────────────────────────────────────────────────────

/// Run one identification turn.
///
/// Args:
///     catalog:             Catalog to search
///     constraints:         dict of attribute → str | list[str] | None
///     target:              quiz-mode entity id, or None / -1 for no quiz check
///     candidate_threshold: stop asking when fewer candidates remain (default 2)
///     match_limit:         number of ranked matches returned (default 5)
///     attributes:          attributes allowed as questions (default: bird attributes)
///
/// Returns:
///     dict with `question` (str | None), `error` (list of
///     `{category, adjective, bird_value}` | None), `matches` (list | None)
#[pyfunction]
#[pyo3(signature = (catalog, constraints, target=None, candidate_threshold=2, match_limit=5, attributes=None))]
pub fn identify<'py>(
    py: Python<'py>,
    catalog: &PyCatalog,
    constraints: &Bound<'py, PyDict>,
    target: Option<i64>,
    candidate_threshold: usize,
    match_limit: usize,
    attributes: Option<Vec<String>>,
) -> PyResult<Bound<'py, PyDict>> {
    let mut config = IdentifyConfig {
        candidate_threshold,
        match_limit,
        ..IdentifyConfig::default()
    };
    if let Some(attributes) = attributes {
        config.attributes = AttributeSpec::new(&attributes).map_err(to_py_err)?;
    }
    let constraints = constraints_from_dict(constraints)?;
    let target = target
        .and_then(|id| u32::try_from(id).ok())
        .map(EntityId);

    let result = session::identify(&catalog.inner, &constraints, &config, target);

    let out = PyDict::new_bound(py);
    out.set_item("question", result.question)?;
    match result.discrepancies {
        Some(found) => {
            let list = PyList::empty_bound(py);
            for d in found {
                let item = PyDict::new_bound(py);
                item.set_item(ERROR_CATEGORY_KEY, d.attribute)?;
                item.set_item(ERROR_ADJECTIVE_KEY, d.requested)?;
                item.set_item(ERROR_VALUE_KEY, d.actual)?;
                list.append(item)?;
            }
            out.set_item("error", list)?;
        }
        None => out.set_item("error", py.None())?,
    }
    match result.matches {
        Some(matches) => {
            let list = PyList::empty_bound(py);
            for m in matches {
                let item = PyDict::new_bound(py);
                for (key, value) in m.fields {
                    item.set_item(key, value)?;
                }
                item.set_item(ID_KEY, m.id.0)?;
                item.set_item(NAME_KEY, m.name)?;
                item.set_item("match_percentage", m.match_percentage)?;
                list.append(item)?;
            }
            out.set_item("matches", list)?;
        }
        None => out.set_item("matches", py.None())?,
    }
    out.set_item("candidate_count", result.candidate_count)?;
    Ok(out)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Twenty-questions identification core.
///
/// Exposes catalog loading and the per-turn `identify` call.
#[pymodule]
pub fn ident_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCatalog>()?;
    m.add_function(wrap_pyfunction!(identify, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("FREE_FORM_KEY", FREE_FORM_KEY)?;
    Ok(())
}
