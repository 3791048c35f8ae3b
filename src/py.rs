use crate::matching::options::{MatcherOptions, DEFAULT_MATCH_THRESHOLD};
use crate::matching::{CrossViewMatcher, IdentityValue};
use crate::summary::{Representative, Representatives};
use crate::track::{Embedding, TrackId};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::IntoPyObjectExt;
use std::collections::HashMap;

fn representatives(embeddings: HashMap<TrackId, Vec<f32>>) -> Representatives {
    embeddings
        .into_iter()
        .map(|(id, v)| (id, Representative::new(Embedding::new(&v), 1)))
        .collect()
}

/// Matches representative embeddings of two cameras.
///
/// Returns the secondary track id to identity mapping: the primary track id (int) for the matched
/// tracks and the synthesized label (str) for the unmatched ones.
///
#[pyfunction]
#[pyo3(name = "match_views", signature = (primary, secondary, threshold = DEFAULT_MATCH_THRESHOLD))]
pub fn match_views_py(
    py: Python<'_>,
    primary: HashMap<TrackId, Vec<f32>>,
    secondary: HashMap<TrackId, Vec<f32>>,
    threshold: f32,
) -> PyResult<HashMap<TrackId, PyObject>> {
    let matcher = CrossViewMatcher::new(MatcherOptions::default().threshold(threshold))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let outcome = matcher
        .match_views(&representatives(primary), &representatives(secondary))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    outcome
        .into_identities()
        .into_iter()
        .map(|(id, identity)| {
            let value = match IdentityValue::from(identity) {
                IdentityValue::Id(primary) => primary.into_py_any(py)?,
                IdentityValue::Label(label) => label.into_py_any(py)?,
            };
            Ok::<_, PyErr>((id, value))
        })
        .collect()
}

#[pymodule]
#[pyo3(name = "camreid")]
fn camreid(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();
    m.add_function(wrap_pyfunction!(match_views_py, m)?)?;
    Ok(())
}
