// PyDescriptor - PyO3 wrapper for the extracted Descriptor
//
// Read-only view of one page element's attributes.

use crate::extractors::Descriptor;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python-accessible Descriptor wrapper
///
/// The identity fields are always present; everything else is None when the host
/// did not expose it. `to_json()` returns the full record.
#[pyclass(name = "Descriptor")]
pub struct PyDescriptor {
    inner: Descriptor,
}

impl PyDescriptor {
    pub fn from_descriptor(descriptor: Descriptor) -> Self {
        PyDescriptor { inner: descriptor }
    }
}

#[pymethods]
impl PyDescriptor {
    // Required fields (always present)

    #[getter]
    fn id(&self) -> String {
        self.inner.id.clone()
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    #[getter]
    fn node_type(&self) -> String {
        self.inner.node_type.clone()
    }

    // Optional fields (can be None)

    #[getter]
    fn parent_id(&self) -> Option<String> {
        self.inner.parent_id.clone().flatten()
    }

    #[getter]
    fn children_ids(&self) -> Option<Vec<String>> {
        self.inner.children_ids.clone()
    }

    #[getter]
    fn mask_shape_id(&self) -> Option<String> {
        self.inner.mask_shape_id.clone()
    }

    #[getter]
    fn text(&self) -> Option<String> {
        self.inner.text.clone()
    }

    #[getter]
    fn width(&self) -> Option<f64> {
        self.inner.width
    }

    #[getter]
    fn height(&self) -> Option<f64> {
        self.inner.height
    }

    /// The full descriptor as JSON text
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner)
            .map_err(|e| PyValueError::new_err(format!("Failed to encode descriptor: {}", e)))
    }

    fn __repr__(&self) -> String {
        format!(
            "Descriptor(id='{}', type='{}', name='{}')",
            self.inner.id, self.inner.node_type, self.inner.name
        )
    }
}
