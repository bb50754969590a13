// Scenegraph Meta - scene-graph metadata extraction for document-editor extensions
//
// Walks a host document's node hierarchy, probes every node for a type-dependent
// attribute catalogue and returns JSON-safe descriptors. The optional `python`
// feature builds the PyO3 extension module that carries those descriptors across
// the runtime boundary.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod document;
pub mod error;
pub mod extractors;

// Fingerprinting and change detection for polling hosts
pub mod utils;

// PyO3 bindings layer
#[cfg(feature = "python")]
pub mod bindings;

pub use document::{DocumentAccess, HostValue, SceneDocument, SceneNode};
pub use error::ExtractError;
pub use extractors::{Descriptor, ExtractorConfig, ExtractorManager};

/// Scenegraph Meta Python module
///
/// Provides page element extraction for host documents serialized as JSON snapshots.
#[cfg(feature = "python")]
#[pymodule]
fn scenegraph_meta(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Add Python functions
    m.add_function(wrap_pyfunction!(bindings::extract_page_elements, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_descriptors, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_documents_batch, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::fingerprint, m)?)?;

    // Add Python classes
    m.add_class::<bindings::PyDescriptor>()?;

    Ok(())
}
