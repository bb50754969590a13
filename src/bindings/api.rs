// API Functions - PyO3-exposed functions for Python
//
// These functions provide the public API for page element extraction.

use super::PyDescriptor;
use crate::extractors::{Descriptor, ExtractorConfig, ExtractorManager};
use crate::utils;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn manager_for(config_json: Option<&str>) -> PyResult<ExtractorManager> {
    let config = match config_json {
        Some(json) => serde_json::from_str::<ExtractorConfig>(json)
            .map_err(|e| PyValueError::new_err(format!("Invalid extractor config: {}", e)))?,
        None => ExtractorConfig::default(),
    };
    Ok(ExtractorManager::with_config(config))
}

fn extract(document_json: &str, config_json: Option<&str>) -> PyResult<Vec<Descriptor>> {
    manager_for(config_json)?
        .extract_json(document_json)
        .map_err(|e| PyValueError::new_err(format!("Extraction failed: {}", e)))
}

/// Extract descriptors for every element on the current page
///
/// Args:
///     document_json (str): Host document snapshot
///     config_json (str | None): Extractor config, e.g. '{"maxDepth": 32}'
///
/// Returns:
///     str: JSON array of descriptors, in pre-order
///
/// Raises:
///     ValueError: If the document is null or malformed
#[pyfunction]
#[pyo3(signature = (document_json, config_json=None))]
pub fn extract_page_elements(document_json: &str, config_json: Option<&str>) -> PyResult<String> {
    let descriptors = extract(document_json, config_json)?;
    serde_json::to_string(&descriptors)
        .map_err(|e| PyValueError::new_err(format!("Failed to encode descriptors: {}", e)))
}

/// Extract descriptors as Descriptor objects
///
/// Args:
///     document_json (str): Host document snapshot
///     config_json (str | None): Extractor config
///
/// Returns:
///     list[Descriptor]: One per element, in pre-order
#[pyfunction]
#[pyo3(signature = (document_json, config_json=None))]
pub fn extract_descriptors(
    document_json: &str,
    config_json: Option<&str>,
) -> PyResult<Vec<PyDescriptor>> {
    Ok(extract(document_json, config_json)?
        .into_iter()
        .map(PyDescriptor::from_descriptor)
        .collect())
}

/// Extract several documents in parallel
///
/// Releases the GIL while extracting. A document that fails to load is logged and
/// yields an empty array, so one bad snapshot does not fail the batch.
///
/// Args:
///     documents (list[str]): Host document snapshots
///     config_json (str | None): Extractor config applied to every document
///
/// Returns:
///     list[str]: JSON arrays of descriptors, in the same order as the input
#[pyfunction]
#[pyo3(signature = (documents, config_json=None))]
pub fn extract_documents_batch(
    py: Python<'_>,
    documents: Vec<String>,
    config_json: Option<&str>,
) -> PyResult<Vec<String>> {
    let manager = manager_for(config_json)?;

    let results: Vec<String> = py.detach(move || {
        manager
            .extract_batch(&documents)
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                let encoded = result.and_then(|descriptors| {
                    serde_json::to_string(&descriptors).map_err(Into::into)
                });
                encoded.unwrap_or_else(|e| {
                    tracing::warn!("Failed to extract document {} in batch: {}", index, e);
                    "[]".to_string()
                })
            })
            .collect()
    });

    Ok(results)
}

/// Blake3 fingerprint of a descriptor list
///
/// Args:
///     descriptors_json (str): JSON array as returned by extract_page_elements
///
/// Returns:
///     str: 64-character hex digest
#[pyfunction]
#[pyo3(signature = (descriptors_json))]
pub fn fingerprint(descriptors_json: &str) -> PyResult<String> {
    let descriptors: Vec<Descriptor> = serde_json::from_str(descriptors_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid descriptors: {}", e)))?;
    utils::fingerprint(&descriptors)
        .map_err(|e| PyValueError::new_err(format!("Fingerprint failed: {}", e)))
}
