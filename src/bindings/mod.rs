// PyO3 Bindings Module
//
// Exposes page element extraction to Python. Documents cross the boundary as JSON
// snapshot text and descriptors come back either as JSON text or as read-only
// `Descriptor` objects.

mod api;
mod descriptor;

// Re-export for lib.rs
pub use api::{extract_descriptors, extract_documents_batch, extract_page_elements, fingerprint};
pub use descriptor::PyDescriptor;
