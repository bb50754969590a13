//! Scene-graph extraction
//!
//! Turns the nodes beneath a page's artboards into JSON-safe descriptors.
//!
//! # Architecture
//!
//! - `base/` - Descriptor, configuration and node categories
//! - `walker.rs` - Pre-order traversal with a visited-set guard
//! - `descriptor.rs` - Per-node probe-and-omit extraction
//! - `serializer.rs` - Host value to plain JSON copy
//! - `manager.rs` - ExtractorManager public API (single pass and batch)

pub mod base;
pub mod descriptor;
pub mod manager;
pub mod serializer;
pub mod walker;

// Re-export the public API
pub use base::{Descriptor, ExtractorConfig, NodeCategories};
pub use descriptor::NodeDescriptorExtractor;
pub use manager::ExtractorManager;
pub use serializer::{SafeSerializer, DEFAULT_MAX_DEPTH, TRUNCATION_MARKER};
pub use walker::GraphWalker;
