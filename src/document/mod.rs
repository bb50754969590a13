//! Host document access
//!
//! The extraction engine reads the host document only through the traits in this
//! module. A host node is a `SceneNode` handle whose accessors are "probes": each one
//! may succeed, report the value as absent, or fail. Kind-specific accessors are
//! reached through capability downcasts (`as_text`, `as_media`, `as_image`) rather
//! than by probing blindly.
//!
//! # Architecture
//!
//! - `node.rs` - `SceneNode`/`DocumentAccess` traits, capabilities, geometry types
//! - `host_value.rs` - `HostValue`, the closed value type for rich host properties
//! - `snapshot.rs` - `SceneDocument`, an in-memory document loaded from JSON

pub mod host_value;
pub mod node;
pub mod snapshot;

pub use host_value::HostValue;
pub use node::{
    DocumentAccess, ImageCapability, Matrix2D, MediaCapability, Point, Probe, ProbeError, Rect,
    SceneNode, TextCapability,
};
pub use snapshot::{NodeRecord, NodeRef, Page, SceneDocument};
