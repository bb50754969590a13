// Host node abstraction
//
// Every accessor on `SceneNode` defaults to "absent" so a node kind only has to
// implement what the host actually exposes for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

use super::host_value::HostValue;

/// Why a single accessor could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The host accessor raised when read
    #[error("accessor '{0}' raised")]
    Raised(String),
    /// A reference (parent, child, mask) points at a node that does not exist
    #[error("reference '{0}' does not resolve to a node")]
    DanglingReference(String),
}

/// Result of reading one optional accessor.
///
/// `Ok(None)` means the accessor is undefined for this node, `Err` means reading it
/// failed. The extractor treats both as "omit the field".
pub type Probe<T> = Result<Option<T>, ProbeError>;

/// A 2D point in some node-relative space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Affine transform `[a, b, c, d, tx, ty]`, serialized as a plain 6-number array
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2D(pub [f64; 6]);

impl Matrix2D {
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// A handle into the host document graph.
///
/// Handles are cheap to clone. `key` is the identity used by the walker's visited set
/// and must be stable for the lifetime of the handle; it is independent of `id`,
/// which is host data and may itself fail to read.
pub trait SceneNode: Clone {
    type Key: Eq + Hash + Clone + fmt::Debug;

    fn key(&self) -> Self::Key;

    // Identity
    fn id(&self) -> Probe<String>;
    fn node_type(&self) -> Probe<String>;
    fn name(&self) -> Probe<String> {
        Ok(None)
    }

    // Geometry
    fn width(&self) -> Probe<f64> {
        Ok(None)
    }
    fn height(&self) -> Probe<f64> {
        Ok(None)
    }
    fn bounds_local(&self) -> Probe<Rect> {
        Ok(None)
    }
    fn bounds_in_parent(&self) -> Probe<Rect> {
        Ok(None)
    }
    fn center_point_local(&self) -> Probe<Point> {
        Ok(None)
    }
    fn top_left_local(&self) -> Probe<Point> {
        Ok(None)
    }
    fn translation(&self) -> Probe<Point> {
        Ok(None)
    }
    fn rotation(&self) -> Probe<f64> {
        Ok(None)
    }
    fn rotation_in_screen(&self) -> Probe<f64> {
        Ok(None)
    }
    fn transform_matrix(&self) -> Probe<Matrix2D> {
        Ok(None)
    }

    // Appearance
    fn opacity(&self) -> Probe<f64> {
        Ok(None)
    }
    fn blend_mode(&self) -> Probe<HostValue> {
        Ok(None)
    }
    fn fill(&self) -> Probe<HostValue> {
        Ok(None)
    }
    fn stroke(&self) -> Probe<HostValue> {
        Ok(None)
    }
    fn visual_effects(&self) -> Probe<HostValue> {
        Ok(None)
    }

    // Structure
    fn locked(&self) -> Probe<bool> {
        Ok(None)
    }
    /// `Ok(None)` means the node has no parent.
    fn parent(&self) -> Probe<Self> {
        Ok(None)
    }
    /// Immediate children, in host order. `Ok(None)` means the node has no child list.
    fn children(&self) -> Probe<Vec<Self>> {
        Ok(None)
    }
    /// The "all children" relation the walker descends through.
    fn all_children(&self) -> Probe<Vec<Self>> {
        Ok(None)
    }
    /// The shape this node is clipped by, when it acts as a masked container.
    fn mask_shape(&self) -> Probe<Self> {
        Ok(None)
    }

    // Capability downcasts
    fn as_text(&self) -> Option<&dyn TextCapability> {
        None
    }
    fn as_media(&self) -> Option<&dyn MediaCapability> {
        None
    }
    fn as_image(&self) -> Option<&dyn ImageCapability> {
        None
    }
}

/// Accessors only text-like nodes expose
pub trait TextCapability {
    /// The structured content model (text plus style ranges)
    fn full_content(&self) -> Probe<HostValue>;
    /// Plain text, for hosts without a structured content model
    fn plain_text(&self) -> Probe<String>;
    fn text_alignment(&self) -> Probe<HostValue>;
    fn layout(&self) -> Probe<HostValue>;
}

/// Accessors only media containers expose
pub trait MediaCapability {
    /// Id of the rectangle that holds the media
    fn media_rectangle_id(&self) -> Probe<String>;
}

/// Accessors only image-like nodes expose
pub trait ImageCapability {
    fn image_width(&self) -> Probe<f64>;
    fn image_height(&self) -> Probe<f64>;
}

/// The external collaborator that hands the engine a document.
pub trait DocumentAccess {
    type Node: SceneNode;

    /// Root containers (artboards) of the current page, or `None` when the document
    /// has no page at all.
    fn current_page_roots(&self) -> Option<Vec<Self::Node>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractorManager;

    /// A host whose every optional accessor raises
    #[derive(Clone)]
    struct HostileNode {
        id: &'static str,
        node_type: &'static str,
        kids: Vec<HostileNode>,
    }

    fn raised<T>(accessor: &str) -> Probe<T> {
        Err(ProbeError::Raised(accessor.to_string()))
    }

    impl SceneNode for HostileNode {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.id
        }
        fn id(&self) -> Probe<String> {
            Ok(Some(self.id.to_string()))
        }
        fn node_type(&self) -> Probe<String> {
            Ok(Some(self.node_type.to_string()))
        }
        fn name(&self) -> Probe<String> {
            raised("name")
        }
        fn width(&self) -> Probe<f64> {
            raised("width")
        }
        fn fill(&self) -> Probe<HostValue> {
            raised("fill")
        }
        fn parent(&self) -> Probe<Self> {
            raised("parent")
        }
        fn children(&self) -> Probe<Vec<Self>> {
            raised("children")
        }
        fn all_children(&self) -> Probe<Vec<Self>> {
            Ok(Some(self.kids.clone()))
        }
        fn mask_shape(&self) -> Probe<Self> {
            raised("maskShape")
        }
    }

    #[test]
    fn test_defaults_report_absent() {
        let node = HostileNode {
            id: "n",
            node_type: "Ellipse",
            kids: vec![],
        };
        assert_eq!(node.opacity(), Ok(None));
        assert_eq!(node.transform_matrix(), Ok(None));
        assert!(node.as_text().is_none());
    }

    #[test]
    fn test_hostile_host_still_yields_descriptors() {
        let root = HostileNode {
            id: "root",
            node_type: "ab:Artboard",
            kids: vec![
                HostileNode {
                    id: "shape",
                    node_type: "Ellipse",
                    kids: vec![],
                },
                HostileNode {
                    id: "label",
                    node_type: "Text",
                    kids: vec![],
                },
            ],
        };

        let descriptors = ExtractorManager::new().extract_roots(&[root]);
        assert_eq!(descriptors.len(), 2);
        for descriptor in &descriptors {
            assert!(!descriptor.id.is_empty());
            assert_eq!(descriptor.name, "");
            assert!(descriptor.width.is_none());
            assert!(descriptor.fill.is_none());
            assert!(descriptor.parent_id.is_none());
            assert!(descriptor.children_ids.is_none());
            assert_eq!(descriptor.all_children_ids, Some(vec![]));
        }
        assert_eq!(descriptors[1].node_type, "Text");
        assert!(descriptors[1].text.is_none(), "no text capability offered");
    }

    #[test]
    fn test_geometry_finiteness() {
        assert!(Point { x: 1.0, y: 2.0 }.is_finite());
        assert!(!Rect {
            x: 0.0,
            y: f64::NAN,
            width: 1.0,
            height: 1.0
        }
        .is_finite());
        assert!(!Matrix2D([1.0, 0.0, 0.0, 1.0, f64::INFINITY, 0.0]).is_finite());
    }
}
