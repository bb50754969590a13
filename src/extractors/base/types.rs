// Extraction data structures
//
// The Descriptor is the only thing that leaves the engine; everything in it is
// already plain JSON data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::document::{Matrix2D, Point, Rect};
use crate::extractors::serializer::DEFAULT_MAX_DEPTH;

/// Configuration for an extraction pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Nesting depth the safe serializer copies before it substitutes the
    /// truncation marker
    pub max_depth: usize,
    /// Whether text descriptors carry the serialized full content model
    pub include_full_content: bool,
    /// Whether character/paragraph style ranges are lifted out of the full content
    pub include_style_ranges: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            include_full_content: true,
            include_style_ranges: true,
        }
    }
}

/// The flat, JSON-safe attribute record for one node.
///
/// `id` and `node_type` are always non-empty. Every other field is present only when
/// the host exposed it and the value was representable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub id: String,
    /// Empty when the host has no name for the node
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,

    // Geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_local: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_in_parent: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_point_local: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left_local: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_in_screen: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_matrix: Option<Matrix2D>,

    // Appearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_effects: Option<Value>,

    // Structure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// `Some(None)` serializes as an explicit `null`: the node has no parent.
    /// `None` means the parent could not be read.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub parent_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_children_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_shape_id: Option<String>,

    // Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_style_ranges: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style_ranges: Option<Value>,

    // Media content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_rectangle_id: Option<String>,
}

// A present key always yields `Some`, even when its value is null
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Content categories a node type belongs to.
///
/// Matching is a case-insensitive substring test on the host type name, and a type
/// can fall into several categories at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCategories {
    pub text: bool,
    pub media: bool,
    pub image: bool,
}

impl NodeCategories {
    pub fn from_type(node_type: &str) -> Self {
        let lower = node_type.to_lowercase();
        Self {
            text: lower.contains("text"),
            media: lower.contains("media"),
            image: lower.contains("image"),
        }
    }
}
