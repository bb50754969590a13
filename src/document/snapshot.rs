//! In-memory host document snapshots
//!
//! A `SceneDocument` is a host document captured as JSON: pages listing their
//! artboards, and a flat node table whose structural fields (`parent`, `children`,
//! `allChildren`, `maskShape`, `media.mediaRectangle`) reference other nodes by id.
//! Accessors listed in a node's `throws` raised when the snapshot was captured and
//! replay as probe failures.

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use super::host_value::HostValue;
use super::node::{
    DocumentAccess, ImageCapability, Matrix2D, MediaCapability, Point, Probe, ProbeError, Rect,
    SceneNode, TextCapability,
};
use crate::error::ExtractError;

/// A page and the ids of its root containers
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artboards: Vec<String>,
}

/// One node as captured from the host
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: Option<String>,

    pub width: Option<f64>,
    pub height: Option<f64>,
    pub bounds_local: Option<Rect>,
    pub bounds_in_parent: Option<Rect>,
    pub center_point_local: Option<Point>,
    pub top_left_local: Option<Point>,
    pub translation: Option<Point>,
    pub rotation: Option<f64>,
    pub rotation_in_screen: Option<f64>,
    pub transform_matrix: Option<Matrix2D>,

    pub opacity: Option<f64>,
    pub blend_mode: Option<HostValue>,
    pub fill: Option<HostValue>,
    pub stroke: Option<HostValue>,
    pub visual_effects: Option<HostValue>,

    pub locked: Option<bool>,
    pub parent: Option<String>,
    pub children: Option<Vec<String>>,
    pub all_children: Option<Vec<String>>,
    pub mask_shape: Option<String>,

    pub text: Option<TextRecord>,
    pub media: Option<MediaRecord>,
    pub image: Option<ImageRecord>,

    /// Accessor names that raised on the host
    #[serde(default)]
    pub throws: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub text: Option<String>,
    pub full_content: Option<HostValue>,
    pub text_alignment: Option<HostValue>,
    pub layout: Option<HostValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub media_rectangle: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRecord {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

/// A host document held in memory
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    pages: Vec<Page>,
    nodes: Vec<NodeRecord>,
    index: HashMap<String, usize>,
}

impl SceneDocument {
    pub fn new(pages: Vec<Page>, nodes: Vec<NodeRecord>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.contains_key(&node.id) {
                warn!("Duplicate node id '{}' in snapshot, keeping the first", node.id);
                continue;
            }
            index.insert(node.id.clone(), i);
        }
        Self {
            pages,
            nodes,
            index,
        }
    }

    /// Parse a snapshot from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ExtractError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ExtractError::InvalidInput(format!("document is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Build a snapshot from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, ExtractError> {
        match value {
            Value::Null => Err(ExtractError::InvalidInput("document is null".to_string())),
            Value::Object(_) => {
                let file: SnapshotFile = serde_json::from_value(value).map_err(|e| {
                    ExtractError::InvalidInput(format!("malformed document: {}", e))
                })?;
                debug!(
                    "Loaded snapshot with {} pages and {} nodes",
                    file.pages.len(),
                    file.nodes.len()
                );
                Ok(Self::new(file.pages, file.nodes))
            }
            other => Err(ExtractError::InvalidInput(format!(
                "document must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read a snapshot file from disk
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let document = Self::from_json_str(&content)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        Ok(document)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.index.get(id).map(|&index| NodeRef {
            document: self,
            index,
        })
    }

    /// Mutable access to a node record, for hosts that keep the snapshot in sync
    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeRecord> {
        let index = *self.index.get(id)?;
        self.nodes.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<'a> DocumentAccess for &'a SceneDocument {
    type Node = NodeRef<'a>;

    fn current_page_roots(&self) -> Option<Vec<NodeRef<'a>>> {
        let document: &'a SceneDocument = *self;
        let page = document.pages.first()?;
        let roots = page
            .artboards
            .iter()
            .filter_map(|id| {
                let root = document.node(id);
                if root.is_none() {
                    warn!("Artboard '{}' on page '{}' is not in the snapshot", id, page.id);
                }
                root
            })
            .collect();
        Some(roots)
    }
}

/// Handle to one node of a `SceneDocument`
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a SceneDocument,
    index: usize,
}

impl<'a> NodeRef<'a> {
    pub fn record(&self) -> &'a NodeRecord {
        &self.document.nodes[self.index]
    }

    fn raises(&self, accessor: &str) -> bool {
        self.record().throws.iter().any(|a| a == accessor)
    }

    fn read<T: Clone>(&self, accessor: &str, value: &Option<T>) -> Probe<T> {
        if self.raises(accessor) {
            return Err(ProbeError::Raised(accessor.to_string()));
        }
        Ok(value.clone())
    }

    fn resolve(&self, accessor: &str, id: Option<&String>) -> Probe<NodeRef<'a>> {
        if self.raises(accessor) {
            return Err(ProbeError::Raised(accessor.to_string()));
        }
        match id {
            None => Ok(None),
            Some(id) => self
                .document
                .node(id)
                .map(Some)
                .ok_or_else(|| ProbeError::DanglingReference(id.clone())),
        }
    }

    fn resolve_all(&self, accessor: &str, ids: Option<&Vec<String>>) -> Probe<Vec<NodeRef<'a>>> {
        if self.raises(accessor) {
            return Err(ProbeError::Raised(accessor.to_string()));
        }
        let Some(ids) = ids else {
            return Ok(None);
        };
        let nodes = ids
            .iter()
            .filter_map(|id| {
                let node = self.document.node(id);
                if node.is_none() {
                    warn!(
                        "Node '{}' lists unknown {} entry '{}'",
                        self.record().id,
                        accessor,
                        id
                    );
                }
                node
            })
            .collect();
        Ok(Some(nodes))
    }
}

impl<'a> SceneNode for NodeRef<'a> {
    type Key = usize;

    fn key(&self) -> usize {
        self.index
    }

    fn id(&self) -> Probe<String> {
        self.read("id", &Some(self.record().id.clone()))
    }

    fn node_type(&self) -> Probe<String> {
        self.read("type", &Some(self.record().node_type.clone()))
    }

    fn name(&self) -> Probe<String> {
        self.read("name", &self.record().name)
    }

    fn width(&self) -> Probe<f64> {
        self.read("width", &self.record().width)
    }

    fn height(&self) -> Probe<f64> {
        self.read("height", &self.record().height)
    }

    fn bounds_local(&self) -> Probe<Rect> {
        self.read("boundsLocal", &self.record().bounds_local)
    }

    fn bounds_in_parent(&self) -> Probe<Rect> {
        self.read("boundsInParent", &self.record().bounds_in_parent)
    }

    fn center_point_local(&self) -> Probe<Point> {
        self.read("centerPointLocal", &self.record().center_point_local)
    }

    fn top_left_local(&self) -> Probe<Point> {
        self.read("topLeftLocal", &self.record().top_left_local)
    }

    fn translation(&self) -> Probe<Point> {
        self.read("translation", &self.record().translation)
    }

    fn rotation(&self) -> Probe<f64> {
        self.read("rotation", &self.record().rotation)
    }

    fn rotation_in_screen(&self) -> Probe<f64> {
        self.read("rotationInScreen", &self.record().rotation_in_screen)
    }

    fn transform_matrix(&self) -> Probe<Matrix2D> {
        self.read("transformMatrix", &self.record().transform_matrix)
    }

    fn opacity(&self) -> Probe<f64> {
        self.read("opacity", &self.record().opacity)
    }

    fn blend_mode(&self) -> Probe<HostValue> {
        self.read("blendMode", &self.record().blend_mode)
    }

    fn fill(&self) -> Probe<HostValue> {
        self.read("fill", &self.record().fill)
    }

    fn stroke(&self) -> Probe<HostValue> {
        self.read("stroke", &self.record().stroke)
    }

    fn visual_effects(&self) -> Probe<HostValue> {
        self.read("visualEffects", &self.record().visual_effects)
    }

    fn locked(&self) -> Probe<bool> {
        self.read("locked", &self.record().locked)
    }

    fn parent(&self) -> Probe<Self> {
        self.resolve("parent", self.record().parent.as_ref())
    }

    fn children(&self) -> Probe<Vec<Self>> {
        self.resolve_all("children", self.record().children.as_ref())
    }

    fn all_children(&self) -> Probe<Vec<Self>> {
        self.resolve_all("allChildren", self.record().all_children.as_ref())
    }

    fn mask_shape(&self) -> Probe<Self> {
        self.resolve("maskShape", self.record().mask_shape.as_ref())
    }

    fn as_text(&self) -> Option<&dyn TextCapability> {
        self.record().text.as_ref().map(|_| self as &dyn TextCapability)
    }

    fn as_media(&self) -> Option<&dyn MediaCapability> {
        self.record().media.as_ref().map(|_| self as &dyn MediaCapability)
    }

    fn as_image(&self) -> Option<&dyn ImageCapability> {
        self.record().image.as_ref().map(|_| self as &dyn ImageCapability)
    }
}

impl<'a> TextCapability for NodeRef<'a> {
    fn full_content(&self) -> Probe<HostValue> {
        let text = self.record().text.as_ref();
        self.read("fullContent", &text.and_then(|t| t.full_content.clone()))
    }

    fn plain_text(&self) -> Probe<String> {
        let text = self.record().text.as_ref();
        self.read("text", &text.and_then(|t| t.text.clone()))
    }

    fn text_alignment(&self) -> Probe<HostValue> {
        let text = self.record().text.as_ref();
        self.read("textAlignment", &text.and_then(|t| t.text_alignment.clone()))
    }

    fn layout(&self) -> Probe<HostValue> {
        let text = self.record().text.as_ref();
        self.read("layout", &text.and_then(|t| t.layout.clone()))
    }
}

impl<'a> MediaCapability for NodeRef<'a> {
    fn media_rectangle_id(&self) -> Probe<String> {
        let media = self.record().media.as_ref();
        let rectangle = self.resolve(
            "mediaRectangle",
            media.and_then(|m| m.media_rectangle.as_ref()),
        )?;
        match rectangle {
            Some(rectangle) => rectangle.id(),
            None => Ok(None),
        }
    }
}

impl<'a> ImageCapability for NodeRef<'a> {
    // The host restates these through the same accessors as the generic geometry
    fn image_width(&self) -> Probe<f64> {
        let image = self.record().image.as_ref();
        self.read("width", &image.and_then(|i| i.width))
    }

    fn image_height(&self) -> Probe<f64> {
        let image = self.record().image.as_ref();
        self.read("height", &image.and_then(|i| i.height))
    }
}
