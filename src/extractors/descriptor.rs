//! Node descriptor extractor
//!
//! Builds one `Descriptor` per node. Every catalogue entry is read through a probe;
//! a probe that fails or comes back undefined leaves its field out and the rest of
//! the node is extracted as usual. Kind-specific fields are only read when the type
//! name puts the node in that category and the node offers the matching capability.

use tracing::{debug, trace, warn};

use super::base::{Descriptor, ExtractorConfig, NodeCategories};
use super::serializer::SafeSerializer;
use crate::document::{HostValue, ImageCapability, Probe, SceneNode, TextCapability};

pub struct NodeDescriptorExtractor {
    serializer: SafeSerializer,
    include_full_content: bool,
    include_style_ranges: bool,
}

impl Default for NodeDescriptorExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

/// Reads probes for one node, logging the ones that fail
struct Prober<'a> {
    node_id: &'a str,
}

impl Prober<'_> {
    fn read<T>(&self, field: &str, probe: Probe<T>) -> Option<T> {
        match probe {
            Ok(value) => value,
            Err(e) => {
                debug!("Omitting {} on node {}: {}", field, self.node_id, e);
                None
            }
        }
    }

    fn read_id<N: SceneNode>(&self, field: &str, node: Probe<N>) -> Option<String> {
        let node = self.read(field, node)?;
        self.read(field, node.id()).filter(|id| !id.is_empty())
    }

    fn read_ids<N: SceneNode>(&self, field: &str, nodes: Probe<Vec<N>>) -> Option<Vec<String>> {
        let nodes = self.read(field, nodes)?;
        Some(
            nodes
                .iter()
                .filter_map(|node| self.read(field, node.id()))
                .filter(|id| !id.is_empty())
                .collect(),
        )
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Identity fields are mandatory; anything but a non-empty string disqualifies the node
fn required(probe: Probe<String>) -> Result<String, String> {
    match probe {
        Ok(Some(value)) if !value.is_empty() => Ok(value),
        Ok(Some(_)) => Err("empty".to_string()),
        Ok(None) => Err("undefined".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

impl NodeDescriptorExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            serializer: SafeSerializer::new(config.max_depth),
            include_full_content: config.include_full_content,
            include_style_ranges: config.include_style_ranges,
        }
    }

    /// Extract the descriptor for `node`.
    ///
    /// Returns `None` only when the node's own `id` or `type` cannot be read, since a
    /// descriptor without them would be meaningless downstream.
    pub fn extract<N: SceneNode>(&self, node: &N) -> Option<Descriptor> {
        let id = match required(node.id()) {
            Ok(id) => id,
            Err(reason) => {
                warn!("Skipping node {:?}: id is {}", node.key(), reason);
                return None;
            }
        };
        let node_type = match required(node.node_type()) {
            Ok(node_type) => node_type,
            Err(reason) => {
                warn!("Skipping node {}: type is {}", id, reason);
                return None;
            }
        };

        let prober = Prober { node_id: &id };
        let mut descriptor = Descriptor {
            name: prober.read("name", node.name()).unwrap_or_default(),
            ..Default::default()
        };

        // Geometry
        descriptor.width = prober.read("width", node.width()).and_then(finite);
        descriptor.height = prober.read("height", node.height()).and_then(finite);
        descriptor.bounds_local = prober
            .read("boundsLocal", node.bounds_local())
            .filter(|r| r.is_finite());
        descriptor.bounds_in_parent = prober
            .read("boundsInParent", node.bounds_in_parent())
            .filter(|r| r.is_finite());
        descriptor.center_point_local = prober
            .read("centerPointLocal", node.center_point_local())
            .filter(|p| p.is_finite());
        descriptor.top_left_local = prober
            .read("topLeftLocal", node.top_left_local())
            .filter(|p| p.is_finite());
        descriptor.translation = prober
            .read("translation", node.translation())
            .filter(|p| p.is_finite());
        descriptor.rotation = prober.read("rotation", node.rotation()).and_then(finite);
        descriptor.rotation_in_screen = prober
            .read("rotationInScreen", node.rotation_in_screen())
            .and_then(finite);
        descriptor.transform_matrix = prober
            .read("transformMatrix", node.transform_matrix())
            .filter(|m| m.is_finite());

        // Appearance
        descriptor.opacity = prober.read("opacity", node.opacity()).and_then(finite);
        descriptor.blend_mode = self.rich(&prober, "blendMode", node.blend_mode());
        descriptor.fill = self.rich(&prober, "fill", node.fill());
        descriptor.stroke = self.rich(&prober, "stroke", node.stroke());
        descriptor.visual_effects = self.rich(&prober, "visualEffects", node.visual_effects());

        // Structure
        descriptor.locked = prober.read("locked", node.locked());
        descriptor.parent_id = match node.parent() {
            Ok(None) => Some(None),
            parent => prober.read_id("parent", parent).map(Some),
        };
        descriptor.children_ids = prober.read_ids("children", node.children());
        descriptor.all_children_ids = prober.read_ids("allChildren", node.all_children());
        descriptor.mask_shape_id = prober.read_id("maskShape", node.mask_shape());

        // Content
        let categories = NodeCategories::from_type(&node_type);
        if categories.text {
            if let Some(text) = node.as_text() {
                self.extract_text(&prober, text, &mut descriptor);
            }
        }
        if categories.media {
            if let Some(media) = node.as_media() {
                descriptor.media_rectangle_id =
                    prober.read("mediaRectangle", media.media_rectangle_id());
            }
        }
        if categories.image {
            if let Some(image) = node.as_image() {
                self.extract_image(&prober, image, &mut descriptor);
            }
        }

        descriptor.id = id;
        descriptor.node_type = node_type;
        Some(descriptor)
    }

    fn rich(
        &self,
        prober: &Prober<'_>,
        field: &str,
        probe: Probe<HostValue>,
    ) -> Option<serde_json::Value> {
        let value = prober.read(field, probe)?;
        // A bare null carries nothing and would not survive decoding as present
        self.serializer.serialize(&value).filter(|value| !value.is_null())
    }

    fn extract_text(
        &self,
        prober: &Prober<'_>,
        text: &dyn TextCapability,
        descriptor: &mut Descriptor,
    ) {
        let full_content_probe = text
            .full_content()
            .map(|content| content.filter(|content| !matches!(content, HostValue::Null)));
        let content_raised = full_content_probe.is_err();
        let full_content = prober.read("fullContent", full_content_probe);

        // The content model is authoritative when the host has one. If reading it
        // raised, the text stays unknown.
        descriptor.text = match &full_content {
            Some(content) => content
                .get("text")
                .and_then(HostValue::as_str)
                .map(str::to_string),
            None if content_raised => None,
            None => prober.read("text", text.plain_text()),
        };
        descriptor.text_alignment = self.rich(prober, "textAlignment", text.text_alignment());
        descriptor.layout = self.rich(prober, "layout", text.layout());

        let Some(content) = full_content else {
            return;
        };
        trace!("Raw full content for node {}: {:?}", prober.node_id, content);

        if self.include_full_content {
            descriptor.full_content = self.serializer.serialize(&content);
        }
        if self.include_style_ranges {
            descriptor.character_style_ranges = content
                .get("characterStyleRanges")
                .and_then(|ranges| self.serializer.serialize(ranges))
                .filter(|ranges| !ranges.is_null());
            descriptor.paragraph_style_ranges = content
                .get("paragraphStyleRanges")
                .and_then(|ranges| self.serializer.serialize(ranges))
                .filter(|ranges| !ranges.is_null());
        }
    }

    fn extract_image(
        &self,
        prober: &Prober<'_>,
        image: &dyn ImageCapability,
        descriptor: &mut Descriptor,
    ) {
        if let Some(width) = prober.read("width", image.image_width()).and_then(finite) {
            descriptor.width = Some(width);
        }
        if let Some(height) = prober.read("height", image.image_height()).and_then(finite) {
            descriptor.height = Some(height);
        }
    }
}
