//! ExtractorManager - Public API for page element extraction
//!
//! Wires the graph walker, the descriptor extractor and the safe serializer into a
//! single pass. Each call is self-contained: nothing is cached between passes and the
//! document is only read.

use rayon::prelude::*;

use super::base::{Descriptor, ExtractorConfig};
use super::descriptor::NodeDescriptorExtractor;
use super::walker::GraphWalker;
use crate::document::{DocumentAccess, SceneDocument, SceneNode};
use crate::error::ExtractError;

/// Entry point for extraction passes
#[derive(Debug, Clone, Default)]
pub struct ExtractorManager {
    config: ExtractorConfig,
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract descriptors for every element on the document's current page.
    ///
    /// A document without a page, or a page without artboards, yields an empty list.
    pub fn extract_page<D: DocumentAccess>(&self, document: D) -> Vec<Descriptor> {
        match document.current_page_roots() {
            Some(roots) => self.extract_roots(&roots),
            None => {
                tracing::debug!("Document has no current page, nothing to extract");
                Vec::new()
            }
        }
    }

    /// Extract descriptors for everything beneath `roots`, in pre-order.
    pub fn extract_roots<N: SceneNode>(&self, roots: &[N]) -> Vec<Descriptor> {
        let extractor = NodeDescriptorExtractor::new(&self.config);
        let mut descriptors = Vec::new();
        let mut skipped = 0usize;

        GraphWalker::walk_with(roots, |node| match extractor.extract(node) {
            Some(descriptor) => descriptors.push(descriptor),
            None => skipped += 1,
        });

        tracing::debug!(
            "Extracted {} descriptors from {} roots ({} nodes skipped)",
            descriptors.len(),
            roots.len(),
            skipped
        );
        descriptors
    }

    /// Parse a JSON snapshot and extract its current page.
    pub fn extract_json(&self, document_json: &str) -> Result<Vec<Descriptor>, ExtractError> {
        let document = SceneDocument::from_json_str(document_json)?;
        Ok(self.extract_page(&document))
    }

    /// Extract several independent snapshots in parallel.
    ///
    /// Each document is its own single-threaded pass; results keep input order and a
    /// document that fails to load does not affect the others.
    pub fn extract_batch<S>(&self, documents: &[S]) -> Vec<Result<Vec<Descriptor>, ExtractError>>
    where
        S: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|document| self.extract_json(document.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HostValue, Probe};
    use std::collections::HashSet;

    const PAGE: &str = include_str!("../../test_samples/page.json");
    const EMPTY_PAGE: &str = include_str!("../../test_samples/empty_page.json");

    fn ids(descriptors: &[Descriptor]) -> Vec<&str> {
        descriptors.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_page_extraction_order() {
        let descriptors = ExtractorManager::new().extract_json(PAGE).unwrap();
        assert_eq!(ids(&descriptors), vec!["g1", "r1", "m1", "i1", "r2", "t1"]);
    }

    #[test]
    fn test_zero_artboards_is_empty() {
        let manager = ExtractorManager::new();
        assert!(manager.extract_json(EMPTY_PAGE).unwrap().is_empty());
        assert!(manager
            .extract_json(r#"{"pages": [], "nodes": []}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_null_document_is_invalid_input() {
        let err = ExtractorManager::new().extract_json("null").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_every_descriptor_has_identity() {
        for descriptor in ExtractorManager::new().extract_json(PAGE).unwrap() {
            assert!(!descriptor.id.is_empty());
            assert!(!descriptor.node_type.is_empty());
        }
    }

    #[test]
    fn test_mask_shapes_are_kept() {
        let descriptors = ExtractorManager::new().extract_json(PAGE).unwrap();
        let mask_ids: HashSet<&str> = descriptors
            .iter()
            .filter_map(|d| d.mask_shape_id.as_deref())
            .collect();
        assert!(mask_ids.contains("r2"));

        let mask = descriptors.iter().find(|d| d.id == "r2").unwrap();
        assert_eq!(mask.node_type, "Rectangle");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let document = SceneDocument::from_json_str(PAGE).unwrap();
        let manager = ExtractorManager::new();
        let first = manager.extract_page(&document);
        let second = manager.extract_page(&document);
        assert_eq!(first, second);
    }

    #[test]
    fn test_descriptors_survive_json_round_trip() {
        let descriptors = ExtractorManager::new().extract_json(PAGE).unwrap();
        let encoded = serde_json::to_string(&descriptors).unwrap();
        let decoded: Vec<Descriptor> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, descriptors);
    }

    #[derive(Clone)]
    struct NullValuedNode {
        id: &'static str,
        kids: Vec<NullValuedNode>,
    }

    impl SceneNode for NullValuedNode {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.id
        }
        fn id(&self) -> Probe<String> {
            Ok(Some(self.id.to_string()))
        }
        fn node_type(&self) -> Probe<String> {
            Ok(Some("Rectangle".to_string()))
        }
        fn blend_mode(&self) -> Probe<HostValue> {
            Ok(Some(HostValue::Null))
        }
        fn fill(&self) -> Probe<HostValue> {
            Ok(Some(HostValue::List(vec![HostValue::Null])))
        }
        fn all_children(&self) -> Probe<Vec<Self>> {
            Ok(Some(self.kids.clone()))
        }
    }

    #[test]
    fn test_null_rich_values_survive_json_round_trip() {
        let root = NullValuedNode {
            id: "root",
            kids: vec![NullValuedNode {
                id: "shape",
                kids: vec![],
            }],
        };
        let descriptors = ExtractorManager::new().extract_roots(&[root]);
        assert_eq!(ids(&descriptors), vec!["shape"]);
        assert!(descriptors[0].blend_mode.is_none(), "a bare null is omitted");
        assert_eq!(descriptors[0].fill, Some(serde_json::json!([null])));

        let encoded = serde_json::to_string(&descriptors).unwrap();
        assert!(!encoded.contains("blendMode"));
        let decoded: Vec<Descriptor> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, descriptors);
    }

    #[test]
    fn test_descriptors_are_snapshots() {
        let mut document = SceneDocument::from_json_str(PAGE).unwrap();
        let before = ExtractorManager::new().extract_page(&document);

        document.node_mut("r1").unwrap().width = Some(1.0);
        let after = ExtractorManager::new().extract_page(&document);

        let width = |ds: &[Descriptor]| ds.iter().find(|d| d.id == "r1").unwrap().width;
        assert_eq!(width(&before), Some(100.0));
        assert_eq!(width(&after), Some(1.0));
    }

    #[test]
    fn test_skipped_node_keeps_its_descendants() {
        let document = SceneDocument::from_json_str(
            r#"{
                "pages": [{"id": "p", "artboards": ["ab"]}],
                "nodes": [
                    {"id": "ab", "type": "ab:Artboard", "allChildren": ["anon"]},
                    {"id": "anon", "type": "Group", "throws": ["id"], "allChildren": ["leaf"]},
                    {"id": "leaf", "type": "Rectangle", "parent": "anon"}
                ]
            }"#,
        )
        .unwrap();
        let descriptors = ExtractorManager::new().extract_page(&document);
        assert_eq!(ids(&descriptors), vec!["leaf"]);
        assert_eq!(descriptors[0].parent_id, None, "parent id raised");
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let documents = vec![PAGE.to_string(), "null".to_string(), EMPTY_PAGE.to_string()];
        let results = ExtractorManager::new().extract_batch(&documents);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().len(), 6);
        assert!(results[1].is_err());
        assert!(results[2].as_ref().unwrap().is_empty());
    }
}
