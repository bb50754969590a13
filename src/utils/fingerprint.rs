//! Descriptor fingerprints
//!
//! Hosts often re-run extraction on a timer. Hashing the encoded descriptors with
//! Blake3 lets them forward a result only when the page actually changed. The
//! detector is owned by the caller; extraction passes themselves stay stateless.

use crate::error::ExtractError;
use crate::extractors::Descriptor;

/// Blake3 hex digest of the JSON encoding of `descriptors`.
///
/// Record keys encode in sorted order, so equal descriptor lists always produce the
/// same digest.
pub fn fingerprint(descriptors: &[Descriptor]) -> Result<String, ExtractError> {
    let encoded = serde_json::to_vec(descriptors)?;
    Ok(blake3::hash(&encoded).to_hex().to_string())
}

/// Remembers the fingerprint of the last pass it was shown
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pass; returns true when it differs from the previous one (or is the
    /// first).
    pub fn observe(&mut self, descriptors: &[Descriptor]) -> Result<bool, ExtractError> {
        let digest = fingerprint(descriptors)?;
        if self.last.as_deref() == Some(digest.as_str()) {
            return Ok(false);
        }
        tracing::debug!("Descriptor fingerprint changed to {}", digest);
        self.last = Some(digest);
        Ok(true)
    }

    pub fn last_fingerprint(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SceneDocument;
    use crate::extractors::ExtractorManager;

    const PAGE: &str = include_str!("../../test_samples/page.json");

    #[test]
    fn test_fingerprint_is_stable() {
        let manager = ExtractorManager::new();
        let first = fingerprint(&manager.extract_json(PAGE).unwrap()).unwrap();
        let second = fingerprint(&manager.extract_json(PAGE).unwrap()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64, "blake3 hex digest");
    }

    #[test]
    fn test_detector_reports_only_changes() {
        let mut document = SceneDocument::from_json_str(PAGE).unwrap();
        let manager = ExtractorManager::new();
        let mut detector = ChangeDetector::new();

        assert!(detector.observe(&manager.extract_page(&document)).unwrap());
        assert!(!detector.observe(&manager.extract_page(&document)).unwrap());

        document.node_mut("t1").unwrap().name = Some("Renamed".to_string());
        assert!(detector.observe(&manager.extract_page(&document)).unwrap());
        assert!(detector.last_fingerprint().is_some());

        detector.reset();
        assert!(detector.last_fingerprint().is_none());
        assert!(detector.observe(&manager.extract_page(&document)).unwrap());
    }

    #[test]
    fn test_empty_page_has_a_fingerprint() {
        let digest = fingerprint(&[]).unwrap();
        assert_eq!(digest, blake3::hash(b"[]").to_hex().to_string());
    }
}
