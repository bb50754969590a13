// Utilities Module
//
// Helpers that sit around an extraction pass rather than inside it.

/// Descriptor fingerprints and change detection for polling hosts
pub mod fingerprint;

pub use fingerprint::{fingerprint, ChangeDetector};
