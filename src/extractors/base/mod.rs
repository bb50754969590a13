// Base types shared by the walker, extractor and serializer
//
// - types.rs: Descriptor, ExtractorConfig, NodeCategories

pub mod types;

pub use types::{Descriptor, ExtractorConfig, NodeCategories};
