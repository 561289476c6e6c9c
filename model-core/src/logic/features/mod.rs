//! Features Module - Model input schema
//!
//! Built-in layout, dense feature records and projection onto the order a
//! loaded model expects.

pub mod layout;
pub mod projection;
pub mod vector;

// Re-export common types
pub use layout::{
    default_feature_names, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};
pub use projection::{project, Projection, MISSING_FEATURE_DEFAULT};
pub use vector::{FeatureSource, FeatureVector};
