//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema the flood model is trained on.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Artifacts carry their own ordered feature-name list. Projection always
//! follows the artifact's order; the layout hash only tells us whether the
//! artifact was produced against this layout.

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the model input
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Calendar (0-4) ===
    "month",                 // 0: Month of observation (1-12)
    "day",                   // 1: Day of month (1-31)
    "day_of_week",           // 2: Day of week (0 = Monday)
    "day_of_year",           // 3: Ordinal day (1-366)
    "quarter",               // 4: Calendar quarter (1-4)

    // === Scene metadata (5-7) ===
    "days_since_reference",  // 5: Days elapsed since the reference date
    "scene_id_numeric",      // 6: Numeric satellite scene id
    "data_coverage",         // 7: 1 if the scene has usable coverage

    // === Derived from source file (8-10) ===
    "filename_length",       // 8: Length of the source filename
    "filename_hash",         // 9: Filename hash normalized to [0, 1]
    "observation_index",     // 10: Position of the observation in its series
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 11;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over a version byte and an ordered list of feature names
pub fn hash_layout<S: AsRef<str>>(version: u8, names: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Hash of the built-in layout
pub fn layout_hash() -> u32 {
    hash_layout(FEATURE_VERSION, FEATURE_LAYOUT)
}

/// True if `names` is exactly the built-in layout, in order
pub fn matches_layout<S: AsRef<str>>(names: &[S]) -> bool {
    names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a.as_ref() == *b)
}

/// Owned copy of the built-in feature names
pub fn default_feature_names() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 11);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), hash_layout(FEATURE_VERSION, &default_feature_names()));
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let mut names = default_feature_names();
        names.swap(0, 1);
        assert_ne!(hash_layout(FEATURE_VERSION, &names), layout_hash());
        assert!(!matches_layout(&names));
    }

    #[test]
    fn test_layout_hash_depends_on_version() {
        assert_ne!(hash_layout(FEATURE_VERSION + 1, FEATURE_LAYOUT), layout_hash());
    }

    #[test]
    fn test_matches_layout() {
        assert!(matches_layout(FEATURE_LAYOUT));
        assert!(!matches_layout(&FEATURE_LAYOUT[..10]));
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("month"), Some(0));
        assert_eq!(feature_index("data_coverage"), Some(7));
        assert_eq!(feature_index("observation_index"), Some(10));
        assert_eq!(feature_index("rainfall"), None);
    }
}
