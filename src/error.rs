//! Crate error type.
//!
//! Only the document level can fail hard: input that is not JSON, or JSON
//! that is not a `FeatureCollection`. Everything past parsing recovers
//! locally — malformed features are skipped, selection misses render empty,
//! degenerate clusters are a no-op.

/// Errors produced while parsing a feature collection.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The input was not valid JSON / GeoJSON.
    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but its `type` is not `FeatureCollection`.
    #[error("expected a FeatureCollection, got `{0}`")]
    NotACollection(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_wraps_serde_json() {
        let err: DirectoryError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, DirectoryError::Parse(_)));
        assert!(err.to_string().starts_with("invalid GeoJSON"));
    }

    #[test]
    fn test_not_a_collection_names_the_type() {
        let err = DirectoryError::NotACollection("Feature".to_string());
        assert_eq!(err.to_string(), "expected a FeatureCollection, got `Feature`");
    }
}
