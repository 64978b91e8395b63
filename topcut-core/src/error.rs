//! Error types for the export pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting a scene.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested scene root (collection) does not exist.
    #[error("Invalid scene root: {0}")]
    InvalidSceneRoot(String),

    /// A mesh edge references a vertex outside the vertex list.
    #[error("Malformed mesh on {object}: edge {edge} references vertex {index}, mesh has {vertex_count} vertices")]
    MalformedMesh {
        /// Name of the object owning the mesh.
        object: String,
        /// Position of the offending edge in the edge list.
        edge: usize,
        /// The out-of-bounds vertex index.
        index: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex used by an edge has a NaN or infinite coordinate, either in
    /// the mesh itself or after applying the world transform.
    #[error("Malformed mesh on {object}: vertex {index} is not finite")]
    NonFiniteVertex {
        /// Name of the object owning the mesh.
        object: String,
        /// The offending vertex index.
        index: usize,
    },

    /// Writing the finished document failed.
    #[error("Failed to write to {path}: {source}")]
    DestinationWrite {
        /// The destination that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The export configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while validating an [`ExportConfig`](crate::ExportConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Unit scale must be finite and strictly positive.
    #[error("Invalid unit scale: {0} (must be finite and > 0)")]
    InvalidUnitScale(f64),

    /// Padding must be finite and non-negative.
    #[error("Invalid padding: {0} (must be finite and >= 0)")]
    InvalidPadding(f64),

    /// Stroke width must be finite and strictly positive.
    #[error("Invalid stroke width: {0} (must be finite and > 0)")]
    InvalidStrokeWidth(f64),
}

/// Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::InvalidSceneRoot("sheet".to_string());
        assert_eq!(format!("{err}"), "Invalid scene root: sheet");

        let err = ExportError::MalformedMesh {
            object: "lid".to_string(),
            edge: 3,
            index: 9,
            vertex_count: 8,
        };
        let message = format!("{err}");
        assert!(message.contains("lid"));
        assert!(message.contains("vertex 9"));
        assert!(message.contains("8 vertices"));

        let err = ExportError::NonFiniteVertex {
            object: "lid".to_string(),
            index: 2,
        };
        assert_eq!(format!("{err}"), "Malformed mesh on lid: vertex 2 is not finite");
    }

    #[test]
    fn test_config_error_converts() {
        let err: ExportError = ConfigError::InvalidUnitScale(-1.0).into();
        assert!(matches!(err, ExportError::Config(ConfigError::InvalidUnitScale(_))));
        assert!(format!("{err}").contains("-1"));
    }
}
