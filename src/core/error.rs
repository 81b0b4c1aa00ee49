use std::path::PathBuf;

/// Result alias for pattern generation.
pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors surfaced by the pattern engine.
///
/// Color channels have no error variant: every color constructor clamps.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("working palette is empty; no fill color can be selected")]
    EmptyPalette,

    /// Non-fatal for motif and overlay passes: the shape is skipped.
    #[error("degenerate polygon: {0} vertices (need at least 3)")]
    DegenerateGeometry(usize),

    #[error("failed to encode image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
