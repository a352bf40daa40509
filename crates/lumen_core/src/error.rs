use thiserror::Error;

/// Errors raised while building or validating scene data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Grid map has no cells")]
    EmptyGrid,

    #[error("Grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Texture must be at least 1x1, got {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },

    #[error("Texture data has {found} texels, expected {expected}")]
    TextureSizeMismatch { expected: usize, found: usize },

    #[error("Mesh normal count {normals} does not match vertex count {vertices}")]
    NormalCountMismatch { normals: usize, vertices: usize },

    #[error("Invalid sphere: {0}")]
    InvalidSphere(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
