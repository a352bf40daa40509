use lumen_core::SceneError;
use lumen_math::MathError;
use thiserror::Error;

/// Errors that abort a render call or renderer construction.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid output dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Max depth {max_depth} exceeds the limit of {limit} bounces")]
    DepthTooLarge { max_depth: u32, limit: u32 },

    #[error("No texture for wall code {code} ({available} textures loaded)")]
    MissingTexture { code: u32, available: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Reject zero-sized outputs before any buffer is allocated.
pub(crate) fn check_dimensions(width: u32, height: u32) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(())
}
