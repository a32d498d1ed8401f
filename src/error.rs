//! Error type for effect construction and configuration

use thiserror::Error;

/// Errors raised before an effect starts animating
#[derive(Debug, Error)]
pub enum EffectError {
    /// The drawing surface has a zero dimension
    #[error("surface must have positive dimensions, got {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    /// A tuning value is out of its valid range
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// Settings JSON could not be parsed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// No effect registered under this name
    #[error("unknown effect `{0}`")]
    UnknownEffect(String),
}

pub type Result<T> = std::result::Result<T, EffectError>;
