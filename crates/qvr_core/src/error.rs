//! Error types for the VR session

use qvr_runtime::RuntimeError;
use thiserror::Error;

/// VR session errors
#[derive(Debug, Error)]
pub enum VrError {
    /// Tracking/compositor runtime failure
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Eye render target could not be created
    #[error("Failed to create eye render target: {0}")]
    RenderTarget(String),

    /// Config file did not parse
    #[error("Invalid VR config: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("Failed to read VR config: {0}")]
    Io(#[from] std::io::Error),

    /// Operation needs an enabled session
    #[error("VR session is not enabled")]
    NotEnabled,

    /// Setting name not recognised
    #[error("Unknown VR setting: {0}")]
    UnknownSetting(String),

    /// Setting value could not be parsed
    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

/// Result type for VR session operations
pub type Result<T> = std::result::Result<T, VrError>;
