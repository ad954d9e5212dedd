// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to open capture device {index}: {reason}")]
    DeviceOpen { index: u32, reason: String },

    #[error("failed to read frame: {0}")]
    FrameRead(String),

    #[error("invalid frame layout: {width}x{height} with stride {stride} and {len} bytes")]
    FrameLayout {
        width: u32,
        height: u32,
        stride: usize,
        len: usize,
    },

    #[error("unknown joint name: {0}")]
    UnknownJoint(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
