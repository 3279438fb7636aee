//! Central error type for heightmap conversion.
//!
//! Precondition and validation failures are reported to the user and leave
//! the session usable; I/O and codec failures abort the current operation.

/// Errors raised by any conversion stage
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Please load an image first")]
    MissingImage,

    #[error("Please process an image first")]
    MissingHeightmap,

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unknown unit '{0}', expected 'px' or '%'")]
    InvalidUnit(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Resize target {width}x{height} has a zero dimension")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Resize target {width}x{height} is above the {limit} pixel limit")]
    ResizeTooLarge { width: f64, height: f64, limit: u64 },

    #[error("Unsupported export format for {0} (expected .lua, .csv or .json)")]
    UnsupportedFormat(String),

    #[error("Image file does not exist: {0}")]
    ImageNotFound(String),

    #[error("Image has {pixels} pixels, above the {limit} pixel decode limit")]
    ImageTooLarge { pixels: u64, limit: u64 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// True for errors the user can fix by changing inputs or order of steps
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ConvertError::Image(_) | ConvertError::Io(_) | ConvertError::Json(_)
        )
    }
}

/// Result type alias for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
