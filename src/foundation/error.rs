/// Convenience result type used across memeforge.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Error taxonomy for the raster tools.
///
/// None of these are process-fatal: each is scoped to the single requested
/// operation and leaves previously rendered state intact.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Malformed or unreadable image source.
    #[error("decode failure: {0}")]
    Decode(String),

    /// Seed coordinate outside the pixel buffer.
    #[error("seed ({x}, {y}) is out of bounds for a {width}x{height} buffer")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
    },

    /// Zero-dimension image where pixels are required.
    #[error("empty buffer: {0}")]
    EmptyBuffer(String),

    /// Invalid user-provided parameters or settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Daily auto-caption credits are used up.
    #[error("daily limit reached, try again tomorrow")]
    QuotaExhausted,

    /// Failure while encoding an export.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// Build a [`ForgeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ForgeError::EmptyBuffer`] value.
    pub fn empty_buffer(msg: impl Into<String>) -> Self {
        Self::EmptyBuffer(msg.into())
    }

    /// Build a [`ForgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ForgeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
