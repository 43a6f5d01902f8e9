// Error type shared by the whole library
use thiserror::Error;

/// Errors produced by parsing fixtures, loading images and exporting results
///
/// Numeric contract violations (for example comparing bitmaps of different
/// sizes) are not represented here: those panic, because they are bugs in the
/// caller rather than runtime conditions.
#[derive(Debug, Error)]
pub enum Error {
    /// A shape type name that doesn't match any variant
    #[error("unknown shape type: {0}")]
    UnknownShapeType(String),

    /// A scanline literal that isn't of the form `(y,x1,x2)`
    #[error("malformed scanline literal: {0:?}")]
    MalformedScanline(String),

    /// A textual bitmap that doesn't match the fixture format
    #[error("malformed bitmap: {0}")]
    MalformedBitmap(String),

    /// A line of a recorded random trace that couldn't be parsed
    #[error("malformed random trace at line {line}: {text:?}")]
    MalformedTrace { line: usize, text: String },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
