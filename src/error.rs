use thiserror::Error;

/// Errors produced by the negative conversion core and its IO helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// A sample, render or export was requested before any image was loaded.
    #[error("no image loaded")]
    NoImageLoaded,

    /// Sampling coordinate lies outside the buffer.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} buffer")]
    CoordinateOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid buffer dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Raw pixel data does not hold exactly `width * height * 4` bytes.
    #[error("pixel data holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Output buffer passed to the pipeline has different dimensions than the source.
    #[error("output buffer is {out_w}x{out_h}, source is {src_w}x{src_h}")]
    DimensionMismatch {
        src_w: u32,
        src_h: u32,
        out_w: u32,
        out_h: u32,
    },

    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
