use thiserror::Error;

/// Errors surfaced by the diagram, its configuration and the file formats.
#[derive(Debug, Error)]
pub enum VoronoiError {
    /// The site store already holds the configured maximum number of sites.
    #[error("site capacity of {max} reached")]
    CapacityExceeded { max: usize },

    /// A coordinate lies outside the `width` x `height` grid.
    #[error("point ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i64, y: i64, width: u32, height: u32 },

    /// A point list declares more sites than the diagram can hold.
    #[error("point list declares {count} sites but at most {max} are allowed")]
    TooManySites { count: usize, max: usize },

    /// A point list or configuration file could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A pixel buffer handed to a dump does not hold `width * height` pixels.
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// Configuration values that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
