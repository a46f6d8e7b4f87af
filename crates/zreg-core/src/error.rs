use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZregError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("No files containing '{stem}' found in {}", dir.display())]
    EmptyInputSet { dir: PathBuf, stem: String },

    #[error(
        "Shape mismatch ({context}): expected {}x{}, found {}x{}",
        expected.0, expected.1, actual.0, actual.1
    )]
    ShapeMismatch {
        context: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("No usable frames for channel {channel} in {}", file.display())]
    InsufficientFrames { file: PathBuf, channel: usize },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Depth propagation halted at depth {depth}: {reason}")]
    PropagationHalt { depth: usize, reason: String },

    #[error("Result cell for depth {depth}, channel {channel} already written")]
    CellOccupied { depth: usize, channel: usize },

    #[error("Result cell for depth {depth}, channel {channel} is outside the table")]
    CellOutOfRange { depth: usize, channel: usize },

    #[error("Denoiser output does not match its input: {0}")]
    DenoiseBatchMismatch(String),

    #[error("Empty frame sequence")]
    EmptySequence,
}

impl ZregError {
    /// Build a [`ZregError::ShapeMismatch`] from two `(rows, cols)` shapes.
    pub fn shape_mismatch(
        context: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Prefix the context of a shape mismatch with `scope` (file, depth,
    /// channel). Other variants pass through unchanged.
    pub fn with_context(self, scope: &str) -> Self {
        match self {
            Self::ShapeMismatch {
                context,
                expected,
                actual,
            } => Self::ShapeMismatch {
                context: format!("{scope}: {context}"),
                expected,
                actual,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZregError>;
