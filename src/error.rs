use miette::Diagnostic;
use thiserror::Error;

/// Main error type for stickerkit operations
#[derive(Error, Diagnostic, Debug)]
pub enum StickerError {
    #[error("Invalid grid {columns}x{rows}: columns and rows must both be at least 1")]
    #[diagnostic(
        code(stickerkit::grid),
        help("Pass the grid as COLUMNSxROWS, for example 4x4")
    )]
    InvalidGrid { columns: u32, rows: u32 },

    #[error("No sticker images provided for composition")]
    #[diagnostic(code(stickerkit::empty))]
    EmptyInput,

    #[error("Failed to decode image: {message}")]
    #[diagnostic(code(stickerkit::decode))]
    Decode {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Pixel buffer unavailable: {message}")]
    #[diagnostic(code(stickerkit::surface))]
    SurfaceAccess { message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(stickerkit::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(stickerkit::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(stickerkit::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(stickerkit::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl StickerError {
    pub(crate) fn surface(message: impl Into<String>) -> Self {
        StickerError::SurfaceAccess {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StickerError>;
