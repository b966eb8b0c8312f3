//! Error types for the img2text library.
//!
//! Every pipeline stage returns `Result<_, ExtractError>`. The variants are
//! grouped into a small set of [`ErrorKind`]s so the CLI can map a failure to
//! a user-facing message and a process exit code without inspecting each
//! variant.
//!
//! Two outcomes are deliberately *not* errors:
//!
//! * an unsupported file extension, reported as
//!   [`crate::Extraction::Unsupported`];
//! * a successful run that recognised no text, reported as
//!   [`crate::Extraction::Empty`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the img2text library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The file could not be decoded as an image.
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecode { path: PathBuf, detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The file has a `.pdf` extension but does not start with `%PDF`.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// pdfium could not parse the document.
    #[error("PDF '{path}' could not be read: {detail}")]
    PdfDecode { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium failed to render or the page image could not be encoded.
    #[error("Rasterisation failed for page {page}: {detail}")]
    Rasterisation { page: usize, detail: String },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The OCR engine is missing, failed to start, or rejected its
    /// configuration (unknown language, missing tessdata, ...).
    #[error("OCR engine '{engine}' is unavailable: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF input needs the pdfium shared library. You can:\n\
  • Place libpdfium next to the working directory.\n\
  • Install it system-wide so the loader can find it.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the scratch directory for page images.
    #[error("Failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),

    /// Could not write a rasterised page to disk.
    #[error("Failed to write page image '{path}': {detail}")]
    PageWrite { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unreadable input file.
    Input,
    /// Unreadable or corrupt image.
    ImageDecode,
    /// Unreadable or corrupt PDF, or a page that failed to rasterise.
    PdfDecode,
    /// OCR engine or pdfium library not usable.
    EngineUnavailable,
    /// Local filesystem failure while staging page images.
    Io,
    /// Rejected configuration.
    Config,
}

impl ErrorKind {
    /// Process exit code the CLI uses for this kind of failure.
    ///
    /// Always non-zero: 0 is reserved for finished runs, whatever their
    /// outcome (text, no text, unsupported file type).
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Input | ErrorKind::ImageDecode | ErrorKind::PdfDecode => 3,
            ErrorKind::EngineUnavailable => 4,
            ErrorKind::Io => 5,
            ErrorKind::Config => 1,
        }
    }
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::FileNotFound { .. } | ExtractError::PermissionDenied { .. } => {
                ErrorKind::Input
            }
            ExtractError::ImageDecode { .. } => ErrorKind::ImageDecode,
            ExtractError::NotAPdf { .. }
            | ExtractError::PdfDecode { .. }
            | ExtractError::PasswordRequired { .. }
            | ExtractError::WrongPassword { .. }
            | ExtractError::Rasterisation { .. } => ErrorKind::PdfDecode,
            ExtractError::EngineUnavailable { .. } | ExtractError::PdfiumBindingFailed(_) => {
                ErrorKind::EngineUnavailable
            }
            ExtractError::TempDir(_) | ExtractError::PageWrite { .. } => ErrorKind::Io,
            ExtractError::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}
