//! Configuration types for text extraction.
//!
//! Extraction behaviour that is not part of the OCR engine itself is
//! controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Engine settings (language, page segmentation
//! mode) live on the recognizer, see [`crate::TesseractCli`].

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Lowest accepted rendering DPI.
pub const MIN_DPI: u32 = 72;
/// Highest accepted rendering DPI.
pub const MAX_DPI: u32 = 600;
/// Smallest accepted page-dimension cap, in pixels.
pub const MIN_RENDERED_PIXELS: u32 = 100;
/// Largest page-dimension cap pdfium can take (its sizes are `i32`).
pub const MAX_RENDERED_PIXELS: u32 = i32::MAX as u32;

/// Configuration for a single extraction run.
///
/// # Example
/// ```rust
/// use img2text::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .dpi(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rendering DPI used when rasterising PDF pages. Range: 72–600. Default: 200.
    ///
    /// Tesseract is tuned for scans around 300 DPI; 200 keeps body text well
    /// above the engine's minimum glyph height while halving the pixel count.
    pub dpi: u32,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 6000.
    ///
    /// Caps oversized pages (posters, engineering drawings) independently of
    /// DPI, scaling the other edge proportionally.
    pub max_rendered_pixels: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit path to the pdfium shared library. If None, the platform
    /// library in the working directory is tried, then the system one.
    pub pdfium_library: Option<PathBuf>,

    /// Per-page progress events for PDF input.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            max_rendered_pixels: 6000,
            password: None,
            pdfium_library: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_library", &self.pdfium_library)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PageProgress>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.clamp(MIN_RENDERED_PIXELS, MAX_RENDERED_PIXELS);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration. Numeric settings are already clamped by their
    /// setters; only the pdfium path can be rejected here.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        if let Some(ref lib) = self.config.pdfium_library {
            if lib.as_os_str().is_empty() {
                return Err(ExtractError::InvalidConfig(
                    "pdfium library path is empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
