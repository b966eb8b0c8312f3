//! # img2text
//!
//! Extract text from an image or PDF file with Tesseract OCR.
//!
//! Photos and scans are cleaned up before recognition: converted to
//! grayscale, median-filtered to remove salt-and-pepper noise, and binarised
//! with an adaptive mean threshold that copes with shadows and uneven
//! lighting. PDF pages are rasterised with pdfium first and recognised one
//! at a time, in order.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Input       classify by extension: image / pdf / unsupported
//!  ├─ 2. Render      (pdf only) pdfium → page_0.png, page_1.png, … in a temp dir
//!  ├─ 3. Preprocess  grayscale → 3×3 median → 5×5 adaptive mean threshold
//!  ├─ 4. Recognize   tesseract, output trimmed
//!  └─ 5. Join        non-empty page texts joined with "\n"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2text::{extract, Extraction, ExtractionConfig, TesseractCli};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = TesseractCli::new().lang("eng");
//!     engine.check_available()?;
//!
//!     match extract("scan.pdf", &ExtractionConfig::default(), &engine)? {
//!         Extraction::Text(text) => println!("{text}"),
//!         Extraction::Empty => eprintln!("no text found"),
//!         Extraction::Unsupported { .. } => eprintln!("unsupported file"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2text` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! ## Runtime requirements
//!
//! * The `tesseract` executable (or pass another path to
//!   [`TesseractCli::program`]).
//! * For PDF input, the pdfium shared library: next to the working
//!   directory, installed system-wide, or given explicitly via
//!   [`ExtractionConfigBuilder::pdfium_library`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ErrorKind, ExtractError};
pub use extract::{extract, join_page_texts, recognize_pages, Extraction, PAGE_SEPARATOR};
pub use pipeline::input::InputKind;
pub use pipeline::preprocess::preprocess;
pub use pipeline::recognize::{read_text, MockRecognizer, Recognizer, TesseractCli};
pub use pipeline::render::{render_pages, PageImages};
pub use progress::{NoopProgress, PageProgress, ProgressCallback};
