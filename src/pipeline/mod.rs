//! Pipeline stages for text extraction.
//!
//! Each submodule implements exactly one step and can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌──────── image ────────┐
//! input ──▶ ─┤                       ├─▶ preprocess ──▶ recognize
//!            └─ pdf ──▶ render ──────┘   (per page)     (tesseract)
//! ```
//!
//! 1. [`input`]      — classify the path once into [`input::InputKind`] and
//!    validate the file
//! 2. [`render`]     — rasterise PDF pages into a scoped temporary directory
//! 3. [`preprocess`] — grayscale, median denoise, adaptive threshold
//! 4. [`recognize`]  — hand the binary image to the OCR engine

pub mod input;
pub mod preprocess;
pub mod recognize;
pub mod render;
