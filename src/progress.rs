//! Progress-callback trait for per-page PDF extraction events.
//!
//! Inject an [`Arc<dyn PageProgress>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the driver walks the rasterised pages. Single images do not
//! emit page events.
//!
//! # Example
//!
//! ```rust
//! use img2text::{ExtractionConfig, PageProgress};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingProgress {
//!     done: AtomicUsize,
//! }
//!
//! impl PageProgress for CountingProgress {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} read ({} chars)", page_num, total_pages, text_len);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(CountingProgress { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the driver as it processes each PDF page.
///
/// Pages are processed sequentially, so events arrive in page order. All
/// methods default to no-ops; override only what you need.
pub trait PageProgress: Send + Sync {
    /// Called once after rasterisation, before the first page is recognised.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page is preprocessed.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page has been recognised.
    ///
    /// `text_len` is the character count of the trimmed page text; zero
    /// means the page will be left out of the joined output.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called once after every page has been recognised.
    ///
    /// # Arguments
    /// * `total_pages`     — total pages in the document
    /// * `pages_with_text` — pages that contributed text to the output
    fn on_extraction_complete(&self, total_pages: usize, pages_with_text: usize) {
        let _ = (total_pages, pages_with_text);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl PageProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn PageProgress>;
