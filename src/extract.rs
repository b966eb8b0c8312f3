//! Extraction driver: classify the input, run the stages, join page text.
//!
//! The driver is strictly sequential. Pages are preprocessed and recognised
//! one at a time in page order, and the first error aborts the run. The
//! rasterised page directory is dropped (and deleted) before returning on
//! every path.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::input::{self, InputKind};
use crate::pipeline::recognize::{read_text, Recognizer};
use crate::pipeline::{preprocess, render};
use crate::progress::PageProgress;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Separator placed between the text of consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n";

/// Result of a completed extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Non-empty recognised text.
    Text(String),
    /// The run succeeded but no text was recognised.
    Empty,
    /// The file extension is not one of `.pdf`, `.jpg`, `.jpeg`, `.png`.
    /// Nothing was read or recognised.
    Unsupported { extension: Option<String> },
}

impl Extraction {
    fn from_text(text: String) -> Self {
        if text.is_empty() {
            Extraction::Empty
        } else {
            Extraction::Text(text)
        }
    }

    /// The recognised text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Extraction::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Extract text from an image or PDF file.
///
/// # Errors
/// Returns `Err(ExtractError)` when the file is missing, cannot be decoded,
/// a page fails to rasterise, or the OCR engine cannot be run. An
/// unsupported extension and an empty result are *outcomes*, not errors.
pub fn extract(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
    recognizer: &dyn Recognizer,
) -> Result<Extraction, ExtractError> {
    let path = path.as_ref();
    let kind = InputKind::from_path(path);
    debug!("Input {} classified as {:?}", path.display(), kind);

    let text = match kind {
        InputKind::Unsupported { extension } => {
            info!("Unsupported file type: {}", path.display());
            return Ok(Extraction::Unsupported { extension });
        }
        InputKind::Image => {
            input::validate_local(path, &kind)?;
            extract_image(path, recognizer)?
        }
        InputKind::Pdf => {
            input::validate_local(path, &kind)?;
            extract_pdf(path, config, recognizer)?
        }
    };

    Ok(Extraction::from_text(text))
}

/// Preprocess and recognise a single image file.
pub fn extract_image(path: &Path, recognizer: &dyn Recognizer) -> Result<String, ExtractError> {
    let start = Instant::now();
    let binary = preprocess::preprocess_path(path)?;
    let text = read_text(recognizer, &binary)?;
    info!(
        "Recognised {} chars from {} in {}ms",
        text.chars().count(),
        path.display(),
        start.elapsed().as_millis()
    );
    Ok(text)
}

/// Rasterise a PDF and recognise every page in order.
pub fn extract_pdf(
    path: &Path,
    config: &ExtractionConfig,
    recognizer: &dyn Recognizer,
) -> Result<String, ExtractError> {
    let render_start = Instant::now();
    let pages = render::render_pages(path, config)?;
    info!(
        "Rendered {} pages in {}ms",
        pages.len(),
        render_start.elapsed().as_millis()
    );

    let progress = config.progress_callback.as_deref();
    let text = recognize_pages(pages.paths(), recognizer, progress);
    drop(pages);
    text
}

/// Preprocess and recognise each page image in order, skip pages with no
/// text, and join the rest with [`PAGE_SEPARATOR`].
pub fn recognize_pages(
    page_paths: &[PathBuf],
    recognizer: &dyn Recognizer,
    progress: Option<&dyn PageProgress>,
) -> Result<String, ExtractError> {
    let total = page_paths.len();
    if let Some(cb) = progress {
        cb.on_extraction_start(total);
    }

    let mut texts = Vec::with_capacity(total);
    for (idx, page_path) in page_paths.iter().enumerate() {
        let page_num = idx + 1;
        if let Some(cb) = progress {
            cb.on_page_start(page_num, total);
        }

        let binary = preprocess::preprocess_path(page_path)?;
        let text = read_text(recognizer, &binary)?;
        let text_len = text.chars().count();

        if text.is_empty() {
            warn!("Page {}/{}: no text recognised, skipping", page_num, total);
        } else {
            debug!("Page {}/{}: {} chars", page_num, total, text_len);
            texts.push(text);
        }

        if let Some(cb) = progress {
            cb.on_page_complete(page_num, total, text_len);
        }
    }

    if let Some(cb) = progress {
        cb.on_extraction_complete(total, texts.len());
    }

    Ok(join_page_texts(texts))
}

/// Join page texts with [`PAGE_SEPARATOR`], dropping empty ones.
pub fn join_page_texts<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for text in texts {
        let text = text.as_ref();
        if text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(PAGE_SEPARATOR);
        }
        out.push_str(text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::recognize::MockRecognizer;
    use image::{GrayImage, Luma};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns scripted answers in call order.
    struct ScriptedRecognizer {
        answers: RefCell<VecDeque<String>>,
        calls: Cell<usize>,
    }

    impl ScriptedRecognizer {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(|s| s.to_string()).collect()),
                calls: Cell::new(0),
            }
        }
    }

    impl Recognizer for ScriptedRecognizer {
        fn name(&self) -> &str {
            "scripted"
        }

        fn recognize(&self, _image: &GrayImage) -> Result<String, ExtractError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.answers.borrow_mut().pop_front().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct EventLog {
        events: Mutex<Vec<String>>,
    }

    impl PageProgress for EventLog {
        fn on_extraction_start(&self, total_pages: usize) {
            self.events.lock().unwrap().push(format!("start {total_pages}"));
        }
        fn on_page_start(&self, page_num: usize, _total_pages: usize) {
            self.events.lock().unwrap().push(format!("page {page_num}"));
        }
        fn on_page_complete(&self, page_num: usize, _total_pages: usize, text_len: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {page_num} {text_len}"));
        }
        fn on_extraction_complete(&self, total_pages: usize, pages_with_text: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete {total_pages} {pages_with_text}"));
        }
    }

    fn write_pages(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(render::page_file_name(i));
                GrayImage::from_pixel(10, 10, Luma([255]))
                    .save_with_format(&path, image::ImageFormat::Png)
                    .unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn join_two_pages_with_newline() {
        assert_eq!(join_page_texts(["Hello", "World"]), "Hello\nWorld");
    }

    #[test]
    fn join_skips_empty_pages() {
        assert_eq!(join_page_texts(["", "A", "", "B", ""]), "A\nB");
        assert_eq!(join_page_texts(Vec::<String>::new()), "");
        assert_eq!(join_page_texts(["", ""]), "");
    }

    #[test]
    fn pages_are_read_in_order_and_empty_ones_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let pages = write_pages(dir.path(), 4);
        let recognizer = ScriptedRecognizer::new(&[" first ", "", "third\n", "fourth"]);

        let text = recognize_pages(&pages, &recognizer, None).unwrap();

        assert_eq!(text, "first\nthird\nfourth");
        assert_eq!(recognizer.calls.get(), 4);
        assert!(!text.lines().any(|l| l.is_empty()));
    }

    #[test]
    fn progress_events_follow_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let pages = write_pages(dir.path(), 2);
        let recognizer = ScriptedRecognizer::new(&["", "abc"]);
        let log = EventLog::default();

        recognize_pages(&pages, &recognizer, Some(&log)).unwrap();

        assert_eq!(
            *log.events.lock().unwrap(),
            vec![
                "start 2", "page 1", "done 1 0", "page 2", "done 2 3", "complete 2 1"
            ]
        );
    }

    #[test]
    fn zero_pages_yield_empty_text() {
        let recognizer = ScriptedRecognizer::new(&[]);
        assert_eq!(recognize_pages(&[], &recognizer, None).unwrap(), "");
        assert_eq!(recognizer.calls.get(), 0);
    }

    #[test]
    fn unreadable_page_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut pages = write_pages(dir.path(), 2);
        std::fs::write(&pages[1], b"corrupt").unwrap();
        pages.push(dir.path().join("page_2.png"));
        let recognizer = ScriptedRecognizer::new(&["one", "two", "three"]);

        let err = recognize_pages(&pages, &recognizer, None).unwrap_err();
        assert!(matches!(err, ExtractError::ImageDecode { .. }), "got {err:?}");
        assert_eq!(recognizer.calls.get(), 1);
    }

    #[test]
    fn unsupported_extension_never_touches_the_file() {
        let recognizer = ScriptedRecognizer::new(&["should not be used"]);
        let config = ExtractionConfig::default();

        let outcome = extract("/no/such/dir/notes.txt", &config, &recognizer).unwrap();

        assert_eq!(
            outcome,
            Extraction::Unsupported {
                extension: Some("txt".into())
            }
        );
        assert_eq!(recognizer.calls.get(), 0);
    }

    #[test]
    fn image_with_text_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        GrayImage::from_pixel(20, 20, Luma([255]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let outcome = extract(
            &path,
            &ExtractionConfig::default(),
            &MockRecognizer::new("INVOICE\n"),
        )
        .unwrap();
        assert_eq!(outcome, Extraction::Text("INVOICE".into()));
        assert_eq!(outcome.text(), Some("INVOICE"));
    }

    #[test]
    fn blank_image_is_empty_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.jpg");
        GrayImage::from_pixel(20, 20, Luma([255]))
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();

        let outcome = extract(&path, &ExtractionConfig::default(), &MockRecognizer::new("")).unwrap();
        assert_eq!(outcome, Extraction::Empty);
        assert_eq!(outcome.text(), None);
    }

    #[test]
    fn missing_image_is_an_error() {
        let err = extract(
            "/no/such/dir/photo.jpeg",
            &ExtractionConfig::default(),
            &MockRecognizer::new("x"),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }
}
