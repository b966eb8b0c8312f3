//! Text recognition: hand a preprocessed image to an OCR engine.
//!
//! [`Recognizer`] is the seam between the pipeline and the engine. The
//! shipped backend, [`TesseractCli`], drives the `tesseract` executable over
//! stdin/stdout so no native library has to be linked at build time.
//! [`MockRecognizer`] returns canned text and lets the rest of the pipeline
//! be exercised without an engine installed.

use crate::error::ExtractError;
use image::GrayImage;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// An OCR backend.
///
/// Implementations return the raw engine output; callers normally go
/// through [`read_text`], which trims it. An image with no recognisable
/// text yields an empty string, not an error.
pub trait Recognizer {
    /// Human-readable engine name used in error messages and logs.
    fn name(&self) -> &str;

    fn recognize(&self, image: &GrayImage) -> Result<String, ExtractError>;
}

/// Recognise `image` and strip leading/trailing whitespace.
pub fn read_text(recognizer: &dyn Recognizer, image: &GrayImage) -> Result<String, ExtractError> {
    let raw = recognizer.recognize(image)?;
    let text = raw.trim().to_string();
    debug!(
        "{} returned {} chars ({} after trim)",
        recognizer.name(),
        raw.len(),
        text.len()
    );
    Ok(text)
}

// ── Mock backend ─────────────────────────────────────────────────────────────

/// Returns a pre-set string regardless of the image.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Recognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    fn recognize(&self, _image: &GrayImage) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}

// ── Tesseract backend ────────────────────────────────────────────────────────

/// Runs `tesseract stdin stdout -l <lang>` for each image.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    lang: String,
    psm: Option<u8>,
    tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
            psm: None,
            tessdata_dir: None,
        }
    }
}

impl TesseractCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executable to run. Default: `tesseract` from `PATH`.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Language(s), e.g. `eng` or `eng+deu`. Default: `eng`.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Page segmentation mode (0–13). Default: engine default.
    pub fn psm(mut self, psm: u8) -> Self {
        self.psm = Some(psm);
        self
    }

    pub fn tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    /// Arguments passed after the executable name.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.lang.clone(),
        ];
        if let Some(psm) = self.psm {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        if let Some(ref dir) = self.tessdata_dir {
            args.push("--tessdata-dir".to_string());
            args.push(dir.display().to_string());
        }
        args
    }

    /// Run `tesseract --version` to confirm the engine can be started.
    pub fn check_available(&self) -> Result<(), ExtractError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(self.unavailable(format!(
                "`--version` exited with {}",
                output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        debug!(
            "OCR engine: {}",
            banner.lines().next().unwrap_or("tesseract (unknown version)")
        );
        Ok(())
    }

    fn unavailable(&self, reason: String) -> ExtractError {
        ExtractError::EngineUnavailable {
            engine: self.program.display().to_string(),
            reason,
        }
    }
}

impl Recognizer for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, ExtractError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| self.unavailable(format!("failed to encode image as PNG: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(format!("failed to start: {e}")))?;

        // The engine may exit before reading stdin (e.g. missing language
        // data). Its exit status and stderr take precedence over the pipe error.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&png),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| self.unavailable(format!("failed to wait for process: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.unavailable(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        write_result.map_err(|e| self.unavailable(format!("failed to send image: {e}")))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank() -> GrayImage {
        GrayImage::from_pixel(8, 8, Luma([255]))
    }

    #[test]
    fn read_text_trims_output() {
        let r = MockRecognizer::new("  \n INVOICE #42 \n\n");
        assert_eq!(read_text(&r, &blank()).unwrap(), "INVOICE #42");
    }

    #[test]
    fn whitespace_only_output_is_empty_text() {
        let r = MockRecognizer::new("\n\x0c\n");
        assert_eq!(read_text(&r, &blank()).unwrap(), "");
    }

    #[test]
    fn mock_ignores_image_content() {
        let r = MockRecognizer::new("hello");
        assert_eq!(r.recognize(&blank()).unwrap(), "hello");
        assert_eq!(r.recognize(&GrayImage::new(1, 1)).unwrap(), "hello");
    }

    #[test]
    fn tesseract_args_default() {
        assert_eq!(
            TesseractCli::new().args(),
            vec!["stdin", "stdout", "-l", "eng"]
        );
    }

    #[test]
    fn tesseract_args_with_options() {
        let t = TesseractCli::new()
            .lang("eng+fra")
            .psm(6)
            .tessdata_dir("/opt/tessdata");
        assert_eq!(
            t.args(),
            vec![
                "stdin",
                "stdout",
                "-l",
                "eng+fra",
                "--psm",
                "6",
                "--tessdata-dir",
                "/opt/tessdata"
            ]
        );
    }

    #[test]
    fn missing_executable_is_engine_unavailable() {
        let t = TesseractCli::new().program("/nonexistent/bin/tesseract-img2text-test");

        let err = t.check_available().unwrap_err();
        assert!(matches!(err, ExtractError::EngineUnavailable { .. }), "got {err:?}");

        let err = t.recognize(&blank()).unwrap_err();
        assert!(matches!(err, ExtractError::EngineUnavailable { .. }), "got {err:?}");
    }

    #[test]
    fn unencodable_image_is_engine_unavailable() {
        // PNG has no representation for a zero-sized image.
        let t = TesseractCli::new().program("/nonexistent/bin/tesseract-img2text-test");
        let err = t.recognize(&GrayImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, ExtractError::EngineUnavailable { .. }), "got {err:?}");
        assert!(err.to_string().contains("encode"), "got {err}");
    }
}
