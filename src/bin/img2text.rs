//! CLI binary for img2text.
//!
//! A thin shim over the library crate: maps flags to `ExtractionConfig` and
//! a `TesseractCli`, runs the extraction, prints exactly one report on
//! stdout and turns the outcome into an exit code.

use anyhow::{Context, Result};
use clap::Parser;
use img2text::{
    extract, ExtractError, Extraction, ExtractionConfig, InputKind, PageProgress,
    ProgressCallback, TesseractCli,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress for PDF input: one bar on stderr, one dimmed line for
/// each page that produced no text.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: ProgressBar::new(0),
        })
    }
}

impl PageProgress for CliProgress {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} OCR  [{bar:32.green/238}] {pos}/{len}  {msg:.dim}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.bar.set_message(format!("page {page_num}/{total_pages}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        if text_len == 0 {
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                dim("·"),
                page_num,
                total_pages,
                dim("no text"),
            ));
        }
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, pages_with_text: usize) {
        self.bar.finish_and_clear();
        let mark = if pages_with_text == 0 {
            red("✘")
        } else {
            green("✔")
        };
        eprintln!("{mark} {pages_with_text}/{total_pages} pages with text");
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Photo or scan
  img2text receipt.jpg

  # Every page of a PDF, joined with newlines
  img2text scanned-contract.pdf

  # German text, higher rendering resolution
  img2text --lang deu --dpi 300 brief.pdf

  # Single uniform block of text
  img2text --psm 6 label.png

EXIT STATUS:
  0  finished: text extracted, no text recognised, or unsupported file type
  1  invalid configuration
  3  missing, unreadable or corrupt input
  4  tesseract or pdfium unavailable
  5  temporary file error

ENVIRONMENT VARIABLES:
  TESSERACT_CMD     Path to the tesseract executable
  IMG2TEXT_LANG     Default OCR language(s)
  IMG2TEXT_DPI      Default PDF rendering DPI
  PDFIUM_LIB_PATH   Path to libpdfium (PDF input only)
  RUST_LOG          Log filter, e.g. RUST_LOG=img2text=debug
"#;

/// Extract text from an image or PDF file.
#[derive(Parser, Debug)]
#[command(
    name = "img2text",
    version,
    about = "Extract text from an image or PDF.",
    long_about = "Extract text from a .jpg, .jpeg, .png or .pdf file. Images are converted to \
grayscale, denoised with a median filter and binarised with an adaptive threshold before \
being passed to Tesseract. PDF pages are rasterised with pdfium and read in order.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the input image or PDF file.
    input_file: PathBuf,

    /// Tesseract language(s), e.g. eng or eng+fra.
    #[arg(long, env = "IMG2TEXT_LANG", default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode (0–13).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=13))]
    psm: Option<u8>,

    /// Directory containing Tesseract language data.
    #[arg(long)]
    tessdata_dir: Option<PathBuf>,

    /// Tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract: PathBuf,

    /// PDF rendering DPI (72–600).
    #[arg(long, env = "IMG2TEXT_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "IMG2TEXT_PASSWORD")]
    password: Option<String>,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Disable the per-page progress bar for PDFs.
    #[arg(long, env = "IMG2TEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2TEXT_VERBOSE")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Only errors while the progress bar owns stderr.
    let show_progress = !cli.no_progress && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let outcome = match run(&cli, show_progress) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{} {err:#}", red("Error:"));
            return ExitCode::from(error_exit_code(&err));
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(err) = report(&outcome, &mut handle) {
        eprintln!("{} failed to write to stdout: {err}", red("Error:"));
        return ExitCode::FAILURE;
    }

    ExitCode::from(outcome_exit_code(&outcome))
}

fn run(cli: &Cli, show_progress: bool) -> Result<Extraction> {
    let kind = InputKind::from_path(&cli.input_file);

    let mut engine = TesseractCli::new()
        .program(&cli.tesseract)
        .lang(&cli.lang);
    if let Some(psm) = cli.psm {
        engine = engine.psm(psm);
    }
    if let Some(ref dir) = cli.tessdata_dir {
        engine = engine.tessdata_dir(dir);
    }

    // Unsupported input never needs the engine.
    if kind.is_supported() {
        engine.check_available()?;
    }

    let progress: Option<ProgressCallback> = if show_progress && kind == InputKind::Pdf {
        Some(CliProgress::new() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(cli, progress)?;

    let outcome = extract(&cli.input_file, &config, &engine)?;
    Ok(outcome)
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder().dpi(cli.dpi);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print the single user-facing report for a finished run.
fn report(outcome: &Extraction, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        Extraction::Text(text) => {
            writeln!(out, "Extracted Text:")?;
            writeln!(out, "{text}")
        }
        Extraction::Empty => writeln!(out, "Text extraction failed."),
        Extraction::Unsupported { .. } => writeln!(out, "Unsupported file type"),
    }
}

/// Every finished run succeeds; only errors carry a non-zero code.
fn outcome_exit_code(outcome: &Extraction) -> u8 {
    match outcome {
        Extraction::Text(_) | Extraction::Empty | Extraction::Unsupported { .. } => 0,
    }
}

fn error_exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ExtractError>()
        .map(|e| e.kind().exit_code() as u8)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(outcome: &Extraction) -> String {
        let mut buf = Vec::new();
        report(outcome, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn report_text() {
        let out = render(&Extraction::Text("INVOICE".into()));
        assert_eq!(out, "Extracted Text:\nINVOICE\n");
    }

    #[test]
    fn report_empty() {
        assert_eq!(render(&Extraction::Empty), "Text extraction failed.\n");
    }

    #[test]
    fn report_unsupported() {
        let out = render(&Extraction::Unsupported {
            extension: Some("txt".into()),
        });
        assert_eq!(out, "Unsupported file type\n");
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(outcome_exit_code(&Extraction::Text("x".into())), 0);
        assert_eq!(outcome_exit_code(&Extraction::Empty), 0);
        assert_eq!(
            outcome_exit_code(&Extraction::Unsupported { extension: None }),
            0
        );
    }

    #[test]
    fn unsupported_input_skips_engine_check() {
        let cli = Cli::try_parse_from([
            "img2text",
            "--tesseract",
            "/nonexistent/bin/tesseract-img2text-test",
            "--no-progress",
            "notes.txt",
        ])
        .unwrap();
        let outcome = run(&cli, false).unwrap();
        assert_eq!(
            outcome,
            Extraction::Unsupported {
                extension: Some("txt".into())
            }
        );
    }

    #[test]
    fn supported_input_requires_engine() {
        let cli = Cli::try_parse_from([
            "img2text",
            "--tesseract",
            "/nonexistent/bin/tesseract-img2text-test",
            "scan.png",
        ])
        .unwrap();
        let err = run(&cli, false).unwrap_err();
        assert_eq!(error_exit_code(&err), 4);
    }

    #[test]
    fn error_codes_follow_error_kind() {
        let engine: anyhow::Error = ExtractError::EngineUnavailable {
            engine: "tesseract".into(),
            reason: "not found".into(),
        }
        .into();
        assert_eq!(error_exit_code(&engine), 4);

        let decode = anyhow::Error::from(ExtractError::FileNotFound {
            path: "x.png".into(),
        })
        .context("while extracting");
        assert_eq!(error_exit_code(&decode), 3);

        assert_eq!(error_exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[test]
    fn cli_parses_bare_invocation() {
        let cli = Cli::try_parse_from(["img2text", "scan.pdf"]).unwrap();
        assert_eq!(cli.input_file, PathBuf::from("scan.pdf"));
        assert_eq!(cli.psm, None);
        assert!(!cli.no_progress);
    }

    #[test]
    fn cli_rejects_out_of_range_psm() {
        assert!(Cli::try_parse_from(["img2text", "--psm", "14", "a.png"]).is_err());
    }

    #[test]
    fn build_config_maps_flags() {
        let cli = Cli::try_parse_from([
            "img2text",
            "--dpi",
            "300",
            "--password",
            "secret",
            "--pdfium-lib",
            "/opt/libpdfium.so",
            "doc.pdf",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.dpi, 300);
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(
            config.pdfium_library.as_deref(),
            Some(std::path::Path::new("/opt/libpdfium.so"))
        );
    }
}
