//! Input classification and validation.
//!
//! The file type is decided exactly once, from the path suffix, and the
//! driver dispatches on the resulting [`InputKind`]. Unsupported inputs are
//! rejected before the file is touched, so their contents (or absence) never
//! matter.

use crate::error::ExtractError;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const PDF_SUFFIXES: &[&str] = &[".pdf"];
const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png"];

/// What kind of input the driver is dealing with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// `.jpg`, `.jpeg` or `.png`.
    Image,
    /// `.pdf`.
    Pdf,
    /// Anything else. `extension` is the raw extension, if the path has one.
    Unsupported { extension: Option<String> },
}

impl InputKind {
    /// Classify a path by its suffix, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let lowered = path.to_string_lossy().to_lowercase();
        let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| lowered.ends_with(s));

        if ends_with_any(PDF_SUFFIXES) {
            InputKind::Pdf
        } else if ends_with_any(IMAGE_SUFFIXES) {
            InputKind::Image
        } else {
            InputKind::Unsupported {
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned()),
            }
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, InputKind::Unsupported { .. })
    }
}

/// Check that a supported input exists and is readable.
///
/// For PDFs the first four bytes must be `%PDF`, so a mislabelled file
/// fails with a clear message instead of a pdfium parse error.
pub fn validate_local(path: &Path, kind: &InputKind) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            if *kind == InputKind::Pdf {
                let mut magic = [0u8; 4];
                if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                    return Err(ExtractError::NotAPdf {
                        path: path.to_path_buf(),
                        magic,
                    });
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated {:?} input: {}", kind, path.display());
    Ok(())
}
