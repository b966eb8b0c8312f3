//! PDF rasterisation: render every page to a PNG file via pdfium.
//!
//! Pages are written as `page_0.png`, `page_1.png`, … inside a fresh
//! temporary directory owned by the returned [`PageImages`]. The directory
//! and everything in it is removed when that value is dropped, so no page
//! images outlive the extraction, whether it succeeds or fails.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Rasterised pages on disk, in page order.
#[derive(Debug)]
pub struct PageImages {
    paths: Vec<PathBuf>,
    dir: TempDir,
}

impl PageImages {
    /// Create an empty set backed by a new temporary directory.
    pub fn create() -> Result<Self, ExtractError> {
        let dir = tempfile::Builder::new()
            .prefix("img2text-")
            .tempdir()
            .map_err(ExtractError::TempDir)?;
        Ok(Self {
            paths: Vec::new(),
            dir,
        })
    }

    /// Path for the zero-based page `index` inside the directory.
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.path().join(page_file_name(index))
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The backing directory. Gone once `self` is dropped.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// File name for the zero-based page `index`.
pub fn page_file_name(index: usize) -> String {
    format!("page_{index}.png")
}

/// pdfium takes `i32` sizes; larger caps saturate instead of wrapping.
pub fn render_size_limit(max_rendered_pixels: u32) -> i32 {
    i32::try_from(max_rendered_pixels).unwrap_or(i32::MAX)
}

/// Bind to pdfium: explicit path, then `./`, then the system library.
pub fn bind_pdfium(library: Option<&Path>) -> Result<Pdfium, ExtractError> {
    let bindings = match library {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Rasterise every page of `pdf_path` to PNG files, in page order.
///
/// A document with zero pages yields an empty [`PageImages`].
pub fn render_pages(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<PageImages, ExtractError> {
    let pdfium = bind_pdfium(config.pdfium_library.as_deref())?;
    let password = config.password.as_deref();

    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                ExtractError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                ExtractError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            ExtractError::PdfDecode {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let max_pixels = render_size_limit(config.max_rendered_pixels);
    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(config.dpi as f32 / 72.0)
        .set_maximum_width(max_pixels)
        .set_maximum_height(max_pixels);

    let mut images = PageImages::create()?;

    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ExtractError::Rasterisation {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let img = bitmap.as_image();
        let path = images.path_for(idx);
        img.save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| ExtractError::PageWrite {
                path: path.clone(),
                detail: e.to_string(),
            })?;

        debug!(
            "Rendered page {} → {}x{} px → {}",
            idx + 1,
            img.width(),
            img.height(),
            path.display()
        );
        images.push(path);
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_are_zero_based() {
        assert_eq!(page_file_name(0), "page_0.png");
        assert_eq!(page_file_name(12), "page_12.png");
    }

    #[test]
    fn render_size_limit_saturates() {
        assert_eq!(render_size_limit(6000), 6000);
        assert_eq!(render_size_limit(u32::MAX), i32::MAX);
    }

    #[test]
    fn page_images_directory_is_removed_on_drop() {
        let mut images = PageImages::create().unwrap();
        let dir = images.dir().to_path_buf();
        let path = images.path_for(0);
        std::fs::write(&path, b"png bytes").unwrap();
        images.push(path.clone());

        assert_eq!(images.len(), 1);
        assert!(path.starts_with(&dir));
        assert!(dir.exists());

        drop(images);
        assert!(!dir.exists(), "temporary page directory should be cleaned up");
    }

    #[test]
    fn new_page_images_is_empty() {
        let images = PageImages::create().unwrap();
        assert!(images.is_empty());
        assert!(images
            .dir()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("img2text-"));
    }
}
