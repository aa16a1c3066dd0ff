//! PDF page rasterization seam and the pdfium backend.

use image::{ImageFormat, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Zoom applied to the first page on both axes before detection.
pub const PDF_RENDER_SCALE: RenderScale = RenderScale { x: 2.0, y: 2.0 };

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("document has no pages")]
    EmptyDocument,
    #[error("pdfium: {0}")]
    Pdfium(#[from] PdfiumError),
    #[error("rendered bitmap has invalid size {width}x{height}")]
    InvalidBitmap { width: i32, height: i32 },
    #[error("failed to write raster: {0}")]
    Write(#[from] image::ImageError),
}

/// Per-axis scale factor relative to the page's native size (72 dpi).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScale {
    pub x: f32,
    pub y: f32,
}

/// Rasterizes the first page of a PDF document into a PNG file.
pub trait PageRenderer {
    /// Render page 0 of `pdf` at `scale` and write it as PNG to `out`.
    ///
    /// `out` already exists and is owned by the caller.
    fn render_first_page(&self, pdf: &Path, scale: RenderScale, out: &Path)
        -> Result<(), RenderError>;
}

impl<R: PageRenderer + ?Sized> PageRenderer for &R {
    fn render_first_page(
        &self,
        pdf: &Path,
        scale: RenderScale,
        out: &Path,
    ) -> Result<(), RenderError> {
        (**self).render_first_page(pdf, scale, out)
    }
}

/// Renderer backed by the pdfium library via `pdfium-render`.
///
/// The library is bound on each render, so constructing one never touches
/// pdfium and image-only runs do not need it installed.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// Use the system pdfium library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer the pdfium library in `dir`, falling back to the system one.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, RenderError> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|e| {
                    tracing::warn!(dir = %dir.display(), error = %e, "pdfium not found in configured dir; trying system library");
                    Pdfium::bind_to_system_library()
                })?,
            None => Pdfium::bind_to_system_library()?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_first_page(
        &self,
        pdf: &Path,
        scale: RenderScale,
        out: &Path,
    ) -> Result<(), RenderError> {
        let pdfium = self.bind()?;
        let document = pdfium.load_pdf_from_file(pdf, None)?;
        let pages = document.pages();

        let page_count = pages.len();
        if page_count == 0 {
            return Err(RenderError::EmptyDocument);
        }

        let page = pages.get(0)?;
        let target_w = (page.width().value * scale.x).round() as i32;
        let target_h = (page.height().value * scale.y).round() as i32;
        tracing::debug!(page_count, target_w, target_h, "rasterizing first PDF page");

        let config = PdfRenderConfig::new().set_target_size(target_w, target_h);
        let bitmap = page.render_with_config(&config)?;

        let (width, height) = (bitmap.width(), bitmap.height());
        let invalid = || RenderError::InvalidBitmap { width, height };
        let raster = RgbaImage::from_raw(
            u32::try_from(width).map_err(|_| invalid())?,
            u32::try_from(height).map_err(|_| invalid())?,
            bitmap.as_rgba_bytes(),
        )
        .ok_or_else(invalid)?;

        raster.save_with_format(out, ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_scale_is_2x() {
        assert_eq!(PDF_RENDER_SCALE, RenderScale { x: 2.0, y: 2.0 });
    }

    #[test]
    fn test_construction_does_not_bind() {
        // Must not require pdfium to be installed.
        assert_eq!(PdfiumRenderer::new().library_dir, None);
        let r = PdfiumRenderer::with_library_dir("/opt/pdfium/lib");
        assert_eq!(r.library_dir.as_deref(), Some(Path::new("/opt/pdfium/lib")));
    }

    #[test]
    fn test_empty_document_message() {
        assert_eq!(RenderError::EmptyDocument.to_string(), "document has no pages");
    }
}
