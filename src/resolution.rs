//! Preview and full-resolution originals for the loaded image.
//!
//! Both originals are captured once per load and never modified. Interactive
//! renders read the preview original, export reads the full-resolution one.

use std::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::buffer::PixelBuffer;
use crate::color::sampler;
use crate::error::{Error, Result};
use crate::params::{BaseColor, NegativeParams};
use crate::pipeline;

/// Longest side of the interactive preview, in pixels.
pub const PREVIEW_MAX_DIMENSION: u32 = 800;

/// Which original a render reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    Preview,
    Export,
}

impl RenderTarget {
    pub fn name(self) -> &'static str {
        match self {
            RenderTarget::Preview => "preview",
            RenderTarget::Export => "export",
        }
    }
}

/// A finished render and how long it took.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub buffer: PixelBuffer,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone)]
struct Originals {
    preview: Arc<PixelBuffer>,
    full: Arc<PixelBuffer>,
}

#[derive(Debug, Clone)]
pub struct ResolutionManager {
    preview_cap: u32,
    originals: Option<Originals>,
}

impl Default for ResolutionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionManager {
    pub fn new() -> Self {
        Self::with_preview_cap(PREVIEW_MAX_DIMENSION)
    }

    pub fn with_preview_cap(preview_cap: u32) -> Self {
        Self {
            preview_cap: preview_cap.max(1),
            originals: None,
        }
    }

    /// Replace any loaded image with `source`.
    pub fn load(&mut self, source: PixelBuffer) -> Result<()> {
        let (w, h) = source.dimensions();
        let (pw, ph) = preview_size(w, h, self.preview_cap);
        let full = Arc::new(source);
        let preview = if (pw, ph) == (w, h) {
            Arc::clone(&full)
        } else {
            Arc::new(downscale(&full, pw, ph)?)
        };
        log::info!("loaded {w}x{h} image, preview {pw}x{ph}");
        self.originals = Some(Originals { preview, full });
        Ok(())
    }

    pub fn unload(&mut self) {
        self.originals = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.originals.is_some()
    }

    fn originals(&self) -> Result<&Originals> {
        self.originals.as_ref().ok_or(Error::NoImageLoaded)
    }

    pub fn preview_original(&self) -> Result<Arc<PixelBuffer>> {
        Ok(Arc::clone(&self.originals()?.preview))
    }

    pub fn full_original(&self) -> Result<Arc<PixelBuffer>> {
        Ok(Arc::clone(&self.originals()?.full))
    }

    pub fn original(&self, target: RenderTarget) -> Result<Arc<PixelBuffer>> {
        match target {
            RenderTarget::Preview => self.preview_original(),
            RenderTarget::Export => self.full_original(),
        }
    }

    /// Film-base colour at preview-space (x, y).
    pub fn sample_base_color(&self, x: u32, y: u32) -> Result<BaseColor> {
        let preview = &self.originals()?.preview;
        sampler::sample_pixel(preview, x, y).map(BaseColor::from)
    }

    /// Averaged film-base colour around preview-space (x, y).
    pub fn sample_base_area(&self, x: u32, y: u32, radius: u32) -> Result<BaseColor> {
        let preview = &self.originals()?.preview;
        sampler::sample_area(preview, x, y, radius).map(BaseColor::from)
    }

    pub fn render_preview(&self, params: &NegativeParams) -> Result<PixelBuffer> {
        Ok(self.render(RenderTarget::Preview, params)?.buffer)
    }

    pub fn render_export(&self, params: &NegativeParams) -> Result<PixelBuffer> {
        Ok(self.render(RenderTarget::Export, params)?.buffer)
    }

    pub fn render(&self, target: RenderTarget, params: &NegativeParams) -> Result<Rendered> {
        let source = self.original(target)?;
        render_original(&source, target, params)
    }
}

/// Run the pipeline on an already-resolved original. Used directly by
/// worker threads that hold an `Arc` to the original.
pub fn render_original(
    source: &PixelBuffer,
    target: RenderTarget,
    params: &NegativeParams,
) -> Result<Rendered> {
    params.validate()?;
    let start = web_time::Instant::now();
    let buffer = pipeline::process(source, params);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    log::debug!(
        "{} render {}x{} in {elapsed_ms:.1}ms",
        target.name(),
        buffer.width(),
        buffer.height()
    );
    Ok(Rendered { buffer, elapsed_ms })
}

/// Aspect-preserving size whose longest side does not exceed `cap`.
pub fn preview_size(width: u32, height: u32, cap: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= cap {
        return (width, height);
    }
    let scale = cap as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, cap);
    let h = ((height as f64 * scale).round() as u32).clamp(1, cap);
    (w, h)
}

fn downscale(source: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    let (sw, sh) = source.dimensions();
    let img = RgbaImage::from_raw(sw, sh, source.as_bytes().to_vec()).ok_or(
        Error::BufferSizeMismatch {
            expected: sw as usize * sh as usize * 4,
            actual: source.as_bytes().len(),
        },
    )?;
    let resized = imageops::resize(&img, width, height, FilterType::Triangle);
    PixelBuffer::from_raw(width, height, resized.into_raw())
}
