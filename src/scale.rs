use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::time::Instant;

use crate::image_handler::DecodedImage;

// ---------------------------------------------------------------------------
// Viewport and scaled output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A bitmap fitted into a viewport, with the offset that centers it there.
pub struct ScaledBitmap {
    pub pixels: RgbaImage,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ScaledBitmap {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScaleFilter {
    Nearest,
    Triangle,
    #[default]
    Lanczos3,
}

impl From<ScaleFilter> for FilterType {
    fn from(f: ScaleFilter) -> Self {
        match f {
            ScaleFilter::Nearest => FilterType::Nearest,
            ScaleFilter::Triangle => FilterType::Triangle,
            ScaleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

// ---------------------------------------------------------------------------
// Fitting
// ---------------------------------------------------------------------------

/// Largest size that fits `viewport` with the source aspect ratio.
/// Images already inside the viewport keep their size.
pub fn fitted_dimensions(src_w: u32, src_h: u32, viewport: ViewportSize) -> (u32, u32) {
    if src_w == 0 || src_h == 0 || viewport.is_empty() {
        return (0, 0);
    }
    let ratio = (viewport.width as f64 / src_w as f64).min(viewport.height as f64 / src_h as f64);
    if ratio >= 1.0 {
        return (src_w, src_h);
    }
    // The epsilon keeps the bounding side from flooring to one pixel short.
    let w = ((src_w as f64 * ratio) + 1e-9).floor() as u32;
    let h = ((src_h as f64 * ratio) + 1e-9).floor() as u32;
    (w.clamp(1, viewport.width), h.clamp(1, viewport.height))
}

#[cfg(test)]
pub fn scale_to_fit(image: &DecodedImage, viewport: ViewportSize) -> ScaledBitmap {
    scale_to_fit_with(image, viewport, ScaleFilter::default())
}

pub fn scale_to_fit_with(
    image: &DecodedImage,
    viewport: ViewportSize,
    filter: ScaleFilter,
) -> ScaledBitmap {
    let (w, h) = fitted_dimensions(image.width(), image.height(), viewport);
    let start = Instant::now();
    let pixels = if (w, h) == (image.width(), image.height()) {
        image.pixels.clone()
    } else if w == 0 || h == 0 {
        RgbaImage::new(0, 0)
    } else {
        imageops::resize(&image.pixels, w, h, filter.into())
    };
    log::debug!(
        "[scale] {}x{} -> {}x{} in {:.1} ms",
        image.width(),
        image.height(),
        w,
        h,
        start.elapsed().as_secs_f64() * 1000.0
    );

    ScaledBitmap {
        pixels,
        offset_x: viewport.width.saturating_sub(w) / 2,
        offset_y: viewport.height.saturating_sub(h) / 2,
    }
}
