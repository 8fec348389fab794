use image::{ImageReader, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{DecodeError, LoadError};

// ---------------------------------------------------------------------------
// Decoded image data
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub pixels: RgbaImage,
    pub file_size: u64,
    pub format_name: String,
}

impl DecodedImage {
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            file_size: 0,
            format_name: String::from("RGBA"),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

pub fn decode_image(path: &Path) -> Result<DecodedImage, DecodeError> {
    let file_size = fs::metadata(path)
        .map_err(|e| DecodeError::from_io(path, e))?
        .len();

    // Sniff the header so a mislabelled file still decodes.
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| DecodeError::from_io(path, e))?;

    let format_name = reader
        .format()
        .and_then(|f| f.extensions_str().first().copied())
        .map(str::to_string)
        .or_else(|| path.extension().and_then(|e| e.to_str()).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
        .to_uppercase();

    let img = reader
        .decode()
        .map_err(|e| DecodeError::from_image(path, e))?;

    Ok(DecodedImage {
        file_size,
        format_name,
        ..DecodedImage::from_pixels(img.to_rgba8())
    })
}

// ---------------------------------------------------------------------------
// Image handler: the loaded set, the cursor into it, and the decoded image
// ---------------------------------------------------------------------------

struct CachedDecode {
    index: usize,
    result: Result<DecodedImage, DecodeError>,
}

#[derive(Default)]
pub struct ImageHandler {
    images: Vec<PathBuf>,
    current_index: usize,
    cached: Option<CachedDecode>,
}

impl ImageHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the image set. Decoding is deferred to `current()`, so only an
    /// empty selection is rejected, and that leaves the previous set in place.
    pub fn load_set(&mut self, paths: Vec<PathBuf>) -> Result<(), LoadError> {
        if paths.is_empty() {
            return Err(LoadError::EmptySelection);
        }
        log::info!("Loaded image set of {} files", paths.len());
        self.cached = None;
        self.images = paths;
        self.current_index = 0;
        Ok(())
    }

    /// Decode the image at the current index, reusing the cached result
    /// (success or failure) when the index has not moved.
    pub fn current(&mut self) -> Result<&DecodedImage, DecodeError> {
        if self.images.is_empty() {
            return Err(DecodeError::NoImageLoaded);
        }
        let idx = self.current_index;

        if !matches!(&self.cached, Some(c) if c.index == idx) {
            // Release the previous bitmap before decoding the next one.
            self.cached = None;
            let path = &self.images[idx];
            let start = Instant::now();
            let result = decode_image(path);
            match &result {
                Ok(img) => log::debug!(
                    "[decode] {} ({}x{} {}, {:.1} KB) in {:.1} ms",
                    path.display(),
                    img.width(),
                    img.height(),
                    img.format_name,
                    img.file_size as f64 / 1024.0,
                    start.elapsed().as_secs_f64() * 1000.0
                ),
                Err(e) => log::warn!("Could not load: {}", e),
            }
            self.cached = Some(CachedDecode { index: idx, result });
        }

        match &self.cached {
            Some(c) => c.result.as_ref().map_err(Clone::clone),
            None => Err(DecodeError::NoImageLoaded),
        }
    }

    pub fn next(&mut self) -> Option<usize> {
        let last = self.images.len().checked_sub(1)?;
        self.move_to((self.current_index + 1).min(last))
    }

    pub fn previous(&mut self) -> Option<usize> {
        if self.images.is_empty() {
            return None;
        }
        self.move_to(self.current_index.saturating_sub(1))
    }

    pub fn first(&mut self) -> Option<usize> {
        if self.images.is_empty() {
            return None;
        }
        self.move_to(0)
    }

    pub fn last(&mut self) -> Option<usize> {
        let last = self.images.len().checked_sub(1)?;
        self.move_to(last)
    }

    fn move_to(&mut self, idx: usize) -> Option<usize> {
        if idx != self.current_index {
            log::debug!("[nav] move {} -> {}", self.current_index, idx);
            self.current_index = idx;
        }
        Some(self.current_index)
    }

    /// One-based position and total, `(0, 0)` when nothing is loaded.
    pub fn position(&self) -> (usize, usize) {
        if self.images.is_empty() {
            (0, 0)
        } else {
            (self.current_index + 1, self.images.len())
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn has_images(&self) -> bool {
        !self.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.images.len()
    }

    pub fn has_previous(&self) -> bool {
        self.has_images() && self.current_index > 0
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.images.get(self.current_index).map(PathBuf::as_path)
    }

    pub fn current_file_name(&self) -> Option<String> {
        let path = self.current_path()?;
        Some(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        )
    }

    /// Dimensions of the decoded current image, if it has been decoded.
    pub fn original_size(&self) -> Option<(u32, u32)> {
        match &self.cached {
            Some(CachedDecode {
                index,
                result: Ok(img),
            }) if *index == self.current_index => Some((img.width(), img.height())),
            _ => None,
        }
    }
}
