//! Pixel surface: the owned RGBA buffer the render engine paints into.
//!
//! The surface is the one place pixels are written. It offers the raster
//! primitives the renderer composes (whole-surface fill, clipped pixel
//! stores, filled disc stamps), alpha-over compositing for image imports,
//! and PNG encode/decode for export and import. It knows nothing about
//! elements or tools.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

/// Background mode for the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// White background.
    #[default]
    Light,
    /// Slate-gray background.
    Dark,
}

impl Theme {
    /// The background fill for this theme. Eraser strokes paint in this
    /// color as well.
    #[must_use]
    pub fn background(self) -> Rgba<u8> {
        match self {
            Self::Light => Rgba([0xff, 0xff, 0xff, 0xff]),
            Self::Dark => Rgba([0x1f, 0x29, 0x37, 0xff]),
        }
    }
}

/// Errors from surface encode/decode and image file I/O.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Image encode, decode, or file read/write failure.
    #[error("image codec: {0}")]
    Image(#[from] image::ImageError),
}

/// An owned RGBA8 pixel buffer.
///
/// A fresh surface is transparent; the render engine fills the background as
/// the first step of every repaint, so contents are only meaningful after a
/// draw pass.
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a surface of the given size in pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { pixels: RgbaImage::new(width, height) }
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Fill the entire surface with one color.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    /// Store a pixel, ignoring coordinates outside the surface.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        self.pixels.put_pixel(x as u32, y as u32, color);
    }

    /// Read a pixel, `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Stamp a filled disc centered at (`cx`, `cy`). Radii below half a
    /// pixel are widened to it so hairline strokes stay visible.
    pub fn stamp_disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
        let r = radius.max(0.5);
        let min_x = (cx - r).floor() as i64;
        let max_x = (cx + r).ceil() as i64;
        let min_y = (cy - r).floor() as i64;
        let max_y = (cy + r).ceil() as i64;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at the pixel center.
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Composite an image onto the surface with alpha-over blending, its
    /// top-left corner at (`origin_x`, `origin_y`). Pixels falling outside
    /// the surface are clipped.
    pub fn composite(&mut self, image: &RgbaImage, origin_x: i64, origin_y: i64) {
        for (x, y, src) in image.enumerate_pixels() {
            let tx = origin_x + i64::from(x);
            let ty = origin_y + i64::from(y);
            if tx < 0 || ty < 0 || tx >= i64::from(self.width()) || ty >= i64::from(self.height())
            {
                continue;
            }
            let dst = *self.pixels.get_pixel(tx as u32, ty as u32);
            self.pixels.put_pixel(tx as u32, ty as u32, blend_over(*src, dst));
        }
    }

    /// Encode the surface as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut buffer = Cursor::new(Vec::new());
        self.pixels.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    /// Write the surface to `path` as PNG, regardless of the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the file write fails.
    pub fn save_png(&self, path: &Path) -> Result<(), SurfaceError> {
        self.pixels.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Borrow the underlying pixel buffer.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decode an image from raw bytes (PNG or JPEG) into an RGBA buffer.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, SurfaceError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Load an image file (PNG or JPEG) into an RGBA buffer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<RgbaImage, SurfaceError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Standard alpha-over: `src` on top of `dst`.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let alpha = f64::from(src[3]) / 255.0;
    if alpha >= 1.0 {
        return src;
    }
    let mix = |s: u8, d: u8| -> u8 {
        let value = f64::from(s) * alpha + f64::from(d) * (1.0 - alpha);
        value.round().clamp(0.0, 255.0) as u8
    };
    let out_alpha = f64::from(src[3]) + f64::from(dst[3]) * (1.0 - alpha);
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        out_alpha.round().clamp(0.0, 255.0) as u8,
    ])
}
