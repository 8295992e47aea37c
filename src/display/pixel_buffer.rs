use super::{Color, DEFAULT_HEIGHT, DEFAULT_WIDTH};

// ============================================================================
// Utility Functions
// ============================================================================

/// Write a pixel in B, G, R, A byte order (ARGB8888 little-endian)
#[inline]
fn write_pixel(dest: &mut [u8], color: Color) {
    dest[0] = color.b;
    dest[1] = color.g;
    dest[2] = color.r;
    dest[3] = color.a;
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// BGRA pixel buffer for software rendering.
///
/// Every rasterizer in the crate writes through [`PixelBuffer::set_pixel`],
/// which silently drops coordinates outside the raster. The buffer tracks
/// whether it changed since the owner last presented it.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    dirty: bool,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
            dirty: true,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Replace the raster with a fresh one of the given size.
    /// Previous contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::with_size(width, height);
    }

    /// Clear to a solid color
    pub fn clear(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            write_pixel(chunk, color);
        }
        self.dirty = true;
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels[idx..idx + 4], color);
            self.dirty = true;
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some(Color::rgba(
                self.pixels[idx + 2],
                self.pixels[idx + 1],
                self.pixels[idx],
                self.pixels[idx + 3],
            ))
        } else {
            None
        }
    }

    /// Count pixels that differ from `background`
    pub fn count_not(&self, background: Color) -> usize {
        let mut blank = [0u8; 4];
        write_pixel(&mut blank, background);
        self.pixels
            .chunks_exact(4)
            .filter(|chunk| *chunk != blank)
            .count()
    }

    /// Returns whether the buffer changed since the last call, and resets the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Raw bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}
