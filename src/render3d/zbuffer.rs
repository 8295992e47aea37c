use crate::display::Color;

/// Per-pixel depth and color planes for hidden-surface removal.
///
/// Larger depth is closer to the viewer. Planes start at `-inf` so the first
/// write to any pixel always lands.
#[derive(Debug, Clone)]
pub struct ZBuffer {
    width: u32,
    height: u32,
    depths: Vec<f64>,
    colors: Vec<Color>,
}

impl ZBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            depths: vec![f64::NEG_INFINITY; len],
            colors: vec![Color::WHITE; len],
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

    /// Reset to `(-inf, background)`, reallocating if the size changed
    pub fn reset(&mut self, width: u32, height: u32, background: Color) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
        self.depths.fill(f64::NEG_INFINITY);
        self.colors.fill(background);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// Store `color` at `depth` if it is closer than what the pixel holds
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, depth: f64, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) if depth > self.depths[i] => {
                self.depths[i] = depth;
                self.colors[i] = color;
                true
            },
            _ => false,
        }
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<f64> {
        self.index(x, y).map(|i| self.depths[i])
    }

    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.colors[i])
    }
}
