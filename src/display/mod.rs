mod color;
mod pixel_buffer;
#[cfg(feature = "viewer")]
mod window;

pub use color::Color;
pub use pixel_buffer::PixelBuffer;
#[cfg(feature = "viewer")]
pub use window::{Display, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
