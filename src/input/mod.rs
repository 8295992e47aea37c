//! Backend-neutral input events and the interactive 2D editor.

mod editor;

pub use editor::{Editor, Tool};

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Delete,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Shift,
    /// Printable key, lowercase
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButtonKind {
    Left,
    Right,
    Middle,
}

/// Window input in raster coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Resized { width: u32, height: u32 },
    KeyDown(Key),
    KeyUp(Key),
    MouseMove { x: i32, y: i32 },
    MouseDown { x: i32, y: i32, button: MouseButtonKind },
    MouseUp { x: i32, y: i32, button: MouseButtonKind },
    Wheel { delta: i32 },
}
