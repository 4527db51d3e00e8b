// Rendering surface abstraction for the interactive session
use crate::presentation::frame::Frame;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Enter,
    Esc,
    /// The surface changed size; the current view should be redrawn.
    Resize,
    Other,
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A character grid the session draws whole frames onto and reads keys from.
/// `read_key` blocks until a key arrives.
pub trait Surface {
    /// Current size as `(width, height)`.
    fn size(&self) -> (u16, u16);

    fn supports_color(&self) -> bool;

    fn render(&mut self, frame: &Frame) -> Result<(), SurfaceError>;

    fn read_key(&mut self) -> Result<Key, SurfaceError>;
}

/// Hands out an interactive surface when one exists. `Ok(None)` means the
/// process has no interactive terminal to draw on.
pub trait SurfaceProvider: Send + Sync {
    fn acquire(&self) -> Result<Option<Box<dyn Surface>>, SurfaceError>;
}
