//! Pointer input.
//!
//! The repulsor only needs one thing from the outside world: where the
//! pointer is, in normalized device coordinates. [`Pointer`] turns window
//! pixel positions into NDC and remembers the window size needed to do so.

use glam::Vec2;

/// Pointer position in normalized device coordinates.
///
/// Origin is the centre of the window. X increases to the right, Y
/// increases upward, and both stay within [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    ndc: Vec2,
    window_size: (u32, u32),
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pointer {
    /// Pointer at the window centre.
    pub fn new() -> Self {
        Self {
            ndc: Vec2::ZERO,
            window_size: (800, 600),
        }
    }

    /// Pointer at a fixed NDC position, clamped to [-1, 1].
    pub fn at(ndc: Vec2) -> Self {
        let mut pointer = Self::new();
        pointer.set_ndc(ndc);
        pointer
    }

    /// Current position in NDC.
    #[inline]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Set the NDC position directly, clamped to [-1, 1].
    pub fn set_ndc(&mut self, ndc: Vec2) {
        self.ndc = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Move to a cursor position given in window pixels (origin top-left).
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.set_ndc(Vec2::new(
                (x / w as f32) * 2.0 - 1.0,
                1.0 - (y / h as f32) * 2.0, // Y flipped
            ));
        }
    }

    /// Process a winit window event.
    #[cfg(feature = "viewer")]
    pub(crate) fn handle_event(&mut self, event: &winit::event::WindowEvent) {
        use winit::event::WindowEvent;

        match event {
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(position.x as f32, position.y as f32)
            }
            WindowEvent::CursorLeft { .. } => self.set_ndc(Vec2::ZERO),
            _ => {}
        }
    }
}
