/// Window collaborator for surface negotiation
///
/// The presentation chain only needs the window when the surface leaves
/// the extent up to the application. The size is read on demand through
/// this trait, never cached.

use winit::window::Window;

/// Source of the current window size in physical pixels
pub trait WindowSizeSource {
    /// Current (width, height) in pixels
    fn pixel_size(&self) -> (u32, u32);
}

impl WindowSizeSource for Window {
    fn pixel_size(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }
}

/// Fixed size, for headless setups and tests
impl WindowSizeSource for (u32, u32) {
    fn pixel_size(&self) -> (u32, u32) {
        *self
    }
}

impl<T: WindowSizeSource + ?Sized> WindowSizeSource for &T {
    fn pixel_size(&self) -> (u32, u32) {
        (**self).pixel_size()
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
