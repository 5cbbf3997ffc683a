/// The host side of the loop: input devices, debug console and the screen.
///
/// Every hook defaults to a no-op so a host only overrides what it has.
pub trait Platform {
    /// Poll input devices. Called after each logical tick, paused or not.
    fn update_input(&mut self) {}

    /// Step the debug console. Called once per frame, before any update.
    fn update_console(&mut self) {}

    /// Prepare the screen for drawing.
    fn begin_frame(&mut self) {}

    /// Present what was drawn this frame.
    fn end_frame(&mut self) {}
}

/// A platform with no devices and no screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Platform for Headless {}
