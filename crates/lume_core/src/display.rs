//! Display collaborator interface.
//!
//! The render loops only ever ask two things of a display: has the user
//! requested to quit, and here is this frame's pixels. Windowing
//! backends live outside this workspace; tests and the demo binaries
//! use headless implementations.

/// A surface frames can be presented to.
pub trait Display {
    /// Poll and drain pending events; true once a quit was observed.
    ///
    /// Called once per frame by the render loop.
    fn should_quit(&mut self) -> bool;

    /// Present one frame of tightly packed RGBA8 pixels, top row first.
    fn present(&mut self, rgba: &[u8], width: u32, height: u32);
}
