//! Shared pieces of the lume demo binaries.

pub mod display;

pub use display::HeadlessDisplay;
