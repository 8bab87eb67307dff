//! Headless display: the window collaborator for machines without one.
//!
//! Counts presented frames against a fixed budget and keeps the last
//! frame so the demos can save it as a PNG on exit.

use std::path::Path;

use anyhow::{Context, Result};
use lume_core::Display;

pub struct HeadlessDisplay {
    frame_budget: u32,
    frames_presented: u32,
    last_frame: Option<(Vec<u8>, u32, u32)>,
}

impl HeadlessDisplay {
    /// A display that reports "quit" once `frame_budget` frames were
    /// presented.
    pub fn new(frame_budget: u32) -> Self {
        Self {
            frame_budget,
            frames_presented: 0,
            last_frame: None,
        }
    }

    pub fn frames_presented(&self) -> u32 {
        self.frames_presented
    }

    /// Save the most recently presented frame as a PNG.
    pub fn save_last<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let (bytes, width, height) = self
            .last_frame
            .as_ref()
            .context("no frame was ever presented")?;
        image::save_buffer(
            path.as_ref(),
            bytes,
            *width,
            *height,
            image::ColorType::Rgba8,
        )?;
        log::info!("wrote {}", path.as_ref().display());
        Ok(())
    }
}

impl Display for HeadlessDisplay {
    fn should_quit(&mut self) -> bool {
        self.frames_presented >= self.frame_budget
    }

    fn present(&mut self, rgba: &[u8], width: u32, height: u32) {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        self.last_frame = Some((rgba.to_vec(), width, height));
        self.frames_presented += 1;
    }
}
