/*
 *  display/traits.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for character LCD driver abstraction
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::display::LcdMode;
use crate::display::error::DisplayError;
use crate::extraicons::ExtraIcon;
use crate::skin::{LineDescriptor, SkinOptions};

/// Display capabilities and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdCapabilities {
    /// Text columns per row
    pub columns: u32,

    /// Text rows
    pub rows: u32,

    /// Width of one character cell in pixels (bar resolution)
    pub cell_width: u32,

    /// Height of one character cell in pixels
    pub cell_height: u32,

    /// Whether the display can switch its backlight
    pub supports_backlight: bool,

    /// Whether the display has an auxiliary icon/bar panel
    pub supports_extra_icons: bool,
}

impl Default for LcdCapabilities {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 4,
            cell_width: 5,
            cell_height: 8,
            supports_backlight: true,
            supports_extra_icons: false,
        }
    }
}

/// What a single row resolved to for this frame
#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    /// Literal text, markup already stripped
    Text(String),

    /// Progress bar, width in pixels from the bar start
    ProgressBar { pixels: u32 },
}

impl LineContent {
    pub fn empty() -> Self {
        LineContent::Text(String::new())
    }

    /// Bars always count as content
    pub fn is_empty(&self) -> bool {
        match self {
            LineContent::Text(text) => text.is_empty(),
            LineContent::ProgressBar { .. } => false,
        }
    }
}

/// Player transport state shown by the play indicator icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
}

/// Pixel width of a bar filled to `percent` (0.0 - 1.0) of `end_pixels`.
/// `None` means no bar is drawn on this row.
pub fn progress_pixels(percent: f64, end_pixels: Option<u32>) -> u32 {
    match end_pixels {
        Some(end) if percent.is_finite() => (percent.clamp(0.0, 1.0) * end as f64) as u32,
        _ => 0,
    }
}

/// Device contract - every LCD backend implements this trait
///
/// The render engine only ever talks to a display through this trait, so
/// a socket backed LCDd client, the console renderer and test doubles are
/// interchangeable. Drivers batch `set_line` calls and commit them on
/// `flush_lines`.
pub trait LcdDriver: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &LcdCapabilities;

    fn columns(&self) -> u32 {
        self.capabilities().columns
    }

    fn rows(&self) -> u32 {
        self.capabilities().rows
    }

    fn cell_width(&self) -> u32 {
        self.capabilities().cell_width
    }

    fn is_connected(&self) -> bool;

    /// Release the device, no further output follows
    fn stop(&mut self) -> Result<(), DisplayError>;

    fn suspend(&mut self) -> Result<(), DisplayError>;

    fn resume(&mut self) -> Result<(), DisplayError>;

    /// Backlight level, 0 = off/dimmed, 1 = on
    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Contrast in percent (0-100)
    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Full screen big digit clock
    fn set_big_digits(&mut self, time: &str, force: bool) -> Result<(), DisplayError>;

    fn clear_line(&mut self, row: u32) -> Result<(), DisplayError>;

    /// Queue one row of output. `row` is the output row, not the skin line index.
    fn set_line(
        &mut self,
        mode: LcdMode,
        row: u32,
        content: &LineContent,
        descriptor: &LineDescriptor,
        force: bool,
    ) -> Result<(), DisplayError>;

    fn clear_display(&mut self) -> Result<(), DisplayError>;

    /// Commit every line queued since the last flush as one update
    fn flush_lines(&mut self) -> Result<(), DisplayError>;

    /// Update the play/pause/stop indicator shown in front of icon text lines
    fn set_playing_state_icon(&mut self, state: PlayState) -> Result<(), DisplayError>;

    /// Prepare the hardware bar and return its pixel width.
    ///
    /// Called with `None` for every non-bar row so bar memory is released
    /// when a mode has no bar.
    fn set_progress_bar(&mut self, percent: f64, end_pixels: Option<u32>) -> u32 {
        progress_pixels(percent, end_pixels)
    }

    /// Receives the skin options after every successful skin load
    fn apply_skin_options(&mut self, _options: &SkinOptions) {}

    /// Switch one auxiliary icon (if supported)
    fn set_extra_icon(&mut self, _icon: ExtraIcon, _on: bool) -> Result<(), DisplayError> {
        Err(DisplayError::UnsupportedOperation)
    }

    /// Set auxiliary bar 1..=4 to a percentage (if supported)
    fn set_extra_bar(&mut self, _bar: usize, _percent: f64) -> Result<(), DisplayError> {
        Err(DisplayError::UnsupportedOperation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_pixels() {
        assert_eq!(progress_pixels(0.5, Some(100)), 50);
        assert_eq!(progress_pixels(1.5, Some(100)), 100);
        assert_eq!(progress_pixels(-0.2, Some(100)), 0);
        assert_eq!(progress_pixels(0.5, None), 0);
        assert_eq!(progress_pixels(f64::NAN, Some(100)), 0);
    }

    #[test]
    fn test_line_content_emptiness() {
        assert!(LineContent::empty().is_empty());
        assert!(!LineContent::Text("x".into()).is_empty());
        assert!(!LineContent::ProgressBar { pixels: 0 }.is_empty());
    }
}
