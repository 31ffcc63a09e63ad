/*
 *  display/mod.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - device contract, drivers and mode selection
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod factory;

// Display drivers
pub mod drivers;

// Display mode selection
pub mod mode_controller;

// Re-exports for convenience
pub use traits::{LcdDriver, LcdCapabilities, LineContent, PlayState};
pub use error::{DisplayError, DisplayFactoryError};
pub use factory::{DisplayDriverFactory, BoxedDriver};
pub use mode_controller::{ModeController, ModeSignals, classify};

/// Display mode - which block of the skin is rendered
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum LcdMode {
    General,     // idle, nothing else applies
    Music,       // audio playback
    Video,       // movie playback
    TvShow,      // tv show episode playback
    Navigation,  // user is moving through menus
    Screensaver, // screensaver running
    Launch,      // program launch transition
    PvrTv,       // live tv
    PvrRadio,    // live radio
}

impl LcdMode {
    pub const COUNT: usize = 9;

    /// All modes in mode table order
    pub const ALL: [LcdMode; LcdMode::COUNT] = [
        LcdMode::General,
        LcdMode::Music,
        LcdMode::Video,
        LcdMode::TvShow,
        LcdMode::Navigation,
        LcdMode::Screensaver,
        LcdMode::Launch,
        LcdMode::PvrTv,
        LcdMode::PvrRadio,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Element name of this mode in the skin document
    pub fn skin_tag(self) -> &'static str {
        match self {
            LcdMode::General => "general",
            LcdMode::Music => "music",
            LcdMode::Video => "video",
            LcdMode::TvShow => "tvshow",
            LcdMode::Navigation => "navigation",
            LcdMode::Screensaver => "screensaver",
            LcdMode::Launch => "xbelaunch",
            LcdMode::PvrTv => "pvrtv",
            LcdMode::PvrRadio => "pvrradio",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_indices_follow_table_order() {
        for (i, mode) in LcdMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn test_skin_tags_are_unique() {
        let mut tags: Vec<_> = LcdMode::ALL.iter().map(|m| m.skin_tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), LcdMode::COUNT);
    }
}
