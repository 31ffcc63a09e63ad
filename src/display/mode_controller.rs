/*
 *  display/mode_controller.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display mode controller - picks the skin mode from player and UI state
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

use super::LcdMode;
use crate::info::InfoSource;

/// Player/UI signals the mode decision is based on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSignals {
    pub navigation_active: bool,
    pub screensaver_active: bool,
    pub playing_live_tv: bool,
    pub playing_live_radio: bool,
    pub playing_tvshow: bool,
    pub playing_video: bool,
    pub playing_audio: bool,
}

impl ModeSignals {
    pub fn from_info(info: &dyn InfoSource) -> Self {
        Self {
            navigation_active: info.is_navigation_active(),
            screensaver_active: info.is_screensaver_active(),
            playing_live_tv: info.playing_live_tv(),
            playing_live_radio: info.playing_live_radio(),
            playing_tvshow: info.playing_tvshow(),
            playing_video: info.playing_video(),
            playing_audio: info.playing_audio(),
        }
    }
}

type ModeRule = (fn(&ModeSignals) -> bool, LcdMode);

/// Ordered (predicate, mode) pairs, first match wins.
/// Menus beat the screensaver, the screensaver beats playback, and
/// specific media kinds come before generic video/audio.
fn mode_rules() -> [ModeRule; 7] {
    [
        (|s| s.navigation_active, LcdMode::Navigation),
        (|s| s.screensaver_active, LcdMode::Screensaver),
        (|s| s.playing_live_tv, LcdMode::PvrTv),
        (|s| s.playing_live_radio, LcdMode::PvrRadio),
        (|s| s.playing_tvshow, LcdMode::TvShow),
        (|s| s.playing_video, LcdMode::Video),
        (|s| s.playing_audio, LcdMode::Music),
    ]
}

/// Map signals to exactly one mode, General when nothing matches
pub fn classify(signals: &ModeSignals) -> LcdMode {
    mode_rules()
        .iter()
        .find(|(applies, _)| applies(signals))
        .map(|&(_, mode)| mode)
        .unwrap_or(LcdMode::General)
}

/// Tracks the active mode across frames
pub struct ModeController {
    current_mode: LcdMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            current_mode: LcdMode::General,
        }
    }

    /// Get current display mode
    pub fn current_mode(&self) -> LcdMode {
        self.current_mode
    }

    /// Classify and remember the mode for this frame
    pub fn update(&mut self, signals: &ModeSignals) -> LcdMode {
        let new_mode = classify(signals);
        if new_mode != self.current_mode {
            log::info!("Display mode changed: {:?} -> {:?}", self.current_mode, new_mode);
            self.current_mode = new_mode;
        }
        new_mode
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_active_is_general() {
        assert_eq!(classify(&ModeSignals::default()), LcdMode::General);
    }

    #[test]
    fn test_navigation_beats_playback() {
        let signals = ModeSignals {
            navigation_active: true,
            playing_audio: true,
            ..Default::default()
        };
        assert_eq!(classify(&signals), LcdMode::Navigation);
    }

    #[test]
    fn test_screensaver_beats_video() {
        let signals = ModeSignals {
            screensaver_active: true,
            playing_video: true,
            ..Default::default()
        };
        assert_eq!(classify(&signals), LcdMode::Screensaver);
    }

    #[test]
    fn test_live_tv_beats_video() {
        let signals = ModeSignals {
            playing_live_tv: true,
            playing_video: true,
            ..Default::default()
        };
        assert_eq!(classify(&signals), LcdMode::PvrTv);
    }

    #[test]
    fn test_playback_priority_chain() {
        let radio = ModeSignals { playing_live_radio: true, playing_audio: true, ..Default::default() };
        assert_eq!(classify(&radio), LcdMode::PvrRadio);

        let show = ModeSignals { playing_tvshow: true, playing_video: true, ..Default::default() };
        assert_eq!(classify(&show), LcdMode::TvShow);

        let video = ModeSignals { playing_video: true, playing_audio: true, ..Default::default() };
        assert_eq!(classify(&video), LcdMode::Video);

        let music = ModeSignals { playing_audio: true, ..Default::default() };
        assert_eq!(classify(&music), LcdMode::Music);
    }

    #[test]
    fn test_controller_tracks_mode() {
        let mut controller = ModeController::new();
        assert_eq!(controller.current_mode(), LcdMode::General);

        let music = ModeSignals { playing_audio: true, ..Default::default() };
        assert_eq!(controller.update(&music), LcdMode::Music);
        assert_eq!(controller.current_mode(), LcdMode::Music);

        assert_eq!(controller.update(&ModeSignals::default()), LcdMode::General);
    }
}
