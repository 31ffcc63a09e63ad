/*
 *  backlight.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Backlight dimming - lit/dimmed state machine with a switch on delay
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

use std::time::{Duration, Instant};

use crate::config::BacklightConfig;
use crate::display::LcdMode;

pub const BACKLIGHT_OFF: u8 = 0;
pub const BACKLIGHT_ON: u8 = 1;

/// When the backlight may be dimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimPolicy {
    pub on_screensaver: bool,
    pub on_music: bool,
    pub on_video: bool,
    /// Dim-worthy state must last this long before dimming
    pub delay: Duration,
    /// Switch the backlight off when shutting down
    pub on_shutdown: bool,
}

impl Default for DimPolicy {
    fn default() -> Self {
        Self {
            on_screensaver: true,
            on_music: false,
            on_video: false,
            delay: Duration::ZERO,
            on_shutdown: false,
        }
    }
}

impl From<&BacklightConfig> for DimPolicy {
    fn from(config: &BacklightConfig) -> Self {
        let defaults = DimPolicy::default();
        Self {
            on_screensaver: config.dim_on_screensaver.unwrap_or(defaults.on_screensaver),
            on_music: config.dim_on_music.unwrap_or(defaults.on_music),
            on_video: config.dim_on_video.unwrap_or(defaults.on_video),
            delay: config.dim_delay_secs.map(Duration::from_secs).unwrap_or(defaults.delay),
            on_shutdown: config.dim_on_shutdown.unwrap_or(defaults.on_shutdown),
        }
    }
}

impl DimPolicy {
    /// Whether this frame wants the backlight down.
    ///
    /// The screensaver dims regardless of pause, playback dimming is held
    /// off while the player is paused.
    pub fn is_dim_worthy(&self, mode: LcdMode, paused: bool) -> bool {
        let screensaver = mode == LcdMode::Screensaver && self.on_screensaver;
        let video = matches!(mode, LcdMode::Video | LcdMode::TvShow | LcdMode::PvrTv) && self.on_video;
        let music = matches!(mode, LcdMode::Music | LcdMode::PvrRadio) && self.on_music;

        screensaver || (!paused && (video || music))
    }
}

/// Two state lit/dimmed machine.
///
/// Dims once the dim-worthy condition held for the delay without a break,
/// lights up on the first frame it does not hold. Only transitions are
/// reported.
#[derive(Debug, Clone)]
pub struct BacklightDimmer {
    dim_worthy_since: Instant,
    dimmed: bool,
}

impl BacklightDimmer {
    pub fn new(now: Instant) -> Self {
        Self { dim_worthy_since: now, dimmed: false }
    }

    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    /// Back to lit, restarts the delay
    pub fn reset(&mut self, now: Instant) {
        self.dim_worthy_since = now;
        self.dimmed = false;
    }

    /// Advance one frame, returns the new backlight level on a transition
    pub fn update(&mut self, dim_worthy: bool, delay: Duration, now: Instant) -> Option<u8> {
        if !dim_worthy {
            self.dim_worthy_since = now;
            if self.dimmed {
                self.dimmed = false;
                return Some(BACKLIGHT_ON);
            }
            return None;
        }

        if !self.dimmed && now.saturating_duration_since(self.dim_worthy_since) >= delay {
            self.dimmed = true;
            return Some(BACKLIGHT_OFF);
        }
        None
    }
}
