/*
 *  info.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Player/UI state as seen by the renderer, plus a serializable snapshot
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

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::Path};

use crate::config::ConfigError;
use crate::markup::{contains_placeholder, expand_info_labels, INFO_OPEN};

/// Window identifiers the renderer cares about
pub mod window_ids {
    pub const WINDOW_PICTURES: i32 = 10002;
    pub const WINDOW_VIDEO_FILES: i32 = 10024;
    pub const WINDOW_VIDEO_NAV: i32 = 10025;
    pub const WINDOW_VIDEO_PLAYLIST: i32 = 10028;
    pub const WINDOW_DIALOG_VOLUME_BAR: i32 = 10104;
    pub const WINDOW_DIALOG_KAI_TOAST: i32 = 10107;
    pub const WINDOW_MUSIC_FIRST: i32 = 10500;
    pub const WINDOW_MUSIC_LAST: i32 = 10504;
    pub const WINDOW_PVR_FIRST: i32 = 10700;
    pub const WINDOW_PVR_LAST: i32 = 10711;
    pub const WINDOW_WEATHER: i32 = 12600;
}

/// Coarse class of a UI window, drives the idle mode icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowClass {
    Pvr,
    Video,
    Music,
    Pictures,
    Weather,
}

impl WindowClass {
    pub fn of(window_id: i32) -> Option<WindowClass> {
        use window_ids::*;
        match window_id {
            WINDOW_PVR_FIRST..=WINDOW_PVR_LAST => Some(WindowClass::Pvr),
            WINDOW_VIDEO_FILES | WINDOW_VIDEO_NAV | WINDOW_VIDEO_PLAYLIST => Some(WindowClass::Video),
            WINDOW_MUSIC_FIRST..=WINDOW_MUSIC_LAST => Some(WindowClass::Music),
            WINDOW_PICTURES => Some(WindowClass::Pictures),
            WINDOW_WEATHER => Some(WindowClass::Weather),
            _ => None,
        }
    }
}

/// Read-only view of the media player and UI.
///
/// Implementations are expected to answer from in-process state, every
/// call happens on the render tick.
pub trait InfoSource {
    fn is_navigation_active(&self) -> bool;
    fn is_screensaver_active(&self) -> bool;

    fn playing_video(&self) -> bool;
    fn playing_tvshow(&self) -> bool;
    fn playing_audio(&self) -> bool;
    fn playing_live_tv(&self) -> bool;
    fn playing_live_radio(&self) -> bool;
    fn is_internet_stream(&self) -> bool;

    /// Something is loaded in the player (true while paused as well)
    fn is_player_playing(&self) -> bool;
    fn is_player_paused(&self) -> bool;

    fn is_muted(&self) -> bool;
    fn is_pvr_recording(&self) -> bool;
    fn is_playlist_random(&self) -> bool;
    fn is_playlist_repeat_any(&self) -> bool;
    fn is_disc_in_drive(&self) -> bool;
    fn is_passthrough_audio(&self) -> bool;

    fn window_is_active(&self, window_id: i32) -> bool;
    fn active_window_id(&self) -> i32;

    /// Playback position, 0.0 - 1.0
    fn progress_percent(&self) -> f64;

    /// Volume, 0.0 - 100.0
    fn volume_percent(&self) -> f64;

    /// Raw label lookup, e.g. `MusicPlayer.Title`
    fn label(&self, key: &str) -> Option<String>;

    /// Resolve a skin line to display text.
    ///
    /// `$INFO[Key]` tokens are expanded through `label`, unknown keys become
    /// empty. Text without tokens is tried as a key and otherwise shown as is.
    fn resolve(&self, text: &str) -> String {
        if contains_placeholder(text, INFO_OPEN) {
            expand_info_labels(text, |key| self.label(key))
        } else {
            self.label(text).unwrap_or_else(|| text.to_string())
        }
    }
}

/// Plain data snapshot of the player state.
///
/// The daemon reads one of these from a YAML file the host application
/// keeps up to date; tests build them directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoSnapshot {
    pub navigation_active: bool,
    pub screensaver_active: bool,
    pub playing: bool,
    pub paused: bool,
    pub video: bool,
    pub tvshow: bool,
    pub audio: bool,
    pub live_tv: bool,
    pub live_radio: bool,
    pub internet_stream: bool,
    pub muted: bool,
    pub recording: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub disc_in_drive: bool,
    pub passthrough: bool,
    pub progress: f64,
    pub volume: f64,
    pub active_window: i32,
    pub active_windows: Vec<i32>,
    pub labels: HashMap<String, String>,
}

impl InfoSnapshot {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        let snapshot: InfoSnapshot = serde_yaml::from_str(&s)?;
        Ok(snapshot)
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }
}

impl InfoSource for InfoSnapshot {
    fn is_navigation_active(&self) -> bool { self.navigation_active }
    fn is_screensaver_active(&self) -> bool { self.screensaver_active }
    fn playing_video(&self) -> bool { self.playing && self.video }
    fn playing_tvshow(&self) -> bool { self.playing && self.tvshow }
    fn playing_audio(&self) -> bool { self.playing && self.audio }
    fn playing_live_tv(&self) -> bool { self.playing && self.live_tv }
    fn playing_live_radio(&self) -> bool { self.playing && self.live_radio }
    fn is_internet_stream(&self) -> bool { self.internet_stream }
    fn is_player_playing(&self) -> bool { self.playing }
    fn is_player_paused(&self) -> bool { self.paused }
    fn is_muted(&self) -> bool { self.muted }
    fn is_pvr_recording(&self) -> bool { self.recording }
    fn is_playlist_random(&self) -> bool { self.shuffle }
    fn is_playlist_repeat_any(&self) -> bool { self.repeat }
    fn is_disc_in_drive(&self) -> bool { self.disc_in_drive }
    fn is_passthrough_audio(&self) -> bool { self.passthrough }

    fn window_is_active(&self, window_id: i32) -> bool {
        self.active_window == window_id || self.active_windows.contains(&window_id)
    }

    fn active_window_id(&self) -> i32 { self.active_window }
    fn progress_percent(&self) -> f64 { self.progress }
    fn volume_percent(&self) -> f64 { self.volume }

    fn label(&self, key: &str) -> Option<String> {
        if let Some(value) = self.labels.get(key) {
            return Some(value.clone());
        }
        // clock labels fall back to the local time
        match key {
            "System.Time" | "Time" => Some(Local::now().format("%H:%M").to_string()),
            "System.Date" => Some(Local::now().format("%a %d %b").to_string()),
            _ => None,
        }
    }
}
