/*
 *  skin/mod.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Skin model - per mode line descriptors and skin wide options
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

pub mod loader;

pub use loader::{SkinError, SkinLoader, BUNDLED_SKIN};

use crate::display::LcdMode;

/// Number of auxiliary bars a skin can assign
pub const EXTRA_BARS_MAX: usize = 4;

/// Icon widgets are two cells wide, text after them starts this much later
pub const DEFAULT_ICON_TEXT_OFFSET: u32 = 2;

/// How a line is turned into output at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Text,
    ProgressBar,
    ProgressTime,
    IconText,
    BigScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAlign {
    Left,
    Center,
    Right,
}

/// One renderable row of a mode
///
/// `startx`/`endx` are 1-based columns; for bar types `endx` is in pixels
/// (columns times cell width).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDescriptor {
    pub line_type: LineType,
    pub startx: u32,
    pub endx: u32,
    pub text: String,
    pub align: LineAlign,
}

impl LineDescriptor {
    /// Empty left aligned text line spanning the display
    pub fn blank(columns: u32) -> Self {
        Self {
            line_type: LineType::Text,
            startx: 1,
            endx: columns,
            text: String::new(),
            align: LineAlign::Left,
        }
    }

    pub fn is_bar(&self) -> bool {
        matches!(self.line_type, LineType::ProgressBar | LineType::ProgressTime)
    }
}

/// What an auxiliary bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraBarRole {
    Progress,
    Volume,
    VolumeHidden,
    Menu,
    AlwaysOn,
    #[default]
    None,
}

impl ExtraBarRole {
    /// Skin names, anything unknown leaves the bar unassigned
    pub fn from_skin(value: &str) -> Self {
        match value.trim() {
            "progress" => ExtraBarRole::Progress,
            "volume" => ExtraBarRole::Volume,
            "volumehidden" => ExtraBarRole::VolumeHidden,
            "menu" => ExtraBarRole::Menu,
            "alwayson" => ExtraBarRole::AlwaysOn,
            _ => ExtraBarRole::None,
        }
    }
}

/// Skin wide options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinOptions {
    /// Shown between end and restart of scrolling text
    pub scroll_separator: String,

    /// Draw `[` `]` around progress bars
    pub progressbar_surroundings: bool,

    /// Fill character for the empty part of a progress bar
    pub progressbar_blank: char,

    /// Columns reserved for the play icon in front of icon text
    pub icon_text_offset: u32,

    /// Keep lines that resolve to nothing
    pub allow_empty_lines: bool,

    pub center_big_digits: bool,

    /// Play indicator goes off while paused
    pub disable_play_indicator_on_pause: bool,

    /// Roles of auxiliary bars 1..=4
    pub extra_bars: [ExtraBarRole; EXTRA_BARS_MAX],
}

impl Default for SkinOptions {
    fn default() -> Self {
        Self {
            scroll_separator: " ".to_string(),
            progressbar_surroundings: false,
            progressbar_blank: ' ',
            icon_text_offset: DEFAULT_ICON_TEXT_OFFSET,
            allow_empty_lines: false,
            center_big_digits: false,
            disable_play_indicator_on_pause: false,
            extra_bars: [ExtraBarRole::None; EXTRA_BARS_MAX],
        }
    }
}

/// Line descriptors for all nine modes.
///
/// Every mode holds at least one descriptor so rendering always has a
/// line to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTable {
    modes: [Vec<LineDescriptor>; LcdMode::COUNT],
}

impl ModeTable {
    /// Every mode set to a single blank line
    pub fn blank(columns: u32) -> Self {
        Self {
            modes: std::array::from_fn(|_| vec![LineDescriptor::blank(columns)]),
        }
    }

    pub fn lines(&self, mode: LcdMode) -> &[LineDescriptor] {
        &self.modes[mode.index()]
    }

    /// Replace a mode's lines, an empty list becomes one blank line
    pub fn set(&mut self, mode: LcdMode, lines: Vec<LineDescriptor>, columns: u32) {
        self.modes[mode.index()] = if lines.is_empty() {
            vec![LineDescriptor::blank(columns)]
        } else {
            lines
        };
    }

    /// First descriptor of the mode is a big digit screen
    pub fn is_big_screen(&self, mode: LcdMode) -> bool {
        self.lines(mode)
            .first()
            .is_some_and(|line| line.line_type == LineType::BigScreen)
    }
}

/// A loaded skin, replaced as a whole on every load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skin {
    pub options: SkinOptions,
    pub modes: ModeTable,
}

impl Skin {
    /// Compiled in fallback: default options, blank modes
    pub fn blank(columns: u32) -> Self {
        Self {
            options: SkinOptions::default(),
            modes: ModeTable::blank(columns),
        }
    }
}

/// Display geometry the loader needs to size lines and bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinGeometry {
    pub columns: u32,
    pub cell_width: u32,
}
