/*
 *  extraicons.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Auxiliary icon panel - icon ids, categories and on/off bookkeeping
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

use crate::skin::EXTRA_BARS_MAX;

/// Icons found on VFD/LCD front panels (iMON, MDM166A and friends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtraIcon {
    Playing,
    Pause,
    Movie,
    Music,
    Weather,
    Tv,
    Photo,
    Webcasting,
    Mute,
    Repeat,
    Shuffle,
    Alarm,
    Record,
    Volume,
    Time,
    Spdif,
    DiscIn,
    Scr1,
    Scr2,
    ResolutionSd,
    ResolutionHd,
    VcodecMpeg,
    VcodecDivx,
    VcodecXvid,
    VcodecWmv,
    AcodecMpeg,
    AcodecAc3,
    AcodecDts,
    AcodecVwma, // e.g. iMON has video-WMA AND audio-WMA
    AcodecMp3,
    AcodecOgg,
    AcodecAwma,
    AcodecWav,
    OutSource,
    OutFit,
    Out2_0,
    Out5_1,
    Out7_1,
}

impl ExtraIcon {
    pub const COUNT: usize = 38;

    pub const ALL: [ExtraIcon; ExtraIcon::COUNT] = [
        ExtraIcon::Playing,
        ExtraIcon::Pause,
        ExtraIcon::Movie,
        ExtraIcon::Music,
        ExtraIcon::Weather,
        ExtraIcon::Tv,
        ExtraIcon::Photo,
        ExtraIcon::Webcasting,
        ExtraIcon::Mute,
        ExtraIcon::Repeat,
        ExtraIcon::Shuffle,
        ExtraIcon::Alarm,
        ExtraIcon::Record,
        ExtraIcon::Volume,
        ExtraIcon::Time,
        ExtraIcon::Spdif,
        ExtraIcon::DiscIn,
        ExtraIcon::Scr1,
        ExtraIcon::Scr2,
        ExtraIcon::ResolutionSd,
        ExtraIcon::ResolutionHd,
        ExtraIcon::VcodecMpeg,
        ExtraIcon::VcodecDivx,
        ExtraIcon::VcodecXvid,
        ExtraIcon::VcodecWmv,
        ExtraIcon::AcodecMpeg,
        ExtraIcon::AcodecAc3,
        ExtraIcon::AcodecDts,
        ExtraIcon::AcodecVwma,
        ExtraIcon::AcodecMp3,
        ExtraIcon::AcodecOgg,
        ExtraIcon::AcodecAwma,
        ExtraIcon::AcodecWav,
        ExtraIcon::OutSource,
        ExtraIcon::OutFit,
        ExtraIcon::Out2_0,
        ExtraIcon::Out5_1,
        ExtraIcon::Out7_1,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short panel label
    pub fn name(self) -> &'static str {
        match self {
            ExtraIcon::Playing => "PLAY",
            ExtraIcon::Pause => "PAUSE",
            ExtraIcon::Movie => "MOVIE",
            ExtraIcon::Music => "MUSIC",
            ExtraIcon::Weather => "WEATHER",
            ExtraIcon::Tv => "TV",
            ExtraIcon::Photo => "PHOTO",
            ExtraIcon::Webcasting => "WEB",
            ExtraIcon::Mute => "MUTE",
            ExtraIcon::Repeat => "REP",
            ExtraIcon::Shuffle => "SHUF",
            ExtraIcon::Alarm => "ALARM",
            ExtraIcon::Record => "REC",
            ExtraIcon::Volume => "VOL",
            ExtraIcon::Time => "TIME",
            ExtraIcon::Spdif => "SPDIF",
            ExtraIcon::DiscIn => "DISC",
            ExtraIcon::Scr1 => "SCR1",
            ExtraIcon::Scr2 => "SCR2",
            ExtraIcon::ResolutionSd => "SD",
            ExtraIcon::ResolutionHd => "HD",
            ExtraIcon::VcodecMpeg => "V:MPEG",
            ExtraIcon::VcodecDivx => "V:DIVX",
            ExtraIcon::VcodecXvid => "V:XVID",
            ExtraIcon::VcodecWmv => "V:WMV",
            ExtraIcon::AcodecMpeg => "A:MPEG",
            ExtraIcon::AcodecAc3 => "A:AC3",
            ExtraIcon::AcodecDts => "A:DTS",
            ExtraIcon::AcodecVwma => "A:VWMA",
            ExtraIcon::AcodecMp3 => "A:MP3",
            ExtraIcon::AcodecOgg => "A:OGG",
            ExtraIcon::AcodecAwma => "A:WMA",
            ExtraIcon::AcodecWav => "A:WAV",
            ExtraIcon::OutSource => "SRC",
            ExtraIcon::OutFit => "FIT",
            ExtraIcon::Out2_0 => "2.0",
            ExtraIcon::Out5_1 => "5.1",
            ExtraIcon::Out7_1 => "7.1",
        }
    }

    /// Category within which at most one icon is lit
    pub fn exclusive_category(self) -> Option<IconCategory> {
        [
            IconCategory::Modes,
            IconCategory::OutScale,
            IconCategory::Resolution,
            IconCategory::VideoCodecs,
            IconCategory::AudioCodecs,
            IconCategory::AudioChannels,
        ]
        .into_iter()
        .find(|category| category.icons().contains(&self))
    }
}

/// Groups of icons cleared together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconCategory {
    Modes,
    OutScale,
    Resolution,
    VideoCodecs,
    AudioCodecs,
    AudioChannels,
    /// Everything describing the current stream
    Codecs,
}

impl IconCategory {
    pub fn icons(self) -> &'static [ExtraIcon] {
        use ExtraIcon::*;
        match self {
            IconCategory::Modes => &[Movie, Music, Weather, Tv, Photo, Webcasting],
            IconCategory::OutScale => &[OutSource, OutFit],
            IconCategory::Resolution => &[ResolutionSd, ResolutionHd],
            IconCategory::VideoCodecs => &[VcodecMpeg, VcodecDivx, VcodecXvid, VcodecWmv],
            IconCategory::AudioCodecs => &[
                AcodecMpeg, AcodecAc3, AcodecDts, AcodecVwma, AcodecMp3, AcodecOgg, AcodecAwma,
                AcodecWav,
            ],
            IconCategory::AudioChannels => &[Out2_0, Out5_1, Out7_1],
            IconCategory::Codecs => &[
                VcodecMpeg, VcodecDivx, VcodecXvid, VcodecWmv, AcodecMpeg, AcodecAc3, AcodecDts,
                AcodecVwma, AcodecMp3, AcodecOgg, AcodecAwma, AcodecWav, Out2_0, Out5_1, Out7_1,
                Spdif,
            ],
        }
    }
}

/// Icon and bar changes since the last flush
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraChanges {
    pub icons: Vec<(ExtraIcon, bool)>,
    /// (bar number 1..=4, percent)
    pub bars: Vec<(usize, f64)>,
}

impl ExtraChanges {
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty() && self.bars.is_empty()
    }
}

/// Current icon/bar state of the panel plus what was last sent out
#[derive(Debug, Clone)]
pub struct ExtraIcons {
    states: [bool; ExtraIcon::COUNT],
    bars: [f64; EXTRA_BARS_MAX],
    sent: Option<([bool; ExtraIcon::COUNT], [f64; EXTRA_BARS_MAX])>,
}

impl Default for ExtraIcons {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtraIcons {
    pub fn new() -> Self {
        Self {
            states: [false; ExtraIcon::COUNT],
            bars: [0.0; EXTRA_BARS_MAX],
            sent: None,
        }
    }

    pub fn is_on(&self, icon: ExtraIcon) -> bool {
        self.states[icon.index()]
    }

    /// Switching an icon on turns off the others of its exclusive category
    pub fn set_icon_state(&mut self, icon: ExtraIcon, on: bool) {
        if on {
            if let Some(category) = icon.exclusive_category() {
                self.clear_icon_states(category);
            }
        }
        self.states[icon.index()] = on;
    }

    pub fn clear_icon_states(&mut self, category: IconCategory) {
        for icon in category.icons() {
            self.states[icon.index()] = false;
        }
    }

    /// Bar 1..=4, percent clamped to 0..=100
    pub fn set_bar(&mut self, bar: usize, percent: f64) {
        if (1..=EXTRA_BARS_MAX).contains(&bar) {
            let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
            self.bars[bar - 1] = percent;
        }
    }

    pub fn bar(&self, bar: usize) -> Option<f64> {
        self.bars.get(bar.wrapping_sub(1)).copied()
    }

    /// Icons currently lit
    pub fn active(&self) -> Vec<ExtraIcon> {
        ExtraIcon::ALL.into_iter().filter(|icon| self.is_on(*icon)).collect()
    }

    /// Everything is resent on the next flush
    pub fn invalidate(&mut self) {
        self.sent = None;
    }

    /// Diff against the last flushed state and remember the current one
    pub fn take_changes(&mut self) -> ExtraChanges {
        let mut changes = ExtraChanges::default();

        for icon in ExtraIcon::ALL {
            let now = self.states[icon.index()];
            let changed = self.sent.as_ref().is_none_or(|(icons, _)| icons[icon.index()] != now);
            if changed {
                changes.icons.push((icon, now));
            }
        }
        for i in 0..EXTRA_BARS_MAX {
            let now = self.bars[i];
            let changed = self.sent.as_ref().is_none_or(|(_, bars)| bars[i] != now);
            if changed {
                changes.bars.push((i + 1, now));
            }
        }

        self.sent = Some((self.states, self.bars));
        changes
    }
}
