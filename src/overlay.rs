/*
 *  overlay.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Overlay state - derives icon panel and extra bar state from the player
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

use log::{debug, error};

use crate::display::{DisplayError, LcdDriver, PlayState};
use crate::extraicons::{ExtraIcon, ExtraIcons, IconCategory};
use crate::info::{window_ids, InfoSource, WindowClass};
use crate::skin::{ExtraBarRole, SkinOptions};

/// Below this vertical resolution video counts as SD
pub const HD_MIN_LINES: u32 = 720;

/// Screen and video height within this fraction means no scaling
const OUT_SOURCE_TOLERANCE: f64 = 0.1;

const VIDEO_CODECS: &[(&[&str], ExtraIcon)] = &[
    (&["mpg", "mpeg", "mpeg2video", "h264", "x264", "mpeg4", "hdmv", "hevc"], ExtraIcon::VcodecMpeg),
    (&["divx", "dx50", "div3"], ExtraIcon::VcodecDivx),
    (&["xvid"], ExtraIcon::VcodecXvid),
    (&["wmv", "wvc1", "vc-1", "vc1"], ExtraIcon::VcodecWmv),
];

// wma is resolved separately, video and audio playback use different icons
const AUDIO_CODECS: &[(&[&str], ExtraIcon)] = &[
    (&["mpga", "mp2"], ExtraIcon::AcodecMpeg),
    (&["ac3", "eac3", "truehd"], ExtraIcon::AcodecAc3),
    (&["dts", "dca", "dtshd_hra", "dtshd_ma"], ExtraIcon::AcodecDts),
    (&["mp3", "mp3float"], ExtraIcon::AcodecMp3),
    (&["ogg", "vorbis"], ExtraIcon::AcodecOgg),
    (&["wav", "flac", "pcm", "pcm_bluray", "pcm_s24le"], ExtraIcon::AcodecWav),
];
const WMA_CODECS: &[&str] = &["wma", "wmav2"];

fn lookup_codec(table: &[(&[&str], ExtraIcon)], codec: &str) -> Option<ExtraIcon> {
    table
        .iter()
        .find(|(names, _)| names.contains(&codec))
        .map(|(_, icon)| *icon)
}

/// Video codec icon for a lower case codec name
pub fn video_codec_icon(codec: &str) -> Option<ExtraIcon> {
    lookup_codec(VIDEO_CODECS, codec)
}

/// Audio codec icon for a lower case codec name
pub fn audio_codec_icon(codec: &str, is_video: bool) -> Option<ExtraIcon> {
    if WMA_CODECS.contains(&codec) {
        return Some(if is_video { ExtraIcon::AcodecVwma } else { ExtraIcon::AcodecAwma });
    }
    lookup_codec(AUDIO_CODECS, codec)
}

/// Channel layout icon, `None` outside 1..=8
pub fn channels_icon(channels: u32) -> Option<ExtraIcon> {
    match channels {
        1..=3 => Some(ExtraIcon::Out2_0),
        4..=6 => Some(ExtraIcon::Out5_1),
        7..=8 => Some(ExtraIcon::Out7_1),
        _ => None,
    }
}

/// Vertical resolution from a player label ("1080", "720p", "4K")
fn parse_lines(label: Option<String>) -> Option<u32> {
    let label = label?.trim().to_lowercase();
    match label.as_str() {
        "4k" => Some(2160),
        "8k" => Some(4320),
        _ => label
            .trim_end_matches(['p', 'i'])
            .parse::<u32>()
            .ok()
            .filter(|lines| *lines > 0),
    }
}

/// Screen height equals video height within the tolerance band
fn is_out_source(screen: u32, video: u32) -> bool {
    let video = video as f64;
    let screen = screen as f64;
    let band = video * OUT_SOURCE_TOLERANCE;
    screen >= video - band && screen <= video + band
}

/// Keeps the icon panel in step with the player.
///
/// Codec and channel icons are only touched when the reported value
/// changes; everything else is recomputed each frame.
#[derive(Debug, Clone)]
pub struct OverlayManager {
    icons: ExtraIcons,
    old_video_codec: String,
    old_audio_codec: String,
    old_channels: u32,
    was_stopped: bool,
    volume_change_active: bool,
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayManager {
    pub fn new() -> Self {
        Self {
            icons: ExtraIcons::new(),
            old_video_codec: String::new(),
            old_audio_codec: String::new(),
            old_channels: 0,
            was_stopped: true,
            volume_change_active: false,
        }
    }

    pub fn icons(&self) -> &ExtraIcons {
        &self.icons
    }

    /// Play indicator state for icon text lines
    pub fn play_state(info: &dyn InfoSource) -> PlayState {
        match (info.is_player_playing(), info.is_player_paused()) {
            (true, true) => PlayState::Paused,
            (true, false) => PlayState::Playing,
            _ => PlayState::Stopped,
        }
    }

    /// Recompute every icon and bar for this frame
    pub fn update(&mut self, info: &dyn InfoSource, options: &SkinOptions) {
        let playing = info.is_player_playing();
        let paused = info.is_player_paused();
        let is_video = info.playing_video();
        let is_audio = info.playing_audio();

        self.icons.set_icon_state(
            ExtraIcon::Playing,
            playing && !(paused && options.disable_play_indicator_on_pause),
        );

        self.update_playing(info, playing, is_video, is_audio);
        self.update_codecs(info, playing, is_video, is_audio);
        self.update_generic(info, paused);
        self.update_bars(info, options, playing);
    }

    fn update_playing(&mut self, info: &dyn InfoSource, playing: bool, is_video: bool, is_audio: bool) {
        if !playing || !is_video {
            self.icons.clear_icon_states(IconCategory::OutScale);
            self.icons.clear_icon_states(IconCategory::Resolution);
        }

        if !playing {
            // idle, the active window decides the mode icon
            let icon = WindowClass::of(info.active_window_id()).map(|class| match class {
                WindowClass::Pvr => ExtraIcon::Tv,
                WindowClass::Video => ExtraIcon::Movie,
                WindowClass::Music => ExtraIcon::Music,
                WindowClass::Pictures => ExtraIcon::Photo,
                WindowClass::Weather => ExtraIcon::Weather,
            });
            match icon {
                Some(icon) => self.icons.set_icon_state(icon, true),
                None => self.icons.clear_icon_states(IconCategory::Modes),
            }
            return;
        }

        if is_video {
            let mode_icon = if info.playing_live_tv() {
                ExtraIcon::Tv
            } else if info.is_internet_stream() {
                ExtraIcon::Webcasting
            } else {
                ExtraIcon::Movie
            };
            self.icons.set_icon_state(mode_icon, true);

            let video_lines = parse_lines(info.label("VideoPlayer.VideoResolution"));
            let screen_lines = parse_lines(info.label("System.ScreenHeight"));

            match video_lines {
                Some(lines) if lines < HD_MIN_LINES => self.icons.set_icon_state(ExtraIcon::ResolutionSd, true),
                Some(_) => self.icons.set_icon_state(ExtraIcon::ResolutionHd, true),
                None => self.icons.clear_icon_states(IconCategory::Resolution),
            }

            match (screen_lines, video_lines) {
                (Some(screen), Some(video)) if is_out_source(screen, video) => {
                    self.icons.set_icon_state(ExtraIcon::OutSource, true)
                }
                (Some(_), Some(_)) => self.icons.set_icon_state(ExtraIcon::OutFit, true),
                // no basis for a comparison
                _ => self.icons.clear_icon_states(IconCategory::OutScale),
            }
        } else if is_audio {
            let mode_icon = if info.is_internet_stream() { ExtraIcon::Webcasting } else { ExtraIcon::Music };
            self.icons.set_icon_state(mode_icon, true);
        } else {
            self.icons.clear_icon_states(IconCategory::Modes);
        }
    }

    fn update_codecs(&mut self, info: &dyn InfoSource, playing: bool, is_video: bool, is_audio: bool) {
        if !playing {
            self.icons.clear_icon_states(IconCategory::Codecs);
            self.was_stopped = true;
            return;
        }

        self.icons.set_icon_state(ExtraIcon::Spdif, info.is_passthrough_audio());

        let label = |key: &str| info.label(key).unwrap_or_default().trim().to_lowercase();
        let (video_codec, audio_codec, channels) = if is_video {
            (
                label("VideoPlayer.VideoCodec"),
                label("VideoPlayer.AudioCodec"),
                label("VideoPlayer.AudioChannels"),
            )
        } else if is_audio {
            (String::new(), label("MusicPlayer.Codec"), label("MusicPlayer.Channels"))
        } else {
            (String::new(), String::new(), String::new())
        };

        if self.was_stopped {
            self.was_stopped = false;
            self.old_video_codec.clear();
            self.old_audio_codec.clear();
            self.old_channels = 0;
        }

        if self.old_video_codec != video_codec {
            debug!("Video codec now '{}'", video_codec);
            match video_codec_icon(&video_codec) {
                Some(icon) => self.icons.set_icon_state(icon, true),
                None => self.icons.clear_icon_states(IconCategory::VideoCodecs),
            }
            self.old_video_codec = video_codec;
        }

        if self.old_audio_codec != audio_codec {
            debug!("Audio codec now '{}'", audio_codec);
            match audio_codec_icon(&audio_codec, is_video) {
                Some(icon) => self.icons.set_icon_state(icon, true),
                None => self.icons.clear_icon_states(IconCategory::AudioCodecs),
            }
            self.old_audio_codec = audio_codec;
        }

        let channels = match channels.parse::<u32>() {
            Ok(channels) => channels,
            Err(_) if !self.old_audio_codec.is_empty() => 2,
            Err(_) => 0,
        };
        if self.old_channels != channels {
            debug!("Audio channels now {}", channels);
            match channels_icon(channels) {
                Some(icon) => self.icons.set_icon_state(icon, true),
                None => self.icons.clear_icon_states(IconCategory::AudioChannels),
            }
            self.old_channels = channels;
        }
    }

    fn update_generic(&mut self, info: &dyn InfoSource, paused: bool) {
        self.volume_change_active = info.window_is_active(window_ids::WINDOW_DIALOG_VOLUME_BAR);

        let flags = [
            (ExtraIcon::Mute, info.is_muted()),
            (ExtraIcon::Pause, paused),
            (ExtraIcon::Record, info.is_pvr_recording()),
            (ExtraIcon::Shuffle, info.is_playlist_random()),
            (ExtraIcon::Repeat, info.is_playlist_repeat_any()),
            (ExtraIcon::DiscIn, info.is_disc_in_drive()),
            (ExtraIcon::Time, info.is_screensaver_active()),
            (ExtraIcon::Volume, self.volume_change_active),
            (ExtraIcon::Alarm, info.window_is_active(window_ids::WINDOW_DIALOG_KAI_TOAST)),
        ];
        for (icon, on) in flags {
            self.icons.set_icon_state(icon, on);
        }
    }

    fn update_bars(&mut self, info: &dyn InfoSource, options: &SkinOptions, playing: bool) {
        for (i, role) in options.extra_bars.iter().enumerate() {
            let percent = match role {
                ExtraBarRole::Progress if playing => info.progress_percent() * 100.0,
                ExtraBarRole::Progress => 0.0,
                ExtraBarRole::Volume => info.volume_percent(),
                ExtraBarRole::VolumeHidden if self.volume_change_active => info.volume_percent(),
                ExtraBarRole::VolumeHidden => 0.0,
                ExtraBarRole::Menu if playing => 0.0,
                ExtraBarRole::Menu => 100.0,
                ExtraBarRole::AlwaysOn => 100.0,
                ExtraBarRole::None => 0.0,
            };
            self.icons.set_bar(i + 1, percent);
        }
    }

    /// Everything goes out again on the next forward
    pub fn invalidate(&mut self) {
        self.icons.invalidate();
    }

    /// Send the icons and bars that changed since the last forward
    pub fn forward(&mut self, driver: &mut dyn LcdDriver) {
        let changes = self.icons.take_changes();
        if !changes.icons.is_empty() {
            let lit: Vec<&str> = self.icons.active().into_iter().map(ExtraIcon::name).collect();
            debug!("Icons lit: {}", lit.join(" "));
        }

        for (icon, on) in changes.icons {
            match driver.set_extra_icon(icon, on) {
                Ok(()) | Err(DisplayError::UnsupportedOperation) => {}
                Err(e) => error!("Failed to set icon {}: {}", icon.name(), e),
            }
        }
        for (bar, percent) in changes.bars {
            match driver.set_extra_bar(bar, percent) {
                Ok(()) | Err(DisplayError::UnsupportedOperation) => {}
                Err(e) => error!("Failed to set extra bar {}: {}", bar, e),
            }
        }
    }
}
