/*
 *  engine.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Render engine - skin bootstrap, per frame line output, backlight and
 *  icon panel upkeep
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

use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

use crate::backlight::{BacklightDimmer, DimPolicy, BACKLIGHT_OFF, BACKLIGHT_ON};
use crate::display::{
    BoxedDriver, DisplayError, LcdDriver, LcdMode, LineContent, ModeController, ModeSignals,
};
use crate::info::InfoSource;
use crate::markup::Markup;
use crate::overlay::OverlayManager;
use crate::skin::{
    LineDescriptor, LineType, Skin, SkinError, SkinGeometry, SkinLoader, BUNDLED_SKIN,
};

/// Shown once when a skin document cannot be parsed
pub const SKIN_WARNING: &str = "LCD skin could not be loaded, check the log for details";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("neither the user skin nor the default skin could be loaded")]
    NoUsableSkin,
    #[error("markup pattern error: {0}")]
    Markup(#[from] fancy_regex::Error),
}

/// Surfaces a message to the user (a popup in a host UI)
pub trait Notifier: Send {
    fn notify(&self, message: &str);
}

/// Default notifier, the message goes to the log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Where a skin document comes from
enum SkinSource<'p> {
    File(&'p Path),
    Bundled,
}

/// One LCD, one skin, one caller.
///
/// `render` is called on every tick; skin loads replace the whole skin
/// between frames.
pub struct LcdEngine {
    driver: BoxedDriver,
    markup: Markup,
    skin: Skin,
    modes: ModeController,
    backlight: BacklightDimmer,
    overlay: OverlayManager,
    policy: DimPolicy,
    notifier: Box<dyn Notifier>,
    skin_warning_shown: bool,
    force_next: bool,
}

impl LcdEngine {
    pub fn new(driver: BoxedDriver, policy: DimPolicy) -> Result<Self, EngineError> {
        let columns = driver.columns();
        Ok(Self {
            driver,
            markup: Markup::new()?,
            skin: Skin::blank(columns),
            modes: ModeController::new(),
            backlight: BacklightDimmer::new(Instant::now()),
            overlay: OverlayManager::new(),
            policy,
            notifier: Box::new(LogNotifier),
            skin_warning_shown: false,
            force_next: true,
        })
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    fn geometry(&self) -> SkinGeometry {
        SkinGeometry {
            columns: self.driver.columns(),
            cell_width: self.driver.cell_width(),
        }
    }

    /// Load the defaults, then the user skin (created from the defaults
    /// when missing). Fails only if neither is usable.
    pub fn initialize(&mut self, defaults: Option<&Path>, user: &Path) -> Result<(), EngineError> {
        let defaults_file = defaults.filter(|path| path.is_file());
        let defaults_ok = match defaults_file {
            Some(path) => self.load_from(SkinSource::File(path), true),
            None => {
                if let Some(path) = defaults {
                    warn!("Default skin {} not found, using the bundled copy", path.display());
                }
                self.load_from(SkinSource::Bundled, true)
            }
        };

        if !user.exists() {
            create_user_skin(defaults_file, user);
        }
        let user_ok = user.exists() && self.load_skin(user, false);

        if !defaults_ok && !user_ok {
            error!("No usable skin, giving up");
            return Err(EngineError::NoUsableSkin);
        }

        self.backlight.reset(Instant::now());
        if let Err(e) = self.driver.set_backlight(BACKLIGHT_ON) {
            error!("Failed to switch backlight on: {}", e);
        }
        self.force_next = true;
        Ok(())
    }

    /// Load a skin document from disk, returns false (and keeps the
    /// current skin) when it cannot be parsed
    pub fn load_skin(&mut self, path: &Path, defaults_pass: bool) -> bool {
        self.load_from(SkinSource::File(path), defaults_pass)
    }

    fn load_from(&mut self, source: SkinSource, defaults_pass: bool) -> bool {
        if defaults_pass {
            self.skin = Skin::blank(self.driver.columns());
        }

        let loader = SkinLoader::new(&self.markup, self.geometry());
        let loaded: Result<Skin, SkinError> = match source {
            SkinSource::File(path) => loader.load_file(path),
            SkinSource::Bundled => loader.parse(BUNDLED_SKIN),
        };

        match loaded {
            Ok(skin) => {
                self.skin = skin;
                self.skin_warning_shown = false;
                self.driver.apply_skin_options(&self.skin.options);
                self.force_next = true;
                info!("Skin loaded");
                true
            }
            Err(e) => {
                error!("Skin load failed: {}", e);
                if !self.skin_warning_shown {
                    self.notifier.notify(SKIN_WARNING);
                    self.skin_warning_shown = true;
                }
                false
            }
        }
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    pub fn current_mode(&self) -> LcdMode {
        self.modes.current_mode()
    }

    pub fn is_dimmed(&self) -> bool {
        self.backlight.is_dimmed()
    }

    pub fn policy(&self) -> &DimPolicy {
        &self.policy
    }

    pub fn driver(&self) -> &dyn LcdDriver {
        self.driver.as_ref()
    }

    pub fn driver_mut(&mut self) -> &mut dyn LcdDriver {
        self.driver.as_mut()
    }

    /// Apply changed settings, the backlight comes back on and the dim
    /// delay starts over
    pub fn update_settings(&mut self, policy: DimPolicy, contrast: Option<u8>) {
        info!("Applying settings: {:?}", policy);
        self.policy = policy;

        if let Some(level) = contrast {
            log_failure("set contrast", self.driver.set_contrast(level));
        }
        if self.backlight.is_dimmed() {
            log_failure("set backlight", self.driver.set_backlight(BACKLIGHT_ON));
        }
        self.backlight.reset(Instant::now());
        self.force_next = true;
    }

    pub fn render(&mut self, info: &dyn InfoSource, force: bool) {
        self.render_at(info, force, Instant::now());
    }

    /// One frame at time `now`
    pub fn render_at(&mut self, info: &dyn InfoSource, force: bool, now: Instant) {
        let force = force || std::mem::take(&mut self.force_next);
        let mode = self.modes.update(&ModeSignals::from_info(info));

        self.handle_backlight(mode, info, now);

        let rows = self.driver.rows();
        let columns = self.driver.columns();
        let lines = self.skin.modes.lines(mode);
        let allow_empty = self.skin.options.allow_empty_lines;

        let mut out_row = 0;
        for descriptor in lines {
            if out_row >= rows {
                break;
            }

            let content = if descriptor.is_bar() {
                let pixels = self
                    .driver
                    .set_progress_bar(info.progress_percent(), Some(descriptor.endx));
                LineContent::ProgressBar { pixels }
            } else {
                if descriptor.line_type == LineType::IconText {
                    log_failure(
                        "set play icon",
                        self.driver.set_playing_state_icon(OverlayManager::play_state(info)),
                    );
                }

                let mut text = info.resolve(&descriptor.text);
                if !text.is_empty() {
                    text = self.markup.strip_bbcode(&text);
                }
                // release bar memory on rows without a bar
                self.driver.set_progress_bar(0.0, None);
                LineContent::Text(text)
            };

            if allow_empty || !content.is_empty() {
                log_failure(
                    "set line",
                    self.driver.set_line(mode, out_row, &content, descriptor, force),
                );
                out_row += 1;
            }
        }

        if !self.skin.modes.is_big_screen(mode) {
            let blank = LineDescriptor::blank(columns);
            let empty = LineContent::empty();
            for row in out_row..rows {
                log_failure("set line", self.driver.set_line(mode, row, &empty, &blank, force));
            }
        }

        if self.driver.capabilities().supports_extra_icons {
            if force {
                self.overlay.invalidate();
            }
            self.overlay.update(info, &self.skin.options);
            self.overlay.forward(self.driver.as_mut());
        }

        log_failure("flush lines", self.driver.flush_lines());
    }

    fn handle_backlight(&mut self, mode: LcdMode, info: &dyn InfoSource, now: Instant) {
        let paused = info.is_player_playing() && info.is_player_paused();
        let dim_worthy = self.policy.is_dim_worthy(mode, paused);

        if let Some(level) = self.backlight.update(dim_worthy, self.policy.delay, now) {
            info!("Backlight {}", if level == BACKLIGHT_OFF { "dimmed" } else { "on" });
            log_failure("set backlight", self.driver.set_backlight(level));
        }
    }

    pub fn suspend(&mut self) {
        log_failure("suspend", self.driver.suspend());
    }

    /// Next frame rewrites every line and icon
    pub fn resume(&mut self) {
        log_failure("resume", self.driver.resume());
        self.overlay.invalidate();
        self.force_next = true;
    }

    pub fn shutdown(&mut self) {
        info!("LCD engine shutting down");
        if self.policy.on_shutdown {
            log_failure("set backlight", self.driver.set_backlight(BACKLIGHT_OFF));
        }
        log_failure("stop", self.driver.stop());
    }
}

fn log_failure(what: &str, result: Result<(), DisplayError>) {
    if let Err(e) = result {
        error!("Display failed to {}: {}", what, e);
    }
}

// best effort, the defaults already in memory stay active on failure
fn create_user_skin(defaults: Option<&Path>, user: &Path) {
    let contents = match defaults.map(fs::read_to_string) {
        Some(Ok(contents)) => contents,
        Some(Err(e)) => {
            warn!("Cannot read default skin ({}), seeding from the bundled copy", e);
            BUNDLED_SKIN.to_string()
        }
        None => BUNDLED_SKIN.to_string(),
    };

    if let Some(parent) = user.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            error!("Cannot create skin directory {}: {}", parent.display(), e);
            return;
        }
    }
    match fs::write(user, contents) {
        Ok(()) => info!("Created user skin {}", user.display()),
        Err(e) => error!("Cannot create user skin {}: {}", user.display(), e),
    }
}
