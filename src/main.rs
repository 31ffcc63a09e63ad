/*
 *  main.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Daemon entry point - config, driver, skin bootstrap and the render loop
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

use anyhow::Context;
use env_logger::Env;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::signal::unix::{signal, SignalKind};

use lylcd::config::{self, Config};
use lylcd::{DimPolicy, DisplayDriverFactory, InfoSnapshot, LcdEngine};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        },
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        },
    }
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Player state source for the loop, keeps the last good snapshot when
/// the state file is missing or half written
struct StateFeed {
    path: Option<PathBuf>,
    snapshot: InfoSnapshot,
}

impl StateFeed {
    fn new(path: Option<PathBuf>) -> Self {
        Self { path, snapshot: InfoSnapshot::default() }
    }

    fn refresh(&mut self) -> &InfoSnapshot {
        if let Some(path) = self.path.as_ref() {
            match InfoSnapshot::load(path) {
                Ok(snapshot) => self.snapshot = snapshot,
                Err(e) => debug!("state {} not read: {}", path.display(), e),
            }
        }
        &self.snapshot
    }
}

async fn render_loop(engine: &mut LcdEngine, cfg: &Config) {
    let user_skin = cfg.user_skin_path();
    let mut skin_stamp = modified(&user_skin);
    let mut feed = StateFeed::new(cfg.state_file.clone());
    let tick = Duration::from_millis(cfg.refresh_ms());

    loop {
        // pick up skin edits without a restart
        let stamp = modified(&user_skin);
        if stamp.is_some() && stamp != skin_stamp {
            info!("Skin {} changed, reloading", user_skin.display());
            skin_stamp = stamp;
            if !engine.load_skin(&user_skin, false) {
                warn!("Reload failed, keeping the current skin");
            }
        }

        let snapshot = feed.refresh();
        engine.render(snapshot, false);

        tokio::time::sleep(tick).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("This {} worth the Squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display = cfg.display();
    let driver = DisplayDriverFactory::create_from_config(&display)
        .context("creating display driver")?;

    let mut engine = LcdEngine::new(driver, DimPolicy::from(&cfg.backlight()))?;

    let user_skin = cfg.user_skin_path();
    let defaults = cfg.defaults_skin_path();
    engine
        .initialize(defaults.as_deref(), &user_skin)
        .context("loading LCD skin")?;
    engine.update_settings(DimPolicy::from(&cfg.backlight()), display.contrast);

    info!(
        "Rendering {} every {}ms",
        user_skin.display(),
        cfg.refresh_ms()
    );

    tokio::select! {
        _ = render_loop(&mut engine, &cfg) => {},
        res = signal_handler() => {
            if let Err(e) = res {
                warn!("signal handling failed: {}", e);
            }
        },
    }

    engine.shutdown();
    info!("Display cleared, bye");
    Ok(())
}
