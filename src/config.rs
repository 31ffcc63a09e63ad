use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::{config_dir, home_dir};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

pub const DEFAULT_REFRESH_MS: u64 = 100;
pub const DEFAULT_COLUMNS: u32 = 20;
pub const DEFAULT_ROWS: u32 = 4;
pub const DEFAULT_CELL_WIDTH: u32 = 5;
pub const DEFAULT_CELL_HEIGHT: u32 = 8;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub refresh_ms: Option<u64>,       // render tick period
    pub display: Option<DisplayConfig>,
    pub skin: Option<SkinConfig>,
    pub backlight: Option<BacklightConfig>,
    /// player state snapshot (YAML) polled every tick
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub driver: Option<DriverKind>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub cell_width: Option<u32>,    // pixels, bar resolution
    pub cell_height: Option<u32>,
    pub contrast: Option<u8>,       // 0-100
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkinConfig {
    /// user editable skin, created from the defaults when missing
    pub user: Option<PathBuf>,
    /// default skin, the bundled copy is used when unset or missing
    pub defaults: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BacklightConfig {
    pub dim_on_screensaver: Option<bool>,
    pub dim_on_music: Option<bool>,
    pub dim_on_video: Option<bool>,
    pub dim_delay_secs: Option<u64>,
    pub dim_on_shutdown: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Console,
    Headless, // no output at all
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "LyLCD", about = "LyLCD character display renderer", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub refresh_ms: Option<u64>,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    #[arg(long)]
    pub columns: Option<u32>,
    #[arg(long)]
    pub rows: Option<u32>,
    /// user skin file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub skin: Option<PathBuf>,
    /// player state snapshot file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub state: Option<PathBuf>,
    /// shorthand for --log-level debug
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn refresh_ms(&self) -> u64 {
        self.refresh_ms.unwrap_or(DEFAULT_REFRESH_MS)
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    pub fn backlight(&self) -> BacklightConfig {
        self.backlight.clone().unwrap_or_default()
    }

    /// ~/.config/lylcd/LCD.xml unless configured
    pub fn user_skin_path(&self) -> PathBuf {
        self.skin
            .as_ref()
            .and_then(|s| s.user.clone())
            .or_else(|| config_dir().map(|dir| dir.join("lylcd").join("LCD.xml")))
            .unwrap_or_else(|| PathBuf::from("LCD.xml"))
    }

    pub fn defaults_skin_path(&self) -> Option<PathBuf> {
        self.skin.as_ref().and_then(|s| s.defaults.clone())
    }
}

impl DisplayConfig {
    pub fn driver(&self) -> DriverKind {
        self.driver.unwrap_or(DriverKind::Console)
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and CLI overrides, then validate
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/lylcd/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/lylcd/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/lylcd.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["lylcd.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.refresh_ms.is_some()     { dst.refresh_ms = src.refresh_ms; }
    if src.state_file.is_some()     { dst.state_file = src.state_file; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    // skin
    match (&mut dst.skin, src.skin) {
        (None, Some(c)) => dst.skin = Some(c),
        (Some(d), Some(s)) => {
            if s.user.is_some()      { d.user = s.user; }
            if s.defaults.is_some()  { d.defaults = s.defaults; }
        }
        _ => {}
    }
    // backlight
    match (&mut dst.backlight, src.backlight) {
        (None, Some(c)) => dst.backlight = Some(c),
        (Some(d), Some(s)) => merge_backlight(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.driver.is_some()       { dst.driver = src.driver; }
    if src.columns.is_some()      { dst.columns = src.columns; }
    if src.rows.is_some()         { dst.rows = src.rows; }
    if src.cell_width.is_some()   { dst.cell_width = src.cell_width; }
    if src.cell_height.is_some()  { dst.cell_height = src.cell_height; }
    if src.contrast.is_some()     { dst.contrast = src.contrast; }
}

fn merge_backlight(dst: &mut BacklightConfig, src: BacklightConfig) {
    if src.dim_on_screensaver.is_some()  { dst.dim_on_screensaver = src.dim_on_screensaver; }
    if src.dim_on_music.is_some()        { dst.dim_on_music = src.dim_on_music; }
    if src.dim_on_video.is_some()        { dst.dim_on_video = src.dim_on_video; }
    if src.dim_delay_secs.is_some()      { dst.dim_delay_secs = src.dim_delay_secs; }
    if src.dim_on_shutdown.is_some()     { dst.dim_on_shutdown = src.dim_on_shutdown; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                     { cfg.log_level = Some("debug".into()); }
    if cli.refresh_ms.is_some()      { cfg.refresh_ms = cli.refresh_ms; }
    if cli.state.is_some()           { cfg.state_file = cli.state.clone(); }

    let any_display = cli.driver.is_some() || cli.columns.is_some() || cli.rows.is_some();
    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.driver.is_some()   { display.driver = cli.driver; }
        if cli.columns.is_some()  { display.columns = cli.columns; }
        if cli.rows.is_some()     { display.rows = cli.rows; }
    }

    if let Some(skin) = cli.skin.as_ref() {
        cfg.skin.get_or_insert_with(SkinConfig::default).user = Some(skin.clone());
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.refresh_ms == Some(0) {
        return Err(ConfigError::Validation("refresh_ms must be > 0".into()));
    }
    if let Some(display) = cfg.display.as_ref() {
        let sizes = [
            ("columns", display.columns),
            ("rows", display.rows),
            ("cell_width", display.cell_width),
            ("cell_height", display.cell_height),
        ];
        for (name, value) in sizes {
            if value == Some(0) {
                return Err(ConfigError::Validation(format!("display {name} must be > 0")));
            }
        }
        if let Some(c) = display.contrast {
            if c > 100 {
                return Err(ConfigError::Validation("display contrast must be 0..=100".into()));
            }
        }
    }
    Ok(())
}
