/*
 *  tests/engine_render.rs
 *
 *  Integration tests for frame rendering
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use lylcd::backlight::{BACKLIGHT_OFF, BACKLIGHT_ON};
use lylcd::display::drivers::mock::MockDriver;
use lylcd::display::PlayState;
use lylcd::extraicons::ExtraIcon;
use lylcd::skin::LineType;
use lylcd::{DimPolicy, InfoSnapshot, LcdEngine, LcdMode, Notifier};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("lylcd-{}-{}-{}.xml", name, std::process::id(), nanos))
}

/// Engine running the bundled skin
fn bundled_engine(driver: &MockDriver, policy: DimPolicy) -> LcdEngine {
    let user = temp_path("user");
    let mut engine = LcdEngine::new(Box::new(driver.clone()), policy).unwrap();
    engine.initialize(None, &user).unwrap();
    let _ = std::fs::remove_file(&user);
    engine
}

/// Engine running a skin written from `xml`
fn skin_engine(driver: &MockDriver, xml: &str) -> LcdEngine {
    let user = temp_path("skin");
    std::fs::write(&user, xml).unwrap();
    let mut engine = LcdEngine::new(Box::new(driver.clone()), DimPolicy::default()).unwrap();
    engine.initialize(None, &user).unwrap();
    let _ = std::fs::remove_file(&user);
    engine
}

fn music() -> InfoSnapshot {
    InfoSnapshot { playing: true, audio: true, progress: 0.5, ..Default::default() }
        .with_label("Player.Time", "1:23")
        .with_label("Player.Duration", "4:56")
        .with_label("MusicPlayer.Title", "Title")
        .with_label("MusicPlayer.Artist", "Artist")
}

struct CountingNotifier(Arc<AtomicUsize>);

impl Notifier for CountingNotifier {
    fn notify(&self, _message: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

const SPARSE_SKIN: &str = r#"<lcd>
  <allowemptylines>off</allowemptylines>
  <general>
    <line>$INFO[Test.A]</line>
    <line>$INFO[Test.B]</line>
    <line>$INFO[Test.C]</line>
  </general>
</lcd>"#;

#[test]
fn test_empty_lines_are_skipped_and_padded() {
    let driver = MockDriver::new(16, 4);
    let mut engine = skin_engine(&driver, SPARSE_SKIN);
    let info = InfoSnapshot::default().with_label("Test.A", "a").with_label("Test.C", "c");
    engine.render(&info, false);

    let state = driver.snapshot();
    assert_eq!(state.frame_text(), vec!["a", "c", "", ""]);
    let rows: Vec<u32> = state.last_frame.iter().map(|l| l.row).collect();
    assert_eq!(rows, vec![0, 1, 2, 3]);
}

#[test]
fn test_empty_lines_kept_when_allowed() {
    let driver = MockDriver::new(16, 4);
    let xml = SPARSE_SKIN.replace("<allowemptylines>off", "<allowemptylines>on");
    let mut engine = skin_engine(&driver, &xml);
    let info = InfoSnapshot::default().with_label("Test.A", "a").with_label("Test.C", "c");
    engine.render(&info, false);

    assert_eq!(driver.snapshot().frame_text(), vec!["a", "", "c", ""]);
}

#[test]
fn test_music_frame_with_progress_bar() {
    let driver = MockDriver::new(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());
    engine.render(&music(), false);

    let state = driver.snapshot();
    assert_eq!(engine.current_mode(), LcdMode::Music);
    assert_eq!(state.frame_text(), vec!["1:23/4:56", "Title", "Artist", "p50"]);
    assert_eq!(state.play_states, vec![PlayState::Playing]);
    // text rows release the bar, the bar row spans all 20 cells
    assert!(state.progress_calls.contains(&(0.0, None)));
    assert!(state.progress_calls.contains(&(0.5, Some(100))));
}

#[test]
fn test_progress_bar_inside_surroundings() {
    let driver = MockDriver::new(20, 2);
    let xml = r#"<lcd>
  <progressbarsurroundings>on</progressbarsurroundings>
  <music><line>$INFO[LCD.ProgressBar]</line></music>
</lcd>"#;
    let mut engine = skin_engine(&driver, xml);
    engine.render(&music(), false);

    let state = driver.snapshot();
    assert_eq!(state.frame_text(), vec!["p45", ""]);
    assert_eq!(state.last_frame[0].descriptor.startx, 2);
}

#[test]
fn test_big_screen_skips_padding() {
    let driver = MockDriver::new(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());
    let info = InfoSnapshot { screensaver_active: true, ..Default::default() }
        .with_label("System.Time", "12:34");
    engine.render(&info, false);

    let state = driver.snapshot();
    assert_eq!(engine.current_mode(), LcdMode::Screensaver);
    assert_eq!(state.last_frame.len(), 1);
    assert_eq!(state.last_frame[0].descriptor.line_type, LineType::BigScreen);
    assert_eq!(state.frame_text(), vec!["12:34"]);
}

#[test]
fn test_mode_priority() {
    let driver = MockDriver::new(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());

    let cases = [
        (InfoSnapshot { navigation_active: true, playing: true, audio: true, ..Default::default() }, LcdMode::Navigation),
        (InfoSnapshot { screensaver_active: true, playing: true, video: true, ..Default::default() }, LcdMode::Screensaver),
        (InfoSnapshot { playing: true, video: true, live_tv: true, ..Default::default() }, LcdMode::PvrTv),
        (InfoSnapshot { playing: true, video: true, tvshow: true, ..Default::default() }, LcdMode::TvShow),
        (InfoSnapshot { playing: true, video: true, ..Default::default() }, LcdMode::Video),
        (InfoSnapshot::default(), LcdMode::General),
    ];
    for (info, expected) in cases {
        engine.render(&info, false);
        assert_eq!(engine.current_mode(), expected);
    }
}

#[test]
fn test_backlight_dims_after_delay() {
    let driver = MockDriver::new(20, 4);
    let policy = DimPolicy { on_music: true, delay: Duration::from_secs(5), ..Default::default() };
    let mut engine = bundled_engine(&driver, policy);
    let start = Instant::now();

    engine.render_at(&music(), false, start);
    assert!(!engine.is_dimmed());

    engine.render_at(&music(), false, start + Duration::from_secs(6));
    assert!(engine.is_dimmed());

    // pausing music brings the light back
    let paused = InfoSnapshot { paused: true, ..music() };
    engine.render_at(&paused, false, start + Duration::from_secs(7));
    assert!(!engine.is_dimmed());

    assert_eq!(driver.snapshot().backlight_history, vec![BACKLIGHT_ON, BACKLIGHT_OFF, BACKLIGHT_ON]);
}

#[test]
fn test_skin_warning_shown_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let driver = MockDriver::new(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default())
        .with_notifier(Box::new(CountingNotifier(Arc::clone(&count))));

    let broken = temp_path("broken");
    std::fs::write(&broken, "<lcd><general>").unwrap();
    assert!(!engine.load_skin(&broken, false));
    assert!(!engine.load_skin(&broken, false));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // a good load re-arms the warning
    let good = temp_path("good");
    std::fs::write(&good, SPARSE_SKIN).unwrap();
    assert!(engine.load_skin(&good, false));
    assert!(!engine.load_skin(&broken, false));
    assert_eq!(count.load(Ordering::SeqCst), 2);

    let _ = std::fs::remove_file(&broken);
    let _ = std::fs::remove_file(&good);
}

#[test]
fn test_icon_panel_receives_changes_only() {
    let driver = MockDriver::with_extra_icons(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());
    let info = InfoSnapshot { muted: true, progress: 0.25, ..music() };

    engine.render(&info, false);
    let first = driver.snapshot();
    assert!(first.icon(ExtraIcon::Playing));
    assert!(first.icon(ExtraIcon::Mute));
    assert!(!first.icon(ExtraIcon::Pause));
    assert_eq!(first.bars.get(&1), Some(&25.0));
    let sent = first.icon_calls.len();
    assert!(sent > 0);

    engine.render(&info, false);
    assert_eq!(driver.snapshot().icon_calls.len(), sent);

    // forced frames resend the whole panel
    engine.render(&info, true);
    assert_eq!(driver.snapshot().icon_calls.len(), sent * 2);
}

#[test]
fn test_plain_display_gets_no_icons() {
    let driver = MockDriver::new(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());
    engine.render(&InfoSnapshot { muted: true, ..music() }, false);

    let state = driver.snapshot();
    assert!(state.icon_calls.is_empty());
    assert!(state.bars.is_empty());
}

#[test]
fn test_settings_update_forces_refresh() {
    let driver = MockDriver::new(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());
    engine.render(&music(), false);
    engine.render(&music(), false);
    assert!(!driver.snapshot().last_force);

    engine.update_settings(DimPolicy::default(), Some(60));
    engine.render(&music(), false);
    let state = driver.snapshot();
    assert!(state.last_force);
    assert_eq!(state.last_contrast, Some(60));
}

#[test]
fn test_failing_lines_do_not_abort_frame() {
    let driver = MockDriver::with_extra_icons(20, 4);
    let mut engine = bundled_engine(&driver, DimPolicy::default());
    driver.state().lock().unwrap().simulate_line_failure = true;

    engine.render(&InfoSnapshot { muted: true, ..music() }, false);

    let state = driver.snapshot();
    assert_eq!(state.flush_count, 1);
    assert!(state.last_frame.is_empty());
    assert!(state.icon(ExtraIcon::Playing));
    assert!(state.icon(ExtraIcon::Mute));
    assert_eq!(state.bars.get(&1), Some(&50.0));
}
