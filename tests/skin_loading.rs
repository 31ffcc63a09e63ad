/*
 *  tests/skin_loading.rs
 *
 *  Integration tests for skin bootstrap, user skin creation and fallbacks
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use lylcd::display::drivers::mock::MockDriver;
use lylcd::skin::BUNDLED_SKIN;
use lylcd::{DimPolicy, EngineError, InfoSnapshot, LcdEngine, Notifier};

/// Fresh scratch directory, not created yet
fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("lylcd-{}-{}-{}", name, std::process::id(), nanos))
}

fn general_skin(text: &str) -> String {
    format!("<lcd><general><line>{}</line></general></lcd>", text)
}

struct CountingNotifier(Arc<AtomicUsize>);

impl Notifier for CountingNotifier {
    fn notify(&self, _message: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn engine(driver: &MockDriver) -> (LcdEngine, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let engine = LcdEngine::new(Box::new(driver.clone()), DimPolicy::default())
        .unwrap()
        .with_notifier(Box::new(CountingNotifier(Arc::clone(&count))));
    (engine, count)
}

#[test]
fn test_user_skin_created_from_defaults() {
    let dir = scratch_dir("create");
    std::fs::create_dir_all(&dir).unwrap();
    let defaults = dir.join("LCD.xml.defaults");
    std::fs::write(&defaults, general_skin("from defaults")).unwrap();
    let user = dir.join("profile").join("LCD.xml");

    let driver = MockDriver::new(20, 2);
    let (mut engine, count) = engine(&driver);
    engine.initialize(Some(&defaults), &user).unwrap();

    assert_eq!(std::fs::read_to_string(&user).unwrap(), general_skin("from defaults"));
    engine.render(&InfoSnapshot::default(), false);
    assert_eq!(driver.snapshot().frame_text(), vec!["from defaults", ""]);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_defaults_seed_from_bundled_skin() {
    let dir = scratch_dir("bundled");
    let user = dir.join("LCD.xml");

    let driver = MockDriver::new(20, 4);
    let (mut engine, _) = engine(&driver);
    engine.initialize(Some(&dir.join("nope.xml")), &user).unwrap();

    assert_eq!(std::fs::read_to_string(&user).unwrap(), BUNDLED_SKIN);
    assert_eq!(engine.skin().options.scroll_separator, " * ");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_broken_user_skin_keeps_defaults() {
    let dir = scratch_dir("broken");
    std::fs::create_dir_all(&dir).unwrap();
    let defaults = dir.join("defaults.xml");
    let user = dir.join("LCD.xml");
    std::fs::write(&defaults, general_skin("defaults")).unwrap();
    std::fs::write(&user, "<lcd><general><line>half").unwrap();

    let driver = MockDriver::new(20, 2);
    let (mut engine, count) = engine(&driver);
    engine.initialize(Some(&defaults), &user).unwrap();

    engine.render(&InfoSnapshot::default(), false);
    assert_eq!(driver.snapshot().frame_text(), vec!["defaults", ""]);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_no_usable_skin() {
    let dir = scratch_dir("unusable");
    std::fs::create_dir_all(&dir).unwrap();
    let defaults = dir.join("defaults.xml");
    let user = dir.join("LCD.xml");
    std::fs::write(&defaults, "<lcd>").unwrap();
    std::fs::write(&user, "<skin/>").unwrap();

    let driver = MockDriver::new(20, 2);
    let (mut engine, count) = engine(&driver);
    let result = engine.initialize(Some(&defaults), &user);

    assert!(matches!(result, Err(EngineError::NoUsableSkin)));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_reload_replaces_skin_and_options() {
    let dir = scratch_dir("reload");
    std::fs::create_dir_all(&dir).unwrap();
    let user = dir.join("LCD.xml");
    std::fs::write(&user, general_skin("first")).unwrap();

    let driver = MockDriver::new(20, 2);
    let (mut engine, _) = engine(&driver);
    engine.initialize(None, &user).unwrap();
    engine.render(&InfoSnapshot::default(), false);
    assert_eq!(driver.snapshot().frame_text(), vec!["first", ""]);

    std::fs::write(
        &user,
        "<lcd><scrollseparator>~</scrollseparator><general><line>second</line></general></lcd>",
    )
    .unwrap();
    assert!(engine.load_skin(&user, false));
    engine.render(&InfoSnapshot::default(), false);

    let state = driver.snapshot();
    assert_eq!(state.frame_text(), vec!["second", ""]);
    assert!(state.last_force);
    let options = state.skin_options.unwrap();
    assert_eq!(options.scroll_separator, " ~ ");

    let _ = std::fs::remove_dir_all(&dir);
}
