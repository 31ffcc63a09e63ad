/*
 *  display/drivers/mock.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display driver for testing without hardware
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

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::error::DisplayError;
use crate::display::traits::{LcdCapabilities, LcdDriver, LineContent, PlayState, progress_pixels};
use crate::display::LcdMode;
use crate::extraicons::ExtraIcon;
use crate::skin::{LineDescriptor, SkinOptions};

/// One recorded `set_line` call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLine {
    pub mode: LcdMode,
    pub row: u32,
    pub content: LineContent,
    pub descriptor: LineDescriptor,
    pub force: bool,
}

/// Mock display driver for testing
///
/// Records every call the engine makes so tests can check what a real
/// display would have been told. Clones share the recorded state.
#[derive(Debug, Clone)]
pub struct MockDriver {
    /// Display capabilities
    capabilities: LcdCapabilities,

    /// Shared state for testing
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Clone, Default)]
pub struct MockDriverState {
    /// Lines queued since the last flush
    pub pending: Vec<RecordedLine>,

    /// Lines committed by the last flush
    pub last_frame: Vec<RecordedLine>,

    /// Force flag of the last queued line
    pub last_force: bool,

    /// Number of times flush_lines() was called
    pub flush_count: usize,

    /// Every backlight level set, in order
    pub backlight_history: Vec<u8>,

    pub last_contrast: Option<u8>,
    pub big_digits: Option<String>,

    /// Every set_progress_bar() call as (percent, end pixels)
    pub progress_calls: Vec<(f64, Option<u32>)>,

    pub play_states: Vec<PlayState>,

    /// Icon states as last set
    pub icons: BTreeMap<ExtraIcon, bool>,

    /// Every set_extra_icon() call, in order
    pub icon_calls: Vec<(ExtraIcon, bool)>,

    pub bars: BTreeMap<usize, f64>,

    pub skin_options: Option<SkinOptions>,

    pub stopped: bool,
    pub suspended: bool,

    /// Simulate failures (for error testing)
    pub simulate_line_failure: bool,
}

impl MockDriverState {
    /// Text of every line in the last frame, bars as `p<pixels>`
    pub fn frame_text(&self) -> Vec<String> {
        self.last_frame
            .iter()
            .map(|line| match &line.content {
                LineContent::Text(text) => text.clone(),
                LineContent::ProgressBar { pixels } => format!("p{}", pixels),
            })
            .collect()
    }

    pub fn icon(&self, icon: ExtraIcon) -> bool {
        self.icons.get(&icon).copied().unwrap_or(false)
    }
}

impl MockDriver {
    /// Create a mock character display
    pub fn new(columns: u32, rows: u32) -> Self {
        let capabilities = LcdCapabilities {
            columns,
            rows,
            ..Default::default()
        };
        Self::with_capabilities(capabilities)
    }

    /// Mock display with an auxiliary icon panel
    pub fn with_extra_icons(columns: u32, rows: u32) -> Self {
        let capabilities = LcdCapabilities {
            columns,
            rows,
            supports_extra_icons: true,
            ..Default::default()
        };
        Self::with_capabilities(capabilities)
    }

    pub fn with_capabilities(capabilities: LcdCapabilities) -> Self {
        Self {
            capabilities,
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the recorded state
    pub fn snapshot(&self) -> MockDriverState {
        self.lock().clone()
    }

    /// Reset recorded state (useful between test steps)
    pub fn reset_state(&self) {
        *self.lock() = MockDriverState::default();
    }

    // a panicking test thread must not hide the recorded state
    fn lock(&self) -> MutexGuard<'_, MockDriverState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LcdDriver for MockDriver {
    fn capabilities(&self) -> &LcdCapabilities {
        &self.capabilities
    }

    fn is_connected(&self) -> bool {
        !self.lock().stopped
    }

    fn stop(&mut self) -> Result<(), DisplayError> {
        self.lock().stopped = true;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), DisplayError> {
        self.lock().suspended = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), DisplayError> {
        self.lock().suspended = false;
        Ok(())
    }

    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError> {
        self.lock().backlight_history.push(level);
        Ok(())
    }

    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        self.lock().last_contrast = Some(level);
        Ok(())
    }

    fn set_big_digits(&mut self, time: &str, _force: bool) -> Result<(), DisplayError> {
        self.lock().big_digits = Some(time.to_string());
        Ok(())
    }

    fn clear_line(&mut self, row: u32) -> Result<(), DisplayError> {
        let mut state = self.lock();
        state.pending.retain(|line| line.row != row);
        Ok(())
    }

    fn set_line(
        &mut self,
        mode: LcdMode,
        row: u32,
        content: &LineContent,
        descriptor: &LineDescriptor,
        force: bool,
    ) -> Result<(), DisplayError> {
        let mut state = self.lock();

        if state.simulate_line_failure {
            return Err(DisplayError::Other("Simulated line failure".to_string()));
        }
        if row >= self.capabilities.rows {
            return Err(DisplayError::RowOutOfRange { row, rows: self.capabilities.rows });
        }

        state.last_force = force;
        state.pending.push(RecordedLine {
            mode,
            row,
            content: content.clone(),
            descriptor: descriptor.clone(),
            force,
        });
        Ok(())
    }

    fn clear_display(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        state.pending.clear();
        state.last_frame.clear();
        Ok(())
    }

    fn flush_lines(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        state.last_frame = std::mem::take(&mut state.pending);
        state.flush_count += 1;
        Ok(())
    }

    fn set_playing_state_icon(&mut self, play_state: PlayState) -> Result<(), DisplayError> {
        self.lock().play_states.push(play_state);
        Ok(())
    }

    fn set_progress_bar(&mut self, percent: f64, end_pixels: Option<u32>) -> u32 {
        self.lock().progress_calls.push((percent, end_pixels));
        progress_pixels(percent, end_pixels)
    }

    fn apply_skin_options(&mut self, options: &SkinOptions) {
        self.lock().skin_options = Some(options.clone());
    }

    fn set_extra_icon(&mut self, icon: ExtraIcon, on: bool) -> Result<(), DisplayError> {
        if !self.capabilities.supports_extra_icons {
            return Err(DisplayError::UnsupportedOperation);
        }
        let mut state = self.lock();
        state.icons.insert(icon, on);
        state.icon_calls.push((icon, on));
        Ok(())
    }

    fn set_extra_bar(&mut self, bar: usize, percent: f64) -> Result<(), DisplayError> {
        if !self.capabilities.supports_extra_icons {
            return Err(DisplayError::UnsupportedOperation);
        }
        self.lock().bars.insert(bar, percent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new(20, 4);
        assert_eq!(driver.columns(), 20);
        assert_eq!(driver.rows(), 4);
        assert!(driver.is_connected());
        assert!(!driver.capabilities().supports_extra_icons);
    }

    #[test]
    fn test_lines_are_committed_on_flush() {
        let mut driver = MockDriver::new(16, 2);
        let blank = LineDescriptor::blank(16);

        driver
            .set_line(LcdMode::General, 0, &LineContent::Text("hi".into()), &blank, false)
            .unwrap();
        assert!(driver.snapshot().last_frame.is_empty());

        driver.flush_lines().unwrap();
        let state = driver.snapshot();
        assert_eq!(state.frame_text(), vec!["hi"]);
        assert!(state.pending.is_empty());
        assert_eq!(state.flush_count, 1);

        driver.reset_state();
        assert_eq!(driver.snapshot().flush_count, 0);
    }

    #[test]
    fn test_row_out_of_range() {
        let mut driver = MockDriver::new(16, 2);
        let blank = LineDescriptor::blank(16);
        assert!(driver
            .set_line(LcdMode::General, 2, &LineContent::empty(), &blank, false)
            .is_err());
    }

    #[test]
    fn test_icons_need_panel() {
        let mut plain = MockDriver::new(16, 2);
        assert!(matches!(
            plain.set_extra_icon(ExtraIcon::Mute, true),
            Err(DisplayError::UnsupportedOperation)
        ));

        let mut panel = MockDriver::with_extra_icons(16, 2);
        panel.set_extra_icon(ExtraIcon::Mute, true).unwrap();
        assert!(panel.snapshot().icon(ExtraIcon::Mute));
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new(16, 2);
        let blank = LineDescriptor::blank(16);

        driver.state().lock().unwrap().simulate_line_failure = true;
        assert!(driver
            .set_line(LcdMode::General, 0, &LineContent::empty(), &blank, false)
            .is_err());

        driver.state().lock().unwrap().simulate_line_failure = false;
        assert!(driver
            .set_line(LcdMode::General, 0, &LineContent::empty(), &blank, false)
            .is_ok());
    }
}
