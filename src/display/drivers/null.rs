/*
 *  display/drivers/null.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Null display - accepts everything, shows nothing
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

use log::debug;

use crate::display::error::DisplayError;
use crate::display::traits::{LcdCapabilities, LcdDriver, LineContent, PlayState};
use crate::display::LcdMode;
use crate::skin::LineDescriptor;

/// Headless display for running the engine without any output
pub struct NullDriver {
    capabilities: LcdCapabilities,
    connected: bool,
}

impl NullDriver {
    pub fn new(capabilities: LcdCapabilities) -> Self {
        debug!("Null LCD {}x{}", capabilities.columns, capabilities.rows);
        Self { capabilities, connected: true }
    }
}

impl LcdDriver for NullDriver {
    fn capabilities(&self) -> &LcdCapabilities {
        &self.capabilities
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn stop(&mut self) -> Result<(), DisplayError> {
        self.connected = false;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_backlight(&mut self, _level: u8) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_contrast(&mut self, _level: u8) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_big_digits(&mut self, _time: &str, _force: bool) -> Result<(), DisplayError> {
        Ok(())
    }

    fn clear_line(&mut self, _row: u32) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_line(
        &mut self,
        _mode: LcdMode,
        row: u32,
        _content: &LineContent,
        _descriptor: &LineDescriptor,
        _force: bool,
    ) -> Result<(), DisplayError> {
        if row >= self.capabilities.rows {
            return Err(DisplayError::RowOutOfRange { row, rows: self.capabilities.rows });
        }
        Ok(())
    }

    fn clear_display(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn flush_lines(&mut self) -> Result<(), DisplayError> {
        if !self.connected {
            return Err(DisplayError::NotConnected);
        }
        Ok(())
    }

    fn set_playing_state_icon(&mut self, _state: PlayState) -> Result<(), DisplayError> {
        Ok(())
    }
}
