/*
 *  display/factory.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Factory pattern for display driver selection
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

use crate::config::{
    DisplayConfig, DriverKind, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_COLUMNS,
    DEFAULT_ROWS,
};
use crate::display::drivers::console::ConsoleDriver;
use crate::display::drivers::null::NullDriver;
use crate::display::error::DisplayFactoryError;
use crate::display::traits::{LcdCapabilities, LcdDriver};
use log::info;

/// Type alias for boxed display driver trait objects
pub type BoxedDriver = Box<dyn LcdDriver>;

/// Factory for creating display drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Create a display driver from configuration
    ///
    /// Unset geometry falls back to a 20x4 display with 5x8 cells, an
    /// unset driver to the console.
    pub fn create_from_config(config: &DisplayConfig) -> Result<BoxedDriver, DisplayFactoryError> {
        Self::validate_config(config)?;

        let capabilities = Self::capabilities(config);
        let driver_kind = config.driver();
        info!(
            "Creating {:?} display {}x{}",
            driver_kind, capabilities.columns, capabilities.rows
        );

        let driver: BoxedDriver = match driver_kind {
            DriverKind::Console => Box::new(ConsoleDriver::new(LcdCapabilities {
                supports_extra_icons: true,
                ..capabilities
            })?),
            DriverKind::Headless => Box::new(NullDriver::new(capabilities)),
        };
        Ok(driver)
    }

    /// Geometry from the configuration, defaults for anything unset
    pub fn capabilities(config: &DisplayConfig) -> LcdCapabilities {
        LcdCapabilities {
            columns: config.columns.unwrap_or(DEFAULT_COLUMNS),
            rows: config.rows.unwrap_or(DEFAULT_ROWS),
            cell_width: config.cell_width.unwrap_or(DEFAULT_CELL_WIDTH),
            cell_height: config.cell_height.unwrap_or(DEFAULT_CELL_HEIGHT),
            ..Default::default()
        }
    }

    /// Validate a configuration without creating a driver
    pub fn validate_config(config: &DisplayConfig) -> Result<(), DisplayFactoryError> {
        let capabilities = Self::capabilities(config);
        if capabilities.columns == 0 || capabilities.rows == 0 {
            return Err(DisplayFactoryError::ConfigError(format!(
                "display size {}x{} is not usable",
                capabilities.columns, capabilities.rows
            )));
        }
        if capabilities.cell_width == 0 || capabilities.cell_height == 0 {
            return Err(DisplayFactoryError::ConfigError(
                "display cell size must be > 0".to_string(),
            ));
        }
        if let Some(contrast) = config.contrast {
            if contrast > 100 {
                return Err(DisplayFactoryError::ConfigError(format!(
                    "Invalid contrast: {} (must be 0-100)",
                    contrast
                )));
            }
        }
        Ok(())
    }
}
