/*
 *  display/error.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the display subsystem
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

use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Failure of a single LCD device call.
///
/// The engine logs these and carries on with the frame; none of them is
/// retried.
#[derive(Debug)]
pub enum DisplayError {
    /// Device went away (socket closed, cable pulled)
    NotConnected,
    /// Geometry or settings the device cannot work with
    InvalidConfiguration(String),
    /// Icon panel or bar calls on a display without one
    UnsupportedOperation,
    RowOutOfRange { row: u32, rows: u32 },
    /// Writing the frame out failed
    Io(std::io::Error),
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::NotConnected => f.write_str("LCD not connected"),
            DisplayError::InvalidConfiguration(msg) => write!(f, "LCD misconfigured: {}", msg),
            DisplayError::UnsupportedOperation => f.write_str("no icon panel on this LCD"),
            DisplayError::RowOutOfRange { row, rows } => {
                write!(f, "row {} past the last LCD row ({} rows)", row, rows)
            }
            DisplayError::Io(err) => write!(f, "LCD write failed: {}", err),
            DisplayError::Other(msg) => f.write_str(msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let DisplayError::Io(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}

/// Driver selection failures, fatal at startup
#[derive(Debug, Error)]
pub enum DisplayFactoryError {
    #[error("LCD driver failed to start: {0}")]
    DriverInitFailed(#[from] DisplayError),
    #[error("display config: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_source() {
        let err = DisplayError::from(std::io::Error::other("pipe closed"));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "LCD write failed: pipe closed");
        assert!(DisplayError::NotConnected.source().is_none());
    }

    #[test]
    fn test_factory_error_wraps_driver_error() {
        let err: DisplayFactoryError = DisplayError::RowOutOfRange { row: 4, rows: 4 }.into();
        assert_eq!(
            err.to_string(),
            "LCD driver failed to start: row 4 past the last LCD row (4 rows)"
        );
    }
}
