/*
 *  lib.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Skin driven character LCD rendering
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

pub mod backlight;
pub mod config;
pub mod display;
pub mod engine;
pub mod extraicons;
pub mod info;
pub mod markup;
pub mod overlay;
pub mod skin;

pub use backlight::{BacklightDimmer, DimPolicy};
pub use display::{DisplayDriverFactory, LcdDriver, LcdMode};
pub use engine::{EngineError, LcdEngine, LogNotifier, Notifier};
pub use info::{InfoSnapshot, InfoSource};
