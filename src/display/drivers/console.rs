/*
 *  display/drivers/console.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Console LCD - character grid rendered to a terminal
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

use log::{debug, info};
use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::display::error::DisplayError;
use crate::display::traits::{LcdCapabilities, LcdDriver, LineContent, PlayState};
use crate::display::LcdMode;
use crate::extraicons::ExtraIcon;
use crate::skin::{LineAlign, LineDescriptor, LineType, SkinOptions, EXTRA_BARS_MAX};

/// Frames a too long line stands still before it starts to scroll
const SCROLL_PAUSE_FRAMES: u32 = 8;

const BAR_FULL: char = '#';
const BAR_PARTIAL: char = '=';

// seven segment style, three rows per glyph
const BIG_DIGITS: [[&str; 3]; 10] = [
    [" _ ", "| |", "|_|"],
    ["   ", "  |", "  |"],
    [" _ ", " _|", "|_ "],
    [" _ ", " _|", " _|"],
    ["   ", "|_|", "  |"],
    [" _ ", "|_ ", " _|"],
    [" _ ", "|_ ", "|_|"],
    [" _ ", "  |", "  |"],
    [" _ ", "|_|", "|_|"],
    [" _ ", "|_|", " _|"],
];
const BIG_COLON: [&str; 3] = [" ", ".", "."];
const BIG_ROWS: usize = 3;

/// Horizontal scroll position of one row
#[derive(Debug, Default)]
struct ScrollState {
    text: String,
    offset: usize,
    pause_counter: u32,
}

impl ScrollState {
    /// Visible window of `text`, advancing one character per call once
    /// the pause ran out
    fn window(&mut self, text: &str, separator: &str, width: usize) -> String {
        if self.text != text {
            self.text = text.to_string();
            self.offset = 0;
            self.pause_counter = SCROLL_PAUSE_FRAMES;
        }

        let cycle: Vec<char> = text.chars().chain(separator.chars()).collect();
        if cycle.is_empty() {
            return String::new();
        }

        let visible = cycle.iter().cycle().skip(self.offset).take(width).collect();

        if self.pause_counter > 0 {
            self.pause_counter -= 1;
        } else {
            self.offset = (self.offset + 1) % cycle.len();
            if self.offset == 0 {
                self.pause_counter = SCROLL_PAUSE_FRAMES;
            }
        }
        visible
    }
}

/// Character LCD drawn on a terminal.
///
/// Lines are composed into a grid as they arrive and the grid is written
/// out on flush, only when it differs from what was last written.
pub struct ConsoleDriver {
    capabilities: LcdCapabilities,
    out: Box<dyn Write + Send>,
    grid: Vec<Vec<char>>,
    scroll: Vec<ScrollState>,
    last_written: Option<String>,
    options: SkinOptions,
    play_state: PlayState,
    icons: BTreeSet<ExtraIcon>,
    bars: [f64; EXTRA_BARS_MAX],
    backlight: u8,
    contrast: u8,
    connected: bool,
    suspended: bool,
}

impl ConsoleDriver {
    /// Console display on stdout
    pub fn new(capabilities: LcdCapabilities) -> Result<Self, DisplayError> {
        Self::with_writer(capabilities, Box::new(io::stdout()))
    }

    pub fn with_writer(
        capabilities: LcdCapabilities,
        out: Box<dyn Write + Send>,
    ) -> Result<Self, DisplayError> {
        if capabilities.columns == 0 || capabilities.rows == 0 || capabilities.cell_width == 0 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "console display needs a non zero size, got {}x{} cell width {}",
                capabilities.columns, capabilities.rows, capabilities.cell_width
            )));
        }

        info!(
            "Console LCD {}x{} (cell {}x{})",
            capabilities.columns, capabilities.rows, capabilities.cell_width, capabilities.cell_height
        );

        let rows = capabilities.rows as usize;
        let columns = capabilities.columns as usize;
        Ok(Self {
            capabilities,
            out,
            grid: vec![vec![' '; columns]; rows],
            scroll: (0..rows).map(|_| ScrollState::default()).collect(),
            last_written: None,
            options: SkinOptions::default(),
            play_state: PlayState::Stopped,
            icons: BTreeSet::new(),
            bars: [0.0; EXTRA_BARS_MAX],
            backlight: 1,
            contrast: 100,
            connected: true,
            suspended: false,
        })
    }

    fn columns(&self) -> usize {
        self.capabilities.columns as usize
    }

    fn check_row(&self, row: u32) -> Result<usize, DisplayError> {
        if row >= self.capabilities.rows {
            return Err(DisplayError::RowOutOfRange { row, rows: self.capabilities.rows });
        }
        Ok(row as usize)
    }

    fn play_glyph(&self) -> char {
        match self.play_state {
            PlayState::Playing => '>',
            PlayState::Paused => '"',
            PlayState::Stopped => ' ',
        }
    }

    /// Bar cells from the start column, partial cells drawn lighter
    fn compose_bar(&self, descriptor: &LineDescriptor, pixels: u32) -> Vec<char> {
        let cell_width = self.capabilities.cell_width;
        let cells = (descriptor.endx / cell_width) as usize;
        let full = (pixels / cell_width) as usize;
        let partial = pixels % cell_width > 0;

        let mut bar: Vec<char> = (0..cells)
            .map(|i| {
                if i < full {
                    BAR_FULL
                } else if i == full && partial {
                    BAR_PARTIAL
                } else {
                    self.options.progressbar_blank
                }
            })
            .collect();

        if self.options.progressbar_surroundings {
            bar.insert(0, '[');
            bar.push(']');
        }
        bar
    }

    fn compose_text(&mut self, row: usize, text: &str, descriptor: &LineDescriptor) -> Vec<char> {
        let columns = self.columns();
        let start = (descriptor.startx.max(1) as usize - 1).min(columns);
        let end = (descriptor.endx as usize).clamp(start, columns);
        let width = end - start;

        let len = text.chars().count();
        let visible: String = if len > width {
            self.scroll[row].window(text, &self.options.scroll_separator, width)
        } else {
            self.scroll[row] = ScrollState::default();
            let pad = width - len;
            match descriptor.align {
                LineAlign::Left => text.to_string(),
                LineAlign::Center => format!("{}{}", " ".repeat(pad / 2), text),
                LineAlign::Right => format!("{}{}", " ".repeat(pad), text),
            }
        };

        let mut line = vec![' '; start];
        if descriptor.line_type == LineType::IconText && start > 0 {
            line[0] = self.play_glyph();
        }
        line.extend(visible.chars());
        line
    }

    fn put_row(&mut self, row: usize, chars: Vec<char>) {
        let columns = self.columns();
        let mut cells: Vec<char> = chars.into_iter().take(columns).collect();
        cells.resize(columns, ' ');
        self.grid[row] = cells;
    }

    fn status_line(&self) -> String {
        let icons: Vec<&str> = self.icons.iter().map(|icon| icon.name()).collect();
        let bars: Vec<String> = self.bars.iter().map(|p| format!("{:.0}", p)).collect();
        format!("[{}] bars {} contrast {}", icons.join(" "), bars.join("/"), self.contrast)
    }

    fn render_frame(&self) -> String {
        let columns = self.columns();
        let border = format!("+{}+", "-".repeat(columns));
        let mut frame = String::new();

        frame.push_str(&border);
        if self.backlight == 0 {
            frame.push_str(" dimmed");
        }
        frame.push('\n');
        for row in &self.grid {
            frame.push('|');
            frame.extend(row.iter());
            frame.push_str("|\n");
        }
        frame.push_str(&border);
        frame.push('\n');
        if self.capabilities.supports_extra_icons {
            frame.push_str(&self.status_line());
            frame.push('\n');
        }
        frame
    }
}

impl LcdDriver for ConsoleDriver {
    fn capabilities(&self) -> &LcdCapabilities {
        &self.capabilities
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn stop(&mut self) -> Result<(), DisplayError> {
        if self.connected {
            info!("Console LCD stopped");
            self.out.flush()?;
        }
        self.connected = false;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), DisplayError> {
        self.suspended = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), DisplayError> {
        self.suspended = false;
        self.last_written = None;
        Ok(())
    }

    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError> {
        debug!("Console backlight {}", level);
        self.backlight = level;
        Ok(())
    }

    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        self.contrast = level.min(100);
        Ok(())
    }

    fn set_big_digits(&mut self, time: &str, force: bool) -> Result<(), DisplayError> {
        if force {
            self.last_written = None;
        }

        let rows = self.grid.len();
        if rows < BIG_ROWS {
            // no room for big glyphs
            self.put_row(0, time.chars().collect());
            return Ok(());
        }

        let mut lines = vec![String::new(); BIG_ROWS];
        for c in time.chars() {
            let glyph = match c {
                '0'..='9' => BIG_DIGITS[c as usize - '0' as usize],
                ':' => BIG_COLON,
                _ => continue,
            };
            for (line, part) in lines.iter_mut().zip(glyph) {
                line.push_str(part);
            }
        }

        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let indent = if self.options.center_big_digits {
            self.columns().saturating_sub(width) / 2
        } else {
            0
        };
        for row in 0..rows {
            let mut chars = vec![' '; indent];
            if let Some(line) = lines.get(row) {
                chars.extend(line.chars());
            }
            self.put_row(row, chars);
        }
        Ok(())
    }

    fn clear_line(&mut self, row: u32) -> Result<(), DisplayError> {
        let row = self.check_row(row)?;
        self.put_row(row, Vec::new());
        Ok(())
    }

    fn set_line(
        &mut self,
        _mode: LcdMode,
        row: u32,
        content: &LineContent,
        descriptor: &LineDescriptor,
        force: bool,
    ) -> Result<(), DisplayError> {
        let row = self.check_row(row)?;
        if force {
            self.last_written = None;
        }

        let chars = match (descriptor.line_type, content) {
            (LineType::BigScreen, LineContent::Text(text)) => {
                return self.set_big_digits(text, force);
            }
            (_, LineContent::ProgressBar { pixels }) => self.compose_bar(descriptor, *pixels),
            (_, LineContent::Text(text)) => self.compose_text(row, text, descriptor),
        };
        self.put_row(row, chars);
        Ok(())
    }

    fn clear_display(&mut self) -> Result<(), DisplayError> {
        for row in 0..self.grid.len() {
            self.put_row(row, Vec::new());
        }
        self.last_written = None;
        Ok(())
    }

    fn flush_lines(&mut self) -> Result<(), DisplayError> {
        if !self.connected {
            return Err(DisplayError::NotConnected);
        }
        if self.suspended {
            return Ok(());
        }

        let frame = self.render_frame();
        if self.last_written.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.last_written = Some(frame);
        Ok(())
    }

    fn set_playing_state_icon(&mut self, state: PlayState) -> Result<(), DisplayError> {
        self.play_state = state;
        Ok(())
    }

    fn apply_skin_options(&mut self, options: &SkinOptions) {
        self.options = options.clone();
    }

    fn set_extra_icon(&mut self, icon: ExtraIcon, on: bool) -> Result<(), DisplayError> {
        if on {
            self.icons.insert(icon);
        } else {
            self.icons.remove(&icon);
        }
        Ok(())
    }

    fn set_extra_bar(&mut self, bar: usize, percent: f64) -> Result<(), DisplayError> {
        match bar.checked_sub(1).and_then(|i| self.bars.get_mut(i)) {
            Some(slot) => {
                *slot = percent;
                Ok(())
            }
            None => Err(DisplayError::Other(format!("no extra bar {}", bar))),
        }
    }
}
