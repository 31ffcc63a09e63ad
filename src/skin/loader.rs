/*
 *  skin/loader.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Skin loader - parses LCD.xml into options and mode tables
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

use log::{error, info, warn};
use roxmltree::{Document, Node};
use std::{fs, path::Path};
use thiserror::Error;

use super::{
    ExtraBarRole, LineAlign, LineDescriptor, LineType, ModeTable, Skin, SkinGeometry,
    SkinOptions, EXTRA_BARS_MAX,
};
use crate::display::LcdMode;
use crate::markup::{
    contains_placeholder, Markup, PLACEHOLDER_ALIGN_CENTER, PLACEHOLDER_ALIGN_RIGHT,
    PLACEHOLDER_PLAY_ICON, PLACEHOLDER_PROGRESS_BAR, PLACEHOLDER_PROGRESS_TIME,
};

/// Default skin shipped with the binary
pub const BUNDLED_SKIN: &str = include_str!("../../resources/LCD.xml.defaults");

/// Label the big digit clock resolves each frame
const BIG_SCREEN_LABEL: &str = "$INFO[System.Time]";

/// Error type for skin loading.
#[derive(Debug, Error)]
pub enum SkinError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("no <lcd> element in skin document")]
    MissingRoot,
}

/// Builds a `Skin` from a skin document
pub struct SkinLoader<'a> {
    markup: &'a Markup,
    geometry: SkinGeometry,
}

impl<'a> SkinLoader<'a> {
    pub fn new(markup: &'a Markup, geometry: SkinGeometry) -> Self {
        Self { markup, geometry }
    }

    pub fn load_file(&self, path: &Path) -> Result<Skin, SkinError> {
        info!("Loading skin from {}", path.display());
        let xml = fs::read_to_string(path)?;
        self.parse(&xml)
    }

    /// Parse a whole skin.
    ///
    /// Options start from their defaults and are overridden one by one, so a
    /// partial document still loads; every mode is rebuilt.
    pub fn parse(&self, xml: &str) -> Result<Skin, SkinError> {
        let doc = Document::parse(xml)?;
        let root = doc
            .descendants()
            .find(|n| n.has_tag_name("lcd"))
            .ok_or(SkinError::MissingRoot)?;

        let options = self.parse_options(root);
        let mut modes = ModeTable::blank(self.geometry.columns);
        for mode in LcdMode::ALL {
            let lines = self.load_mode(child(root, mode.skin_tag()), mode, &options);
            modes.set(mode, lines, self.geometry.columns);
        }

        Ok(Skin { options, modes })
    }

    fn parse_options(&self, root: Node) -> SkinOptions {
        let mut options = SkinOptions::default();

        if let Some(separator) = child_text(root, "scrollseparator") {
            if !separator.trim().is_empty() {
                options.scroll_separator = format!(" {} ", separator);
            }
        }

        options.progressbar_surroundings = child_flag(root, "progressbarsurroundings");

        if let Some(blank) = child_text(root, "progressbarblank").and_then(|t| t.chars().next()) {
            options.progressbar_blank = blank;
        }

        if let Some(offset) = child_text(root, "icontextoffset") {
            if let Some(offset) = self.parse_icon_text_offset(offset) {
                options.icon_text_offset = offset;
            }
        }

        options.allow_empty_lines = child_flag(root, "allowemptylines");
        options.center_big_digits = child_flag(root, "centerbigdigits");
        options.disable_play_indicator_on_pause = child_flag(root, "disableplayindicatoronpause");

        for i in 0..EXTRA_BARS_MAX {
            if let Some(role) = child_text(root, &format!("extrabar{}", i + 1)) {
                options.extra_bars[i] = ExtraBarRole::from_skin(role);
            }
        }

        options
    }

    // must be 0 < offset < columns
    fn parse_icon_text_offset(&self, value: &str) -> Option<u32> {
        let offset: i64 = match value.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                error!("Value for icontextoffset must be integer (got: {})", value);
                return None;
            }
        };

        if offset <= 0 || offset >= self.geometry.columns as i64 {
            error!("Value {} for icontextoffset out of range, ignoring", offset);
            return None;
        }
        if offset < 2 {
            warn!("Value {} for icontextoffset smaller than the icon width", offset);
        }
        Some(offset as u32)
    }

    /// Build the line list of one mode.
    ///
    /// A missing node or a node without lines yields a single blank line.
    /// A clock placeholder replaces the whole mode with one big screen line.
    pub fn load_mode(&self, node: Option<Node>, mode: LcdMode, options: &SkinOptions) -> Vec<LineDescriptor> {
        let columns = self.geometry.columns;
        let blank = || vec![LineDescriptor::blank(columns)];

        let Some(node) = node else {
            warn!("Empty mode {:?}, consider checking LCD.xml", mode);
            return blank();
        };

        let line_nodes: Vec<Node> = node.children().filter(|n| n.has_tag_name("line")).collect();
        if line_nodes.is_empty() {
            warn!("Mode {:?} defined without lines, consider checking LCD.xml", mode);
            return blank();
        }

        let mut lines = Vec::with_capacity(line_nodes.len());
        for line_node in line_nodes {
            let text = line_node.text().unwrap_or("").trim();

            if !text.is_empty() && self.markup.is_clock_placeholder(text) {
                return vec![LineDescriptor {
                    line_type: LineType::BigScreen,
                    text: BIG_SCREEN_LABEL.to_string(),
                    ..LineDescriptor::blank(columns)
                }];
            }

            lines.push(self.load_line(text, options));
        }

        lines
    }

    fn load_line(&self, text: &str, options: &SkinOptions) -> LineDescriptor {
        let columns = self.geometry.columns;
        let cell_width = self.geometry.cell_width;
        let mut line = LineDescriptor::blank(columns);

        if contains_placeholder(text, PLACEHOLDER_PROGRESS_BAR) {
            line.line_type = LineType::ProgressBar;
            let blank = options.progressbar_blank.to_string();
            if options.progressbar_surroundings {
                let inner = columns.saturating_sub(2);
                line.startx = 2;
                line.text = format!("[{}]", blank.repeat(inner as usize));
                line.endx = cell_width * inner;
            } else {
                line.text = blank.repeat(columns as usize);
                line.endx = cell_width * columns;
            }
        } else if contains_placeholder(text, PLACEHOLDER_PROGRESS_TIME) {
            line.line_type = LineType::ProgressTime;
            line.endx = cell_width * columns;
        } else if contains_placeholder(text, PLACEHOLDER_PLAY_ICON) {
            line.line_type = LineType::IconText;
            line.startx = 1 + options.icon_text_offset;
            line.text = self.markup.strip_play_icon(text);
        } else {
            line.text = text.to_string();
        }

        // bar fill text is generated, never stripped
        let keep_text = line.is_bar();
        if contains_placeholder(text, PLACEHOLDER_ALIGN_CENTER) {
            line.align = LineAlign::Center;
            if !keep_text {
                line.text = self.markup.strip_align_center(&line.text);
            }
        }
        if contains_placeholder(text, PLACEHOLDER_ALIGN_RIGHT) {
            line.align = LineAlign::Right;
            if !keep_text {
                line.text = self.markup.strip_align_right(&line.text);
            }
        }

        line
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(|n| n.text())
}

// "on" / "true", anything else is off
fn child_flag(node: Node, name: &str) -> bool {
    child_text(node, name)
        .map(|t| matches!(t.trim().to_lowercase().as_str(), "on" | "true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOMETRY: SkinGeometry = SkinGeometry { columns: 20, cell_width: 5 };

    fn parse(xml: &str) -> Skin {
        let markup = Markup::new().unwrap();
        SkinLoader::new(&markup, GEOMETRY).parse(xml).unwrap()
    }

    #[test]
    fn test_bundled_skin_loads() {
        let skin = parse(BUNDLED_SKIN);
        assert_eq!(skin.options.scroll_separator, " * ");
        assert!(skin.options.center_big_digits);
        assert_eq!(skin.options.extra_bars[0], ExtraBarRole::Progress);
        assert_eq!(skin.modes.lines(LcdMode::Music).len(), 4);
        assert!(skin.modes.is_big_screen(LcdMode::Screensaver));
    }

    #[test]
    fn test_partial_skin_falls_back_per_option() {
        let skin = parse("<lcd><allowemptylines>true</allowemptylines></lcd>");
        assert!(skin.options.allow_empty_lines);
        assert_eq!(skin.options.icon_text_offset, 2);
        assert_eq!(skin.options.scroll_separator, " ");
        for mode in LcdMode::ALL {
            assert_eq!(skin.modes.lines(mode), &[LineDescriptor::blank(20)]);
        }
    }

    #[test]
    fn test_mode_without_lines_is_blank_line() {
        let skin = parse("<lcd><music></music><video><line>x</line></video></lcd>");
        assert_eq!(skin.modes.lines(LcdMode::Music), &[LineDescriptor::blank(20)]);
        assert_eq!(skin.modes.lines(LcdMode::Video)[0].text, "x");
    }

    #[test]
    fn test_clock_replaces_whole_mode() {
        let skin = parse(
            "<lcd><screensaver><line>before</line><line>$INFO[LCD.TimeWide21]</line>\
             <line>after</line></screensaver></lcd>",
        );
        let lines = skin.modes.lines(LcdMode::Screensaver);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_type, LineType::BigScreen);
    }

    #[test]
    fn test_progress_bar_geometry() {
        let skin = parse("<lcd><music><line>$INFO[LCD.ProgressBar]</line></music></lcd>");
        let bar = &skin.modes.lines(LcdMode::Music)[0];
        assert_eq!(bar.line_type, LineType::ProgressBar);
        assert_eq!(bar.startx, 1);
        assert_eq!(bar.endx, 100);
        assert_eq!(bar.text, " ".repeat(20));
    }

    #[test]
    fn test_aligned_bar_keeps_fill() {
        let skin = parse(
            "<lcd><music><line>$INFO[LCD.AlignCenter]$INFO[LCD.ProgressBar]</line></music></lcd>",
        );
        let bar = &skin.modes.lines(LcdMode::Music)[0];
        assert_eq!(bar.line_type, LineType::ProgressBar);
        assert_eq!(bar.align, LineAlign::Center);
        assert_eq!(bar.text, " ".repeat(20));
    }

    #[test]
    fn test_progress_bar_surroundings() {
        let skin = parse(
            "<lcd><progressbarsurroundings>on</progressbarsurroundings>\
             <progressbarblank>-x</progressbarblank>\
             <music><line>$info[lcd.progressbar]</line></music></lcd>",
        );
        let bar = &skin.modes.lines(LcdMode::Music)[0];
        assert_eq!(bar.startx, 2);
        assert_eq!(bar.endx, 90);
        assert_eq!(bar.text, format!("[{}]", "-".repeat(18)));
    }

    #[test]
    fn test_icon_text_line() {
        let skin = parse(
            "<lcd><icontextoffset>3</icontextoffset>\
             <music><line>$INFO[LCD.PlayIcon] $INFO[Player.Time]</line></music></lcd>",
        );
        let line = &skin.modes.lines(LcdMode::Music)[0];
        assert_eq!(line.line_type, LineType::IconText);
        assert_eq!(line.startx, 4);
        assert_eq!(line.text, "$INFO[Player.Time]");
    }

    #[test]
    fn test_icon_text_offset_out_of_range_keeps_default() {
        for value in ["0", "-1", "20", "25", "two"] {
            let skin = parse(&format!("<lcd><icontextoffset>{}</icontextoffset></lcd>", value));
            assert_eq!(skin.options.icon_text_offset, 2, "value {}", value);
        }
        let skin = parse("<lcd><icontextoffset>1</icontextoffset></lcd>");
        assert_eq!(skin.options.icon_text_offset, 1);
    }

    #[test]
    fn test_alignment_tags() {
        let skin = parse(
            "<lcd><general><line>$INFO[LCD.AlignCenter] Hello</line>\
             <line>World $INFO[LCD.AlignRight]</line><line>Plain</line></general></lcd>",
        );
        let lines = skin.modes.lines(LcdMode::General);
        assert_eq!((lines[0].align, lines[0].text.as_str()), (LineAlign::Center, "Hello"));
        assert_eq!((lines[1].align, lines[1].text.as_str()), (LineAlign::Right, "World"));
        assert_eq!((lines[2].align, lines[2].text.as_str()), (LineAlign::Left, "Plain"));
    }

    #[test]
    fn test_loading_is_idempotent() {
        assert_eq!(parse(BUNDLED_SKIN), parse(BUNDLED_SKIN));
    }

    #[test]
    fn test_broken_documents_fail() {
        let markup = Markup::new().unwrap();
        let loader = SkinLoader::new(&markup, GEOMETRY);
        assert!(matches!(loader.parse("<lcd><music>"), Err(SkinError::Xml(_))));
        assert!(matches!(loader.parse("<skin/>"), Err(SkinError::MissingRoot)));
    }
}
