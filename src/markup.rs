/*
 *  markup.rs
 *
 *  LyLCD - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text helpers - BBCode stripping, skin placeholders, label expansion
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

use fancy_regex::Regex;
use log::debug;
use std::borrow::Cow;

// skin placeholders, lower case for substring detection
pub const PLACEHOLDER_PROGRESS_BAR: &str = "$info[lcd.progressbar]";
pub const PLACEHOLDER_PROGRESS_TIME: &str = "$info[lcd.progresstime]";
pub const PLACEHOLDER_PLAY_ICON: &str = "$info[lcd.playicon]";
pub const PLACEHOLDER_ALIGN_CENTER: &str = "$info[lcd.aligncenter]";
pub const PLACEHOLDER_ALIGN_RIGHT: &str = "$info[lcd.alignright]";

/// Nested tags deeper than this stay in the text
pub const BBCODE_MAX_PASSES: usize = 5;

const BBCODE_PATTERN: &str =
    r"\[(?P<tagname>[0-9a-zA-Z_\-]+?)[0-9a-zA-Z_\- ]*?\](?P<content>.*?)\[/\k<tagname>\]";
// $INFO[LCD.Time], $INFO[LCD.TimeWide], $INFO[LCD.TimeWide21], $INFO[LCD.Time44] ...
const CLOCK_PATTERN: &str = r"(?i)\$INFO\[LCD\.Time(Wide)?\d?\d?\]";
const PLAY_ICON_PATTERN: &str = r"(?i)\s?\$INFO\[LCD\.PlayIcon\]\s?";
const ALIGN_CENTER_PATTERN: &str = r"(?i)\s?\$INFO\[LCD\.AlignCenter\]\s?";
const ALIGN_RIGHT_PATTERN: &str = r"(?i)\s?\$INFO\[LCD\.AlignRight\]\s?";

/// Case insensitive placeholder check, `placeholder` must be lower case
pub fn contains_placeholder(text: &str, placeholder: &str) -> bool {
    text.to_lowercase().contains(placeholder)
}

/// Compiled patterns, built once per engine
#[derive(Debug)]
pub struct Markup {
    bbcode: Regex,
    clock: Regex,
    play_icon: Regex,
    align_center: Regex,
    align_right: Regex,
}

impl Markup {
    pub fn new() -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            bbcode: Regex::new(BBCODE_PATTERN)?,
            clock: Regex::new(CLOCK_PATTERN)?,
            play_icon: Regex::new(PLAY_ICON_PATTERN)?,
            align_center: Regex::new(ALIGN_CENTER_PATTERN)?,
            align_right: Regex::new(ALIGN_RIGHT_PATTERN)?,
        })
    }

    /// Replace `[tag ...]content[/tag]` with `content`.
    ///
    /// One pass removes one nesting level; stops on a pass without
    /// replacements or after BBCODE_MAX_PASSES. Matching errors give back
    /// the input untouched.
    pub fn strip_bbcode(&self, text: &str) -> String {
        let mut line = text.to_string();

        for _ in 0..BBCODE_MAX_PASSES {
            match self.bbcode.try_replacen(&line, 0, "${content}") {
                Ok(Cow::Borrowed(_)) => break,
                Ok(Cow::Owned(stripped)) => line = stripped,
                Err(e) => {
                    debug!("BBCode strip failed on '{}': {}", text, e);
                    return text.to_string();
                }
            }
        }

        line
    }

    /// Line asks for the big digit clock
    pub fn is_clock_placeholder(&self, text: &str) -> bool {
        self.clock.is_match(text).unwrap_or(false)
    }

    pub fn strip_play_icon(&self, text: &str) -> String {
        strip_with(&self.play_icon, text)
    }

    pub fn strip_align_center(&self, text: &str) -> String {
        strip_with(&self.align_center, text)
    }

    pub fn strip_align_right(&self, text: &str) -> String {
        strip_with(&self.align_right, text)
    }
}

// drop the placeholder, surrounding whitespace collapses to one space
fn strip_with(pattern: &Regex, text: &str) -> String {
    match pattern.try_replacen(text, 0, " ") {
        Ok(stripped) => stripped.trim().to_string(),
        Err(_) => text.trim().to_string(),
    }
}

/// Opening `$INFO[` token in any case
pub const INFO_OPEN: &str = "$info[";

/// Byte offset of the first `$INFO[`, any letter case
fn find_info_open(text: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(INFO_OPEN)
}

/// Expand `$INFO[Key]` and `$INFO[Key,prefix,postfix]` tokens.
///
/// Prefix and postfix are only emitted when the label has a value.
/// An unterminated token is kept as literal text.
pub fn expand_info_labels<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = find_info_open(rest) {
        out.push_str(&rest[..start]);
        let after = &rest[start + INFO_OPEN.len()..];
        let Some(end) = after.find(']') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let mut parts = after[..end].splitn(3, ',');
        let key = parts.next().unwrap_or("").trim();
        let prefix = parts.next().unwrap_or("");
        let postfix = parts.next().unwrap_or("");

        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            out.push_str(prefix);
            out.push_str(&value);
            out.push_str(postfix);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup() -> Markup {
        Markup::new().unwrap()
    }

    #[test]
    fn test_strip_nested_bbcode() {
        assert_eq!(markup().strip_bbcode("[b]A[i]B[/i]C[/b]"), "ABC");
    }

    #[test]
    fn test_strip_bbcode_with_attributes() {
        assert_eq!(markup().strip_bbcode("[COLOR red]Live[/COLOR] now"), "Live now");
        assert_eq!(markup().strip_bbcode("[B]x[/B] [I]y[/I]"), "x y");
    }

    #[test]
    fn test_strip_bbcode_leaves_unmatched_tags() {
        assert_eq!(markup().strip_bbcode("[b]open only"), "[b]open only");
        assert_eq!(markup().strip_bbcode("plain text"), "plain text");
    }

    #[test]
    fn test_strip_bbcode_stops_after_max_passes() {
        let deep = "[a][b][c][d][e][f][g]x[/g][/f][/e][/d][/c][/b][/a]";
        assert_eq!(markup().strip_bbcode(deep), "[f][g]x[/g][/f]");
    }

    #[test]
    fn test_clock_placeholder_variants() {
        let m = markup();
        assert!(m.is_clock_placeholder("$INFO[LCD.Time]"));
        assert!(m.is_clock_placeholder("$info[lcd.timewide]"));
        assert!(m.is_clock_placeholder("$INFO[LCD.TimeWide21]"));
        assert!(m.is_clock_placeholder("$INFO[LCD.Time44]"));
        assert!(!m.is_clock_placeholder("$INFO[System.Time]"));
        assert!(!m.is_clock_placeholder("$INFO[LCD.TimeWide123]"));
    }

    #[test]
    fn test_strip_placeholders_collapse_whitespace() {
        let m = markup();
        assert_eq!(m.strip_play_icon("$INFO[LCD.PlayIcon] $INFO[Player.Time]"), "$INFO[Player.Time]");
        assert_eq!(m.strip_play_icon("a $info[lcd.playicon] b"), "a b");
        assert_eq!(m.strip_align_center("$INFO[LCD.AlignCenter]Hello"), "Hello");
        assert_eq!(m.strip_align_right("Hi $INFO[LCD.AlignRight]"), "Hi");
    }

    #[test]
    fn test_expand_info_labels() {
        let lookup = |key: &str| match key {
            "Player.Time" => Some("01:02".to_string()),
            "Empty" => Some(String::new()),
            _ => None,
        };
        assert_eq!(expand_info_labels("[$INFO[Player.Time]]", lookup), "[01:02]");
        assert_eq!(expand_info_labels("$INFO[Player.Time,at ,!]", lookup), "at 01:02!");
        assert_eq!(expand_info_labels("x$INFO[Empty,at ,!]y", lookup), "xy");
        assert_eq!(expand_info_labels("$INFO[Missing]", lookup), "");
        assert_eq!(expand_info_labels("broken $INFO[Player", lookup), "broken $INFO[Player");
        assert_eq!(expand_info_labels("$info[Player.Time] / $Info[Player.Time]", lookup), "01:02 / 01:02");
    }

    #[test]
    fn test_contains_placeholder_ignores_case() {
        assert!(contains_placeholder("$INFO[LCD.ProgressBar]", PLACEHOLDER_PROGRESS_BAR));
        assert!(!contains_placeholder("$INFO[LCD.ProgressTime]", PLACEHOLDER_PROGRESS_BAR));
    }
}
