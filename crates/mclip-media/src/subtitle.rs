//! Burned-in subtitle styling.
//!
//! Subtitles are rendered with FFmpeg's `drawtext`: bottom-centred, on an
//! opaque box, visible for the whole clip. Text is read from a file
//! (`textfile=`) with expansion disabled so transcript content never needs
//! filtergraph escaping.

use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};
use crate::filters::{escape_filter_value, format_number};

/// Default subtitle font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 24;
/// Default subtitle box colour.
pub const DEFAULT_BACKGROUND_COLOR: &str = "black";
/// Default wrap width in characters.
pub const DEFAULT_MAX_LINE_CHARS: usize = 42;

/// Visual style of a subtitle overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    /// Font size in pixels
    pub font_size: u32,
    /// Text colour
    pub font_color: String,
    /// Box colour behind the text
    pub background_color: String,
    /// Distance from the bottom edge in pixels
    pub bottom_margin: u32,
    /// Padding around the text inside the box
    pub box_padding: u32,
    /// Wrap width in characters
    pub max_line_chars: usize,
    /// Optional font file; FFmpeg's default font otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_file: Option<String>,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_color: "white".to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            bottom_margin: 40,
            box_padding: 8,
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
            font_file: None,
        }
    }
}

impl SubtitleStyle {
    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_max_line_chars(mut self, chars: usize) -> Self {
        self.max_line_chars = chars;
        self
    }

    /// Reject colours that could break out of the filter expression.
    pub fn validate(&self) -> MediaResult<()> {
        validate_color(&self.font_color)?;
        validate_color(&self.background_color)?;
        if self.font_size == 0 {
            return Err(MediaError::invalid_parameter("font size must be positive"));
        }
        Ok(())
    }

    /// Build the `drawtext` filter reading its text from `text_file`.
    pub fn drawtext_filter(&self, text_file: &str, duration: f64) -> String {
        let mut filter = format!("drawtext=textfile={}:expansion=none", escape_filter_value(text_file));

        if let Some(font_file) = &self.font_file {
            filter.push_str(&format!(":fontfile={}", escape_filter_value(font_file)));
        }

        filter.push_str(&format!(
            ":fontsize={}:fontcolor={}:box=1:boxcolor={}:boxborderw={}\
             :line_spacing=6:x=(w-text_w)/2:y=h-text_h-{}\
             :enable=between(t\\,0\\,{})",
            self.font_size,
            self.font_color,
            self.background_color,
            self.box_padding,
            self.bottom_margin,
            format_number(duration),
        ));

        filter
    }
}

/// Accept FFmpeg colour names, `#RRGGBB`/`0xRRGGBB` and an `@alpha` suffix.
pub fn validate_color(color: &str) -> MediaResult<()> {
    let valid = !color.is_empty()
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '@' | '.' | '_'));

    if valid {
        Ok(())
    } else {
        Err(MediaError::invalid_parameter(format!("Invalid colour: {:?}", color)))
    }
}

/// Greedy word wrap at `max_chars` characters per line.
///
/// Words longer than a line are kept whole on their own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
