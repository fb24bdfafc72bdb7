//! Text measurer: turns a text value into the ordered lines it occupies.
//!
//! Greedy word-wrap against a width in millimetres. Pure: nothing here reads
//! or changes the cursor.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{FontMetrics, MM_PER_PT};

/// Fixed padding added to every line on top of the font size.
pub const LINE_PADDING: f32 = 2.0;

/// Vertical space one line occupies at `font_size_pt`.
pub fn line_height(font_size_pt: f32) -> f32 {
    font_size_pt * MM_PER_PT + LINE_PADDING
}

/// Text handed to the layout pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    #[default]
    None,
    Single(String),
    /// Lines that were already wrapped upstream. Never re-wrapped.
    Lines(Vec<String>),
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(lines: Vec<String>) -> Self {
        TextInput::Lines(lines)
    }
}

/// Resolves `input` into lines fitted to `max_width`.
///
/// - `None` and the empty string give no lines.
/// - `Lines` is returned as-is.
/// - `Single` is split on `\n`, then each segment is packed greedily. A word
///   wider than `max_width` on its own is broken between characters.
pub fn wrap(input: &TextInput, max_width: f32, metrics: &FontMetrics) -> Vec<String> {
    match input {
        TextInput::None => Vec::new(),
        TextInput::Lines(lines) => lines.clone(),
        TextInput::Single(text) => wrap_str(text, max_width, metrics),
    }
}

fn wrap_str(text: &str, max_width: f32, metrics: &FontMetrics) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let space_w = metrics.space_width();
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let segment = segment.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in segment.split_whitespace() {
            let word_w = metrics.width(word);

            if word_w > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let (rest, rest_width) = break_word(word, max_width, metrics, &mut lines);
                current = rest;
                current_width = rest_width;
            } else if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space_w + word_w > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }

        // Blank segments between explicit newlines keep their empty line.
        lines.push(current);
    }

    lines
}

/// Splits an over-long word into full-width pieces, pushing all but the last.
/// Returns the trailing piece and its width so packing can continue after it.
fn break_word(
    word: &str,
    max_width: f32,
    metrics: &FontMetrics,
    lines: &mut Vec<String>,
) -> (String, f32) {
    let mut piece = String::new();
    let mut piece_width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = metrics.width(c.encode_utf8(&mut buf));
        if !piece.is_empty() && piece_width + char_w > max_width {
            lines.push(std::mem::take(&mut piece));
            piece_width = 0.0;
        }
        piece.push(c);
        piece_width += char_w;
    }

    (piece, piece_width)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
