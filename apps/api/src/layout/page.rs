//! Page geometry and the write cursor.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFamily;

/// Where content restarts after every page break.
pub const TOP_MARGIN: f32 = 25.0;

/// Page geometry in millimetres (A4 by default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width: f32,
    /// Nominal page height. The renderer is still asked for the live height on
    /// every flow iteration because pages may differ.
    pub page_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    /// Fixed wrap width applied to every text block.
    pub text_width: f32,
    /// Cursor position of the first line on the first page.
    pub first_line_y: f32,
    /// When set, replaces `page_height - bottom_margin` as the bottom bound.
    pub explicit_max_y: Option<f32>,
    pub font: FontFamily,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            top_margin: TOP_MARGIN,
            bottom_margin: 20.0,
            left_margin: 14.0,
            right_margin: 14.0,
            text_width: 180.0,
            first_line_y: 20.0,
            explicit_max_y: None,
            font: FontFamily::Helvetica,
        }
    }
}

impl PageConfig {
    /// Usable bottom bound for a page of height `page_height`.
    pub fn effective_max_y(&self, page_height: f32) -> f32 {
        self.explicit_max_y
            .unwrap_or(page_height - self.bottom_margin)
    }

    /// Cursor at the start of a layout pass.
    pub fn start_cursor(&self) -> Cursor {
        Cursor {
            y: self.first_line_y,
            page_index: 0,
        }
    }
}

/// Vertical write position. Passed into and returned from every flow call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub y: f32,
    pub page_index: usize,
}

impl Cursor {
    /// The cursor after a page break: first line of the next page.
    pub fn next_page(self, top_margin: f32) -> Self {
        Self {
            y: top_margin,
            page_index: self.page_index + 1,
        }
    }

    pub fn advance(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}
