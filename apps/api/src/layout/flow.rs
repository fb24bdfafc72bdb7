//! Flow engine: places wrapped lines on the current page and breaks pages.
//!
//! # Algorithm
//! 1. `effective_max_y = explicit_max_y ?? (live page height - bottom margin)`,
//!    re-read from the renderer on every iteration.
//! 2. `lines_left = floor((effective_max_y - y) / line_height)`.
//! 3. No room: request a new page, reset `y` to the top margin, retry without
//!    consuming a line.
//! 4. Room: draw the next `lines_left` lines as one chunk and advance `y`.
//!
//! A line that cannot fit even on a fresh page is drawn alone on that page,
//! so every iteration either breaks or consumes at least one line.

use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::document::Style;
use crate::layout::page::{Cursor, PageConfig};
use crate::layout::text_measure::line_height;
use crate::render::{DrawLines, RenderError, Renderer};

/// Phase of the layout pass, reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Idle,
    Flowing,
    PageBreakPending,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowOutcome {
    pub cursor: Cursor,
    /// Draw commands issued by this call, in order.
    pub draws: Vec<DrawLines>,
    pub page_breaks: usize,
    /// Pages that received a single line which did not fit.
    pub forced_single_lines: usize,
}

impl FlowOutcome {
    fn unchanged(cursor: Cursor) -> Self {
        Self {
            cursor,
            draws: Vec::new(),
            page_breaks: 0,
            forced_single_lines: 0,
        }
    }
}

/// Flows `lines` starting at `cursor`, drawing through `renderer`.
///
/// Empty `lines` is a no-op: the cursor comes back unchanged and nothing is
/// drawn. Renderer errors abort the call.
pub fn flow<R: Renderer + ?Sized>(
    cursor: Cursor,
    lines: &[String],
    x: f32,
    style: &Style,
    page: &PageConfig,
    explicit_max_y: Option<f32>,
    renderer: &mut R,
) -> Result<FlowOutcome, RenderError> {
    if lines.is_empty() {
        return Ok(FlowOutcome::unchanged(cursor));
    }

    let lh = line_height(style.font_size_pt);
    let mut outcome = FlowOutcome::unchanged(cursor);
    let mut cursor = cursor;
    let mut fresh_page = cursor.y <= page.top_margin;
    let mut next = 0usize;

    while next < lines.len() {
        let max_y =
            explicit_max_y.unwrap_or(renderer.current_page_height() - page.bottom_margin);
        let lines_left = ((max_y - cursor.y) / lh).floor();
        let remaining = lines.len() - next;

        let take = if lines_left >= 1.0 {
            (lines_left as usize).min(remaining)
        } else if fresh_page {
            warn!(
                page_index = cursor.page_index,
                line_height = lh,
                max_y,
                "line taller than the usable page; drawing it alone"
            );
            outcome.forced_single_lines += 1;
            1
        } else {
            debug!(
                phase = ?FlowPhase::PageBreakPending,
                page_index = cursor.page_index,
                y = cursor.y,
                max_y,
                "no room left on page"
            );
            renderer.request_new_page()?;
            cursor = cursor.next_page(page.top_margin);
            outcome.page_breaks += 1;
            fresh_page = true;
            continue;
        };

        let draw = DrawLines {
            lines: lines[next..next + take].to_vec(),
            x,
            y: cursor.y,
            style: *style,
        };
        renderer.draw_lines(&draw)?;
        outcome.draws.push(draw);

        cursor = cursor.advance(take as f32 * lh);
        next += take;
        fresh_page = false;
    }

    outcome.cursor = cursor;
    Ok(outcome)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
