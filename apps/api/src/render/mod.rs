// Renderer adapter boundary.
// The layout pass decides *when* to draw and break pages; implementations of
// `Renderer` own glyph drawing and page allocation.

pub mod recorder;

use serde::Serialize;
use thiserror::Error;

use crate::layout::document::{Rgb, Style};

pub use recorder::{CommandRecorder, RenderCommand};

/// Failures raised by a renderer. The layout pass never retries them.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("page limit of {limit} pages exceeded")]
    PageLimitExceeded { limit: usize },
}

/// A run of lines drawn top-down from `(x, y)`, one line height apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawLines {
    pub lines: Vec<String>,
    pub x: f32,
    pub y: f32,
    pub style: Style,
}

/// A horizontal rule from `x1` to `x2` at height `y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub color: Rgb,
}

pub trait Renderer {
    fn set_style(&mut self, style: &Style) -> Result<(), RenderError>;

    fn draw_lines(&mut self, draw: &DrawLines) -> Result<(), RenderError>;

    fn draw_rule(&mut self, rule: &Rule) -> Result<(), RenderError>;

    /// Starts a new page; later drawing lands on it.
    fn request_new_page(&mut self) -> Result<(), RenderError>;

    /// Height of the page currently being drawn on.
    fn current_page_height(&self) -> f32;
}
