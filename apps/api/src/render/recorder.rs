//! In-process renderer that records the command stream instead of drawing.
//!
//! The recorded commands are what the HTTP layer returns; any downstream
//! PDF/canvas backend can replay them in order.

use serde::Serialize;
use tracing::debug;

use crate::layout::document::Style;
use crate::render::{DrawLines, RenderError, Renderer, Rule};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    SetStyle { style: Style },
    DrawLines(DrawLines),
    DrawRule(Rule),
    NewPage { page_index: usize },
}

pub struct CommandRecorder {
    /// Height per page; the last entry repeats for every later page.
    page_heights: Vec<f32>,
    max_pages: Option<usize>,
    page_index: usize,
    commands: Vec<RenderCommand>,
}

impl CommandRecorder {
    pub fn new(page_height: f32) -> Self {
        Self::with_page_heights(vec![page_height])
    }

    /// `page_heights` must not be empty; an empty list falls back to A4.
    pub fn with_page_heights(page_heights: Vec<f32>) -> Self {
        let page_heights = if page_heights.is_empty() {
            vec![297.0]
        } else {
            page_heights
        };
        Self {
            page_heights,
            max_pages: None,
            page_index: 0,
            commands: Vec::new(),
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_index + 1
    }

    pub fn into_commands(self) -> Vec<RenderCommand> {
        self.commands
    }
}

#[cfg(test)]
impl CommandRecorder {
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn new_page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::NewPage { .. }))
            .count()
    }

    /// All drawn lines in command order, across pages.
    pub fn drawn_lines(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLines(draw) => Some(draw),
                _ => None,
            })
            .flat_map(|draw| draw.lines.iter().map(String::as_str))
            .collect()
    }
}

impl Renderer for CommandRecorder {
    fn set_style(&mut self, style: &Style) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::SetStyle { style: *style });
        Ok(())
    }

    fn draw_lines(&mut self, draw: &DrawLines) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::DrawLines(draw.clone()));
        Ok(())
    }

    fn draw_rule(&mut self, rule: &Rule) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::DrawRule(rule.clone()));
        Ok(())
    }

    fn request_new_page(&mut self) -> Result<(), RenderError> {
        if let Some(limit) = self.max_pages {
            if self.page_count() >= limit {
                return Err(RenderError::PageLimitExceeded { limit });
            }
        }
        self.page_index += 1;
        debug!(page_index = self.page_index, "recorder: new page");
        self.commands.push(RenderCommand::NewPage {
            page_index: self.page_index,
        });
        Ok(())
    }

    fn current_page_height(&self) -> f32 {
        let last = self.page_heights.len() - 1;
        self.page_heights[self.page_index.min(last)]
    }
}
