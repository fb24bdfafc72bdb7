//! Block orchestrator: walks sections and blocks and feeds them to the flow engine.
//!
//! Per block: resolve styles and x positions, wrap each line group, flow it,
//! then add the block's fixed gap. Reserved block kinds may force a page break
//! before they start so their title is not stranded at the foot of a page.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::layout::document::{Align, Block, BlockKind, Document, Rgb, Style};
use crate::layout::flow::{flow, FlowOutcome, FlowPhase};
use crate::layout::font_metrics::FontMetrics;
use crate::layout::page::{Cursor, PageConfig};
use crate::layout::text_measure::{wrap, TextInput};
use crate::render::{RenderError, Renderer, Rule};

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Minimum space that must remain below the cursor before a reserved block
/// starts. Zero disables the check for that kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReserveThresholds {
    pub clause: f32,
    pub heading: f32,
}

impl Default for ReserveThresholds {
    fn default() -> Self {
        Self {
            clause: 40.0,
            heading: 0.0,
        }
    }
}

/// Styles and offsets for the four line groups of a clause entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseStyles {
    pub title: Style,
    pub explanation: Style,
    pub risk: Style,
    pub improvement: Style,
    pub title_indent: f32,
    pub explanation_indent: f32,
    pub note_indent: f32,
}

impl Default for ClauseStyles {
    fn default() -> Self {
        Self {
            title: Style::new(11.0, Rgb(40, 40, 40)).bold(),
            explanation: Style::new(11.0, Rgb(60, 60, 60)),
            risk: Style::new(11.0, Rgb(200, 30, 30)),
            improvement: Style::new(11.0, Rgb(16, 122, 58)),
            title_indent: 4.0,
            explanation_indent: 8.0,
            note_indent: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub page: PageConfig,
    pub reserves: ReserveThresholds,
    pub heading_style: Style,
    /// Gap between a section heading and its first block.
    pub heading_gap: f32,
    pub clause: ClauseStyles,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            reserves: ReserveThresholds::default(),
            heading_style: Style::new(13.0, Rgb(34, 64, 123)).bold(),
            heading_gap: 2.0,
            clause: ClauseStyles::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub final_cursor: Cursor,
    pub page_count: usize,
    /// Breaks taken by the flow engine because a page ran out of room.
    pub flow_page_breaks: usize,
    /// Breaks forced ahead of a reserved block.
    pub orphan_page_breaks: usize,
    pub forced_single_line_pages: usize,
    pub lines_drawn: usize,
    pub blocks: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout pass
// ────────────────────────────────────────────────────────────────────────────

/// One group of lines sharing a style and x position.
struct LineGroup {
    text: TextInput,
    x: f32,
    style: Style,
}

struct LayoutPass<'a, R: Renderer + ?Sized> {
    options: &'a LayoutOptions,
    renderer: &'a mut R,
    cursor: Cursor,
    phase: FlowPhase,
    summary: LayoutSummary,
}

/// Lays out `doc` top to bottom through `renderer`.
///
/// The first renderer error aborts the pass; commands already issued stay
/// with the renderer and the caller decides whether to discard them.
#[instrument(skip_all, fields(title = %doc.title, sections = doc.sections.len()))]
pub fn layout_document<R: Renderer + ?Sized>(
    doc: &Document,
    options: &LayoutOptions,
    renderer: &mut R,
) -> Result<LayoutSummary, RenderError> {
    let cursor = options.page.start_cursor();
    let mut pass = LayoutPass {
        options,
        renderer,
        cursor,
        phase: FlowPhase::Idle,
        summary: LayoutSummary {
            final_cursor: cursor,
            page_count: 1,
            flow_page_breaks: 0,
            orphan_page_breaks: 0,
            forced_single_line_pages: 0,
            lines_drawn: 0,
            blocks: 0,
        },
    };

    for section in &doc.sections {
        if let Some(heading) = &section.heading {
            pass.heading(heading)?;
        }
        for block in &section.blocks {
            pass.block(block)?;
        }
        pass.cursor = pass.cursor.advance(section.gap_after);
    }

    pass.set_phase(FlowPhase::Done);
    pass.summary.final_cursor = pass.cursor;
    pass.summary.page_count = pass.cursor.page_index + 1;
    debug!(
        pages = pass.summary.page_count,
        lines = pass.summary.lines_drawn,
        "layout pass complete"
    );
    Ok(pass.summary)
}

impl<R: Renderer + ?Sized> LayoutPass<'_, R> {
    fn set_phase(&mut self, phase: FlowPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, page_index = self.cursor.page_index, "phase");
            self.phase = phase;
        }
    }

    fn page(&self) -> &PageConfig {
        &self.options.page
    }

    fn effective_max_y(&self) -> f32 {
        self.page()
            .effective_max_y(self.renderer.current_page_height())
    }

    fn heading(&mut self, heading: &str) -> Result<(), RenderError> {
        self.set_phase(FlowPhase::Flowing);
        self.reserve(self.options.reserves.heading)?;
        let group = LineGroup {
            text: heading.into(),
            x: self.x_for(Align::Left, 0.0),
            style: self.options.heading_style,
        };
        self.flow_group(&group)?;
        self.cursor = self.cursor.advance(self.options.heading_gap);
        Ok(())
    }

    fn block(&mut self, block: &Block) -> Result<(), RenderError> {
        self.set_phase(FlowPhase::Flowing);
        self.summary.blocks += 1;

        match &block.kind {
            BlockKind::Divider { color } => self.divider(*color)?,
            BlockKind::ClauseEntry { .. } => {
                self.reserve(self.options.reserves.clause)?;
                for group in self.line_groups(&block.kind) {
                    self.flow_group(&group)?;
                }
            }
            _ => {
                for group in self.line_groups(&block.kind) {
                    self.flow_group(&group)?;
                }
            }
        }

        self.cursor = self.cursor.advance(block.gap_after);
        Ok(())
    }

    /// Breaks the page when less than `threshold` remains below the cursor.
    /// A page with nothing on it yet is never broken.
    fn reserve(&mut self, threshold: f32) -> Result<(), RenderError> {
        let room = self.effective_max_y() - self.cursor.y;
        if room < threshold && self.cursor.y > self.page().top_margin {
            debug!(room, threshold, page_index = self.cursor.page_index, "orphan avoidance break");
            self.break_page()?;
            self.summary.orphan_page_breaks += 1;
        }
        Ok(())
    }

    fn break_page(&mut self) -> Result<(), RenderError> {
        self.set_phase(FlowPhase::PageBreakPending);
        self.renderer.request_new_page()?;
        self.cursor = self.cursor.next_page(self.page().top_margin);
        self.set_phase(FlowPhase::Flowing);
        Ok(())
    }

    fn divider(&mut self, color: Rgb) -> Result<(), RenderError> {
        if self.cursor.y > self.effective_max_y() {
            self.break_page()?;
            self.summary.orphan_page_breaks += 1;
        }
        let page = self.page();
        let rule = Rule {
            x1: page.left_margin,
            x2: page.page_width - page.right_margin,
            y: self.cursor.y,
            color,
        };
        self.renderer.draw_rule(&rule)
    }

    fn flow_group(&mut self, group: &LineGroup) -> Result<(), RenderError> {
        let metrics = FontMetrics::for_style(self.page().font, &group.style);
        let lines = wrap(&group.text, self.page().text_width, &metrics);
        if lines.is_empty() {
            return Ok(());
        }

        self.renderer.set_style(&group.style)?;
        let explicit_max_y = self.page().explicit_max_y;
        let outcome: FlowOutcome = flow(
            self.cursor,
            &lines,
            group.x,
            &group.style,
            &self.options.page,
            explicit_max_y,
            &mut *self.renderer,
        )?;

        self.cursor = outcome.cursor;
        self.summary.flow_page_breaks += outcome.page_breaks;
        self.summary.forced_single_line_pages += outcome.forced_single_lines;
        self.summary.lines_drawn += lines.len();
        Ok(())
    }

    fn x_for(&self, align: Align, indent: f32) -> f32 {
        let page = self.page();
        match align {
            Align::Left => page.left_margin + indent,
            Align::Center => page.page_width / 2.0,
            Align::Right => page.page_width - page.right_margin,
        }
    }

    fn line_groups(&self, kind: &BlockKind) -> Vec<LineGroup> {
        match kind {
            BlockKind::Paragraph {
                text,
                indent,
                style,
            } => vec![LineGroup {
                text: text.clone(),
                x: self.x_for(style.align, *indent),
                style: *style,
            }],
            BlockKind::ListItem {
                text,
                indent,
                style,
            } => {
                if text.trim().is_empty() {
                    return Vec::new();
                }
                vec![LineGroup {
                    text: format!("• {text}").into(),
                    x: self.x_for(style.align, *indent),
                    style: *style,
                }]
            }
            BlockKind::KeyValue {
                key,
                value,
                indent,
                style,
            } => {
                if value.trim().is_empty() {
                    return Vec::new();
                }
                vec![LineGroup {
                    text: format!("{key}: {value}").into(),
                    x: self.x_for(style.align, *indent),
                    style: *style,
                }]
            }
            BlockKind::ClauseEntry {
                index,
                title,
                explanation,
                risk,
                improvement,
            } => {
                let styles = &self.options.clause;
                let mut groups = vec![
                    LineGroup {
                        text: format!("{index}. {title}").into(),
                        x: self.x_for(Align::Left, styles.title_indent),
                        style: styles.title,
                    },
                    LineGroup {
                        text: explanation.as_str().into(),
                        x: self.x_for(Align::Left, styles.explanation_indent),
                        style: styles.explanation,
                    },
                ];
                if let Some(risk) = risk.as_deref().filter(|r| !r.trim().is_empty()) {
                    groups.push(LineGroup {
                        text: format!("• Risk: {risk}").into(),
                        x: self.x_for(Align::Left, styles.note_indent),
                        style: styles.risk,
                    });
                }
                if let Some(improvement) = improvement.as_deref().filter(|i| !i.trim().is_empty())
                {
                    groups.push(LineGroup {
                        text: format!("• Improvement: {improvement}").into(),
                        x: self.x_for(Align::Left, styles.note_indent),
                        style: styles.improvement,
                    });
                }
                groups
            }
            BlockKind::Divider { .. } => Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::document::Section;
    use crate::layout::page::TOP_MARGIN;
    use crate::layout::text_measure::line_height;
    use crate::render::{CommandRecorder, RenderCommand};

    /// Font size whose line height is 6.6.
    const SIZE_6_6: f32 = 4.6 / 0.3528;

    fn clause(index: usize) -> Block {
        Block::new(BlockKind::ClauseEntry {
            index,
            title: format!("Clause {index}"),
            explanation: "Explanation".to_string(),
            risk: Some("Risk".to_string()),
            improvement: Some("Improvement".to_string()),
        })
    }

    fn doc_of(blocks: Vec<Block>) -> Document {
        let mut section = Section::new(None);
        for block in blocks {
            section.push(block);
        }
        Document {
            title: "Test".to_string(),
            sections: vec![section],
        }
    }

    /// 350-high pages, max-y pinned at 350, every clause line 6.6 tall.
    fn tall_page_options() -> LayoutOptions {
        let line = Style::new(SIZE_6_6, Rgb(0, 0, 0));
        LayoutOptions {
            page: PageConfig {
                page_height: 350.0,
                explicit_max_y: Some(350.0),
                ..PageConfig::default()
            },
            clause: ClauseStyles {
                title: line.bold(),
                explanation: line,
                risk: line,
                improvement: line,
                ..ClauseStyles::default()
            },
            ..LayoutOptions::default()
        }
    }

    #[test]
    fn test_line_height_for_scenario_font() {
        assert!((line_height(SIZE_6_6) - 6.6).abs() < 1e-4);
    }

    #[test]
    fn test_three_clauses_fit_without_breaks() {
        let options = tall_page_options();
        let mut recorder = CommandRecorder::new(350.0);
        let doc = doc_of((1..=3).map(|i| clause(i).with_gap(6.0)).collect());

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(recorder.new_page_count(), 0);
        assert_eq!(summary.page_count, 1);
        // Four groups, each a single line here.
        assert_eq!(summary.lines_drawn, 12);
    }

    #[test]
    fn test_clause_near_page_foot_forces_one_break() {
        let options = tall_page_options();
        let mut recorder = CommandRecorder::new(350.0);
        // Leave 20 units of room: 350 - 20 = 330. Start is 20, so pad by 310.
        let spacer = Block::paragraph("", 0.0, Style::new(11.0, Rgb(0, 0, 0))).with_gap(310.0);
        let doc = doc_of(vec![spacer, clause(4)]);

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(recorder.new_page_count(), 1);
        assert_eq!(summary.orphan_page_breaks, 1);
        assert_eq!(summary.flow_page_breaks, 0);
        let first_draw = recorder
            .commands()
            .iter()
            .find_map(|c| match c {
                RenderCommand::DrawLines(d) => Some(d),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_draw.y, TOP_MARGIN);
        assert_eq!(first_draw.lines, vec!["4. Clause 4"]);
    }

    #[test]
    fn test_reserve_threshold_is_tunable() {
        let mut options = tall_page_options();
        options.reserves.clause = 10.0;
        let mut recorder = CommandRecorder::new(350.0);
        let spacer = Block::paragraph("", 0.0, Style::new(11.0, Rgb(0, 0, 0))).with_gap(310.0);
        // 20 units of room is now enough to start; the clause still spills
        // over through ordinary flow.
        let doc = doc_of(vec![spacer, clause(1)]);

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(summary.orphan_page_breaks, 0);
        assert!(summary.flow_page_breaks >= 1);
    }

    #[test]
    fn test_empty_page_never_broken_for_reserve() {
        let mut options = tall_page_options();
        options.reserves.clause = 10_000.0;
        let mut recorder = CommandRecorder::new(350.0);
        let doc = doc_of(vec![clause(1)]);

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(summary.orphan_page_breaks, 0);
        assert_eq!(summary.page_count, 1);
    }

    #[test]
    fn test_clause_optional_fields_skipped() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let doc = doc_of(vec![Block::new(BlockKind::ClauseEntry {
            index: 2,
            title: "Payment".to_string(),
            explanation: "Net 30.".to_string(),
            risk: None,
            improvement: Some("   ".to_string()),
        })]);

        layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(recorder.drawn_lines(), vec!["2. Payment", "Net 30."]);
    }

    #[test]
    fn test_clause_groups_use_distinct_styles_and_indents() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        layout_document(&doc_of(vec![clause(1)]), &options, &mut recorder).unwrap();

        let draws: Vec<_> = recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLines(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(draws.len(), 4);
        assert_eq!(draws[0].x, 18.0);
        assert_eq!(draws[1].x, 22.0);
        assert_eq!(draws[2].x, 26.0);
        assert_eq!(draws[2].lines, vec!["• Risk: Risk"]);
        assert_eq!(draws[2].style.color, Rgb(200, 30, 30));
        assert_eq!(draws[3].lines, vec!["• Improvement: Improvement"]);
        assert_eq!(draws[3].style.color, Rgb(16, 122, 58));
    }

    #[test]
    fn test_set_style_precedes_each_draw() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        layout_document(&doc_of(vec![clause(1)]), &options, &mut recorder).unwrap();

        let commands = recorder.commands();
        for (i, command) in commands.iter().enumerate() {
            if let RenderCommand::DrawLines(draw) = command {
                let style = commands[..i].iter().rev().find_map(|c| match c {
                    RenderCommand::SetStyle { style } => Some(*style),
                    _ => None,
                });
                assert_eq!(style, Some(draw.style));
            }
        }
    }

    #[test]
    fn test_alignment_resolves_x() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let base = Style::new(11.0, Rgb(0, 0, 0));
        let doc = doc_of(vec![
            Block::paragraph("left", 4.0, base),
            Block::paragraph("center", 0.0, base.aligned(Align::Center)),
            Block::paragraph("right", 0.0, base.aligned(Align::Right)),
        ]);
        layout_document(&doc, &options, &mut recorder).unwrap();

        let xs: Vec<f32> = recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLines(d) => Some(d.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![18.0, 105.0, 196.0]);
    }

    #[test]
    fn test_gaps_advance_cursor() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let style = Style::new(11.0, Rgb(0, 0, 0));
        let mut section = Section::new(Some("Heading".to_string()));
        section.push(Block::paragraph("body", 0.0, style).with_gap(6.0));
        section.gap_after = 8.0;
        let doc = Document {
            title: "t".to_string(),
            sections: vec![section],
        };

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        let expected = 20.0 + line_height(13.0) + 2.0 + line_height(11.0) + 6.0 + 8.0;
        assert!((summary.final_cursor.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_divider_draws_full_width_rule() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let doc = doc_of(vec![Block::divider(Rgb(180, 180, 180)).with_gap(8.0)]);

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(
            recorder.commands(),
            &[RenderCommand::DrawRule(Rule {
                x1: 14.0,
                x2: 196.0,
                y: 20.0,
                color: Rgb(180, 180, 180),
            })]
        );
        assert!((summary.final_cursor.y - 28.0).abs() < 1e-4);
    }

    #[test]
    fn test_divider_past_bottom_moves_to_next_page() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let spacer = Block::paragraph("", 0.0, Style::new(11.0, Rgb(0, 0, 0))).with_gap(270.0);
        let doc = doc_of(vec![spacer, Block::divider(Rgb(0, 0, 0))]);

        layout_document(&doc, &options, &mut recorder).unwrap();

        assert!(matches!(recorder.commands()[0], RenderCommand::NewPage { .. }));
        assert!(matches!(
            &recorder.commands()[1],
            RenderCommand::DrawRule(rule) if rule.y == TOP_MARGIN
        ));
    }

    #[test]
    fn test_content_fitting_one_page_never_breaks() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let style = Style::new(11.0, Rgb(0, 0, 0));
        let doc = doc_of(vec![
            Block::paragraph("Intro paragraph.", 0.0, style).with_gap(2.0),
            Block::list_item("First note", 4.0, style),
            Block::key_value("Total Fee", "$1,000", 3.0, style),
            clause(1).with_gap(6.0),
        ]);

        let summary = layout_document(&doc, &options, &mut recorder).unwrap();

        assert_eq!(recorder.new_page_count(), 0);
        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.blocks, 4);
    }

    #[test]
    fn test_long_document_conserves_all_lines() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0);
        let style = Style::new(11.0, Rgb(0, 0, 0));
        let blocks: Vec<Block> = (0..80)
            .map(|i| Block::list_item(format!("note {i}"), 4.0, style).with_gap(1.0))
            .collect();

        let summary = layout_document(&doc_of(blocks), &options, &mut recorder).unwrap();

        let expected: Vec<String> = (0..80).map(|i| format!("• note {i}")).collect();
        assert_eq!(recorder.drawn_lines(), expected);
        assert_eq!(summary.page_count, recorder.new_page_count() + 1);
        assert!(summary.page_count >= 2);
    }

    #[test]
    fn test_renderer_error_propagates() {
        let options = LayoutOptions::default();
        let mut recorder = CommandRecorder::new(297.0).with_max_pages(Some(1));
        let style = Style::new(11.0, Rgb(0, 0, 0));
        let blocks: Vec<Block> = (0..100)
            .map(|i| Block::list_item(format!("note {i}"), 4.0, style))
            .collect();

        let err = layout_document(&doc_of(blocks), &options, &mut recorder).unwrap_err();
        assert_eq!(err, RenderError::PageLimitExceeded { limit: 1 });
    }
}
