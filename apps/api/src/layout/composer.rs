//! Builds the layout `Document` for a contract-summary report.
//!
//! Section order: header, About, Clauses, divider, Financials, Compliance
//! Notes, Final Assessment, footer. Sections whose data is missing or empty
//! are left out entirely.

use serde::{Deserialize, Serialize};

use crate::layout::document::{Align, Block, BlockKind, Document, Rgb, Section, Style};
use crate::models::report::Report;

const BRAND_STYLE: Style = Style::new(20.0, Rgb(28, 35, 90)).bold();
const SUBTITLE_STYLE: Style = Style::new(14.0, Rgb(80, 80, 80));
const TITLE_STYLE: Style = Style::new(15.0, Rgb(40, 40, 40))
    .bold()
    .aligned(Align::Center);
const ABOUT_STYLE: Style = Style::new(11.0, Rgb(70, 70, 70));
const BODY_STYLE: Style = Style::new(11.0, Rgb(40, 40, 40));
const FOOTER_STYLE: Style = Style::new(10.0, Rgb(120, 120, 120)).aligned(Align::Right);

const HEADER_RULE: Rgb = Rgb(180, 180, 180);
const SECTION_RULE: Rgb = Rgb(220, 220, 220);

/// Branding printed in the header and footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub brand: String,
    pub subtitle: String,
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self {
            brand: "Contract Review".to_string(),
            subtitle: "Business Owner Contract Summary".to_string(),
        }
    }
}

pub fn compose_document(report: &Report, template: &ReportTemplate) -> Document {
    let title = report.title.clone().unwrap_or_default();
    let mut sections = vec![header(&title, template)];

    if let Some(about) = &report.about {
        let mut section = Section::new(Some("About".to_string()));
        section.push(Block::paragraph(about.as_str(), 4.0, ABOUT_STYLE));
        section.gap_after = 8.0;
        sections.push(section);
    }

    if !report.clauses.is_empty() {
        let mut section = Section::new(Some("Clauses".to_string()));
        for (i, clause) in report.clauses.iter().enumerate() {
            section.push(
                Block::new(BlockKind::ClauseEntry {
                    index: i + 1,
                    title: clause.title.clone().unwrap_or_default(),
                    explanation: clause.explanation.clone().unwrap_or_default(),
                    risk: clause.risk.clone(),
                    improvement: clause.improvement.clone(),
                })
                .with_gap(6.0),
            );
        }
        section.gap_after = 4.0;
        sections.push(section);
    }

    let mut rule = Section::new(None);
    rule.push(Block::divider(SECTION_RULE).with_gap(8.0));
    sections.push(rule);

    if let Some(financials) = report.financials.as_ref().filter(|f| !f.is_empty()) {
        let mut section = Section::new(Some("Financials".to_string()));
        if let Some(fee) = &financials.total_fee {
            section.push(Block::key_value("Total Fee", fee.as_str(), 3.0, BODY_STYLE));
        }
        if !financials.payment_milestones.is_empty() {
            section.push(Block::paragraph("Payment Milestones:", 4.0, BODY_STYLE));
            for milestone in &financials.payment_milestones {
                section.push(Block::list_item(milestone.as_str(), 6.0, BODY_STYLE));
            }
        }
        if let Some(fee) = &financials.late_fee {
            section.push(Block::key_value("Late Fee", fee.as_str(), 4.0, BODY_STYLE));
        }
        section.gap_after = 6.0;
        sections.push(section);
    }

    if !report.key_compliance_notes.is_empty() {
        let mut section = Section::new(Some("Compliance Notes".to_string()));
        for note in &report.key_compliance_notes {
            section.push(Block::list_item(note.as_str(), 4.0, BODY_STYLE));
        }
        section.gap_after = 6.0;
        sections.push(section);
    }

    if let Some(assessment) = report.final_assessment.as_ref().filter(|a| !a.is_empty()) {
        let mut section = Section::new(Some("Final Assessment".to_string()));
        if let Some(risk) = &assessment.overall_risk {
            section.push(Block::key_value("Overall Risk", risk.as_str(), 4.0, BODY_STYLE));
        }
        if let Some(comment) = &assessment.comment {
            section.push(Block::paragraph(comment.as_str(), 4.0, BODY_STYLE));
        }
        section.gap_after = 6.0;
        sections.push(section);
    }

    sections.push(footer(template));

    Document { title, sections }
}

fn header(title: &str, template: &ReportTemplate) -> Section {
    let mut section = Section::new(None);
    section.push(Block::paragraph(template.brand.as_str(), 0.0, BRAND_STYLE).with_gap(2.0));
    section.push(Block::paragraph(template.subtitle.as_str(), 0.0, SUBTITLE_STYLE).with_gap(2.0));
    section.push(Block::paragraph(title, 0.0, TITLE_STYLE).with_gap(4.0));
    section.push(Block::divider(HEADER_RULE).with_gap(8.0));
    section
}

fn footer(template: &ReportTemplate) -> Section {
    let mut section = Section::new(None);
    section.push(
        Block::paragraph(format!("Generated by {}", template.brand), 0.0, FOOTER_STYLE)
            .with_gap(1.0),
    );
    // Sign-off lines are fixed; they bypass wrapping.
    section.push(Block::paragraph(
        vec![
            "With regards,".to_string(),
            format!("The {} Team", template.brand),
        ],
        0.0,
        FOOTER_STYLE,
    ));
    section
}
