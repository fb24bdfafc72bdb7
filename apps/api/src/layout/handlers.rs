//! Axum route handlers for the report layout API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{
    compose_document, layout_document, LayoutOptions, LayoutSummary, ReportTemplate,
};
use crate::models::report::Report;
use crate::render::{CommandRecorder, RenderCommand, RenderError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub render_id: Uuid,
    pub summary: LayoutSummary,
    pub commands: Vec<RenderCommand>,
}

/// POST /api/v1/reports/layout
///
/// Lays out a contract-summary report and returns the ordered draw and
/// page-break commands for a renderer to replay.
pub async fn handle_layout_report(
    State(state): State<AppState>,
    Json(report): Json<Report>,
) -> Result<Json<LayoutResponse>, AppError> {
    if report.title.is_none() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let render_id = Uuid::new_v4();
    let options = state.layout.clone();
    let template = state.template.clone();
    let max_pages = state.config.max_pages;

    // CPU-bound pass; spawn_blocking to avoid blocking the async executor.
    let (summary, commands) = tokio::task::spawn_blocking(move || {
        render_report(&report, &options, &template, max_pages)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))??;

    info!(
        %render_id,
        pages = summary.page_count,
        lines = summary.lines_drawn,
        orphan_breaks = summary.orphan_page_breaks,
        "Report laid out"
    );

    Ok(Json(LayoutResponse {
        render_id,
        summary,
        commands,
    }))
}

/// Composes and lays out `report` against a fresh recorder.
pub fn render_report(
    report: &Report,
    options: &LayoutOptions,
    template: &ReportTemplate,
    max_pages: Option<usize>,
) -> Result<(LayoutSummary, Vec<RenderCommand>), RenderError> {
    let doc = compose_document(report, template);
    let mut recorder = CommandRecorder::new(options.page.page_height).with_max_pages(max_pages);
    let summary = layout_document(&doc, options, &mut recorder)?;
    Ok((summary, recorder.into_commands()))
}
