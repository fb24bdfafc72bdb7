use std::sync::Arc;

use crate::config::Config;
use crate::layout::{LayoutOptions, ReportTemplate};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Page geometry, reserve thresholds and styles for every layout pass.
    pub layout: Arc<LayoutOptions>,
    pub template: Arc<ReportTemplate>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let layout = Arc::new(config.layout_options());
        let template = Arc::new(config.report_template());
        Self {
            config,
            layout,
            template,
        }
    }
}
