// Report layout engine.
// Text measurer → flow engine → block orchestrator, all synchronous and pure
// apart from the calls they make on a `Renderer`. Handlers run a pass inside
// tokio::task::spawn_blocking.

pub mod composer;
pub mod document;
pub mod flow;
pub mod font_metrics;
pub mod handlers;
pub mod orchestrator;
pub mod page;
pub mod text_measure;

// Re-export the public API consumed by the HTTP layer and state.
pub use composer::{compose_document, ReportTemplate};
pub use orchestrator::{layout_document, LayoutOptions, LayoutSummary};
