use std::str::FromStr;

use anyhow::{Context, Result};

use crate::layout::font_metrics::FontFamily;
use crate::layout::orchestrator::{LayoutOptions, ReserveThresholds};
use crate::layout::page::PageConfig;
use crate::layout::ReportTemplate;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub page_width: f32,
    pub page_height: f32,
    pub bottom_margin: f32,
    /// Pins the bottom bound of every page regardless of its height.
    pub max_y: Option<f32>,
    pub clause_reserve: f32,
    pub heading_reserve: f32,
    /// Upper bound on pages per report. Unset means unlimited.
    pub max_pages: Option<usize>,
    pub font: FontFamily,
    pub brand: String,
    pub subtitle: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PageConfig::default();
        let reserves = ReserveThresholds::default();
        let template = ReportTemplate::default();

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            page_width: env_or("LAYOUT_PAGE_WIDTH", defaults.page_width)?,
            page_height: env_or("LAYOUT_PAGE_HEIGHT", defaults.page_height)?,
            bottom_margin: env_or("LAYOUT_BOTTOM_MARGIN", defaults.bottom_margin)?,
            max_y: env_opt("LAYOUT_MAX_Y")?,
            clause_reserve: env_or("LAYOUT_CLAUSE_RESERVE", reserves.clause)?,
            heading_reserve: env_or("LAYOUT_HEADING_RESERVE", reserves.heading)?,
            max_pages: match env_opt::<usize>("LAYOUT_MAX_PAGES")? {
                Some(0) => None,
                Some(n) => Some(n),
                None => Some(200),
            },
            font: env_or("LAYOUT_FONT", defaults.font)?,
            brand: std::env::var("REPORT_BRAND").unwrap_or(template.brand),
            subtitle: std::env::var("REPORT_SUBTITLE").unwrap_or(template.subtitle),
        })
    }

    /// Layout options derived from this configuration.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            page: PageConfig {
                page_width: self.page_width,
                page_height: self.page_height,
                bottom_margin: self.bottom_margin,
                explicit_max_y: self.max_y,
                font: self.font,
                ..PageConfig::default()
            },
            reserves: ReserveThresholds {
                clause: self.clause_reserve,
                heading: self.heading_reserve,
            },
            ..LayoutOptions::default()
        }
    }

    pub fn report_template(&self) -> ReportTemplate {
        ReportTemplate {
            brand: self.brand.clone(),
            subtitle: self.subtitle.clone(),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(env_opt(key)?.unwrap_or(default))
}

fn env_opt<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(key, &raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}
