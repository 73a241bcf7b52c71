pub mod analytics;
pub mod config;
pub mod database;
pub mod domain;
pub mod editor;
pub mod error;
pub mod features;
pub mod parser;
pub mod preview;
pub mod publish;
pub mod render;
pub mod seo;
pub mod services;

#[cfg(test)]
mod tests;

use crate::config::PagesmithConfig;
use crate::services::{AnalyticsService, SiteService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sites: Arc<SiteService>,
    pub analytics: Arc<AnalyticsService>,
    pub config: Arc<PagesmithConfig>,
}
