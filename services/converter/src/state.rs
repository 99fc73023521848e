//! Application state shared across handlers

use std::sync::Arc;

use common::{request_id::RequestIdGenerator, storage::ArtifactStore};

use crate::clickthrough::ClickthroughResolver;
use crate::config::AppConfig;
use crate::overlay::LBarRenderer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ArtifactStore,
    pub ids: RequestIdGenerator,
    pub resolver: ClickthroughResolver,
    pub renderer: LBarRenderer,
    /// Client used to fetch VAST documents by URL
    pub http: reqwest::Client,
}
