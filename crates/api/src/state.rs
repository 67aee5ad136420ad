use std::sync::Arc;

use chronica_cms::CmsClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable; inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Client for the headless CMS (document + asset store).
    pub cms: Arc<CmsClient>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
