use std::sync::Arc;

use crate::config::Config;
use crate::selection::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Every open upload widget. Sessions share the rule and uploader built from `config`.
    pub sessions: Arc<SessionRegistry>,
}
