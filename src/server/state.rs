use crate::advisor::Advisor;
use crate::registry::Registry;
use std::sync::Arc;

pub struct AppState {
    pub registry: Arc<Registry>,
    /// Absent when no API key is configured; AI routes answer 503.
    pub advisor: Option<Arc<Advisor>>,
}
