//! API server state

use std::path::PathBuf;
use std::sync::Arc;

use crate::storage::TodoStore;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Todo repository
    pub store: Arc<dyn TodoStore>,

    /// Service name reported by `/health`
    pub service: String,

    /// Directory of pre-built front-end assets
    pub assets_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            service: "api".to_string(),
            assets_dir: PathBuf::from("./public"),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }
}
