//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use heart_predictor::domain::ports::Classifier;
use heart_predictor::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) classifier: Arc<dyn Classifier>,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration around the loaded classifier.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            bind_addr,
            classifier,
            allowed_origins: Vec::new(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one, accounts and predictions are kept in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Restrict CORS to the given origins. An empty list allows any origin.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}
