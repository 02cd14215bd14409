// file: src/server/mod.rs
// description: http server state and entry point
// reference: shared state behind an arc, axum serve loop

pub mod error;
pub mod handlers;
pub mod router;

use crate::config::Config;
use crate::error::Result;
use crate::store::CorpusStore;
use std::sync::Arc;
use tracing::info;

pub use router::build_router;

/// Everything handlers can reach. Cloning is cheap; the store is the only
/// shared mutable piece.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CorpusStore>,
    pub config: Arc<Config>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(CorpusStore::new()),
            config: Arc::new(config),
        }
    }
}

/// Binds the listener and serves the api until the process exits.
pub async fn run(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
