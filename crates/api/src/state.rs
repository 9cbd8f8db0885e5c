use std::sync::Arc;

use obrisk_predictor::Predictor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: obrisk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Risk scoring backend (script or model service).
    pub predictor: Arc<dyn Predictor>,
}
