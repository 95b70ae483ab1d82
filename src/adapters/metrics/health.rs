//! Health Check Server - Liveness and Readiness Probes
//!
//! Exposes /live and /ready endpoints via axum 0.7. Readiness means
//! a market session is open and the process is not shutting down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// Shared health state polled by readiness probes.
#[derive(Debug, Default)]
pub struct HealthState {
    /// A market session is open.
    pub market_open: AtomicBool,
    /// Graceful shutdown has started.
    pub shutting_down: AtomicBool,
}

impl HealthState {
    /// Create a new health state (no market open).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_market_open(&self, open: bool) {
        self.market_open.store(open, Ordering::Relaxed);
    }

    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }

    /// Check if the system is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.market_open.load(Ordering::Relaxed)
            && !self.shutting_down.load(Ordering::Relaxed)
    }
}

/// Axum-based health check HTTP server.
pub struct HealthServer {
    /// Health state shared with the console loop.
    state: Arc<HealthState>,
    /// Bind port (default 8080 from config).
    port: u16,
}

impl HealthServer {
    /// Create a new health server.
    pub const fn new(state: Arc<HealthState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Router serving both probes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/live", get(Self::liveness))
            .route("/ready", get(Self::readiness))
            .with_state(Arc::clone(&self.state))
    }

    /// Run the health check server until shutdown.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(
        self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!(address = %addr, "Health server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }

    /// Liveness probe: always returns 200 if the process is running.
    async fn liveness() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// Readiness probe: 200 once a market is open.
    async fn readiness(
        State(state): State<Arc<HealthState>>,
    ) -> impl IntoResponse {
        if state.is_ready() {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_only_with_open_market() {
        let state = HealthState::new();
        assert!(!state.is_ready());
        state.set_market_open(true);
        assert!(state.is_ready());
        state.begin_shutdown();
        assert!(!state.is_ready());
    }
}
