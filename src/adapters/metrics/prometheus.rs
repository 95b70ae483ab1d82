//! Prometheus Metrics Registry - Market Observability
//!
//! Tracks the live market (price, inventory, liquidity) and the trade
//! flow (counts, costs, rejections). Exposed on `/metrics` via axum.

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use prometheus::{
    Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::domain::Outcome;
use crate::usecases::session::{MarketSession, TradeRecord};

/// Centralized Prometheus metrics for the market maker.
///
/// All metrics follow the naming convention `lmsr_market_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Current YES marginal price.
    pub price_yes: Gauge,
    /// Contracts issued per outcome.
    pub inventory: GaugeVec,
    /// Liquidity parameter of the open market.
    pub liquidity: Gauge,
    /// Executed trades per outcome.
    pub trades: IntCounterVec,
    /// Cost charged per trade.
    pub trade_cost: Histogram,
    /// Requests refused before reaching the engine, by reason.
    pub rejected: IntCounterVec,
    /// Sessions opened since start.
    pub sessions_opened: IntCounter,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let price_yes = Gauge::new(
            "lmsr_market_price_yes",
            "Current marginal price of the YES contract",
        )?;

        let inventory = GaugeVec::new(
            Opts::new(
                "lmsr_market_inventory",
                "Contracts issued by the market maker",
            ),
            &["outcome"],
        )?;

        let liquidity = Gauge::new(
            "lmsr_market_liquidity",
            "LMSR liquidity parameter b",
        )?;

        let trades = IntCounterVec::new(
            Opts::new("lmsr_market_trades_total", "Total trades executed"),
            &["outcome"],
        )?;

        let trade_cost = Histogram::with_opts(
            HistogramOpts::new(
                "lmsr_market_trade_cost",
                "Cost charged per trade",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 100.0]),
        )?;

        let rejected = IntCounterVec::new(
            Opts::new(
                "lmsr_market_rejected_total",
                "Requests rejected before execution",
            ),
            &["reason"],
        )?;

        let sessions_opened = IntCounter::new(
            "lmsr_market_sessions_opened_total",
            "Market sessions opened",
        )?;

        // Register all metrics
        registry.register(Box::new(price_yes.clone()))?;
        registry.register(Box::new(inventory.clone()))?;
        registry.register(Box::new(liquidity.clone()))?;
        registry.register(Box::new(trades.clone()))?;
        registry.register(Box::new(trade_cost.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(sessions_opened.clone()))?;

        Ok(Self {
            registry,
            price_yes,
            inventory,
            liquidity,
            trades,
            trade_cost,
            rejected,
            sessions_opened,
        })
    }

    /// Reset market gauges for a newly opened session.
    pub fn observe_open(&self, session: &MarketSession) {
        self.sessions_opened.inc();
        self.liquidity.set(session.market().liquidity());
        self.observe_state(session);
    }

    /// Record an executed trade and the resulting market state.
    pub fn observe_trade(&self, session: &MarketSession, record: &TradeRecord) {
        self.trades
            .with_label_values(&[record.outcome.as_label()])
            .inc();
        self.trade_cost.observe(record.cost);
        self.observe_state(session);
    }

    /// Count a refused request.
    pub fn observe_rejection(&self, reason: &str) {
        self.rejected.with_label_values(&[reason]).inc();
    }

    fn observe_state(&self, session: &MarketSession) {
        let (q_yes, q_no) = session.inventory();
        self.price_yes.set(session.price(Outcome::Yes));
        self.inventory
            .with_label_values(&[Outcome::Yes.as_label()])
            .set(q_yes);
        self.inventory
            .with_label_values(&[Outcome::No.as_label()])
            .set(q_no);
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move {
                    match metrics.render() {
                        Ok(body) => (StatusCode::OK, body),
                        Err(e) => {
                            warn!(error = %e, "Failed to encode metrics");
                            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
                        }
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
