//! LMSR Simulator — Entry Point
//!
//! Interactive terminal front end for a single binary LMSR market.
//! Runs until `quit`, end of input, or SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (or defaults) + validate
//! 2. Init tracing (JSON or pretty, on stderr)
//! 3. Spawn metrics (/metrics) and health (/live, /ready) servers if enabled
//! 4. Open the journal (JSONL or no-op)
//! 5. Open the configured market
//! 6. Read commands from stdin until quit/EOF/SIGINT
//! 7. Graceful shutdown (readiness off → stop servers → exit)

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lmsr_market_maker::adapters::console::Command;
use lmsr_market_maker::adapters::journal::{JsonlJournal, NullJournal};
use lmsr_market_maker::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use lmsr_market_maker::config::loader::{self, DEFAULT_CONFIG_PATH};
use lmsr_market_maker::config::{AppSection, LogFormat};
use lmsr_market_maker::ports::journal::TradeJournal;
use lmsr_market_maker::usecases::simulator::{Reply, Simulator};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => loader::load_config(&path),
        None => loader::load_or_default(DEFAULT_CONFIG_PATH),
    }
    .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    init_tracing(&config.app);

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        liquidity = config.market.liquidity_parameter,
        journal = config.journal.enabled,
        metrics = config.metrics.enabled,
        "Starting LMSR simulator"
    );

    // ── 3. Shutdown channel + observability servers ─────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to create metrics registry")?);

    let mut servers = Vec::new();
    if config.metrics.enabled {
        let metrics_shutdown = shutdown_tx.subscribe();
        let bind = config.metrics.bind_address.clone();
        let registry = Arc::clone(&metrics);
        servers.push(tokio::spawn(async move {
            if let Err(e) = registry.serve(bind, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }));

        let health_server = HealthServer::new(Arc::clone(&health), config.metrics.health_port);
        let health_shutdown = shutdown_tx.subscribe();
        servers.push(tokio::spawn(async move {
            if let Err(e) = health_server.run(health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }));
    }

    // ── 4. Journal ──────────────────────────────────────────
    let journal: Arc<dyn TradeJournal> = if config.journal.enabled {
        Arc::new(
            JsonlJournal::new(&config.journal.data_dir)
                .await
                .context("Failed to open journal")?,
        )
    } else {
        Arc::new(NullJournal)
    };

    let mut simulator = Simulator::new(journal, metrics, Arc::clone(&health));

    // ── 5. Open the configured market ───────────────────────
    if config.market.open_on_start {
        let output = simulator
            .handle(Command::Open {
                liquidity: config.market.liquidity_parameter,
                price_yes: config.market.initial_price_yes,
            })
            .await;
        println!("{output}");
    } else {
        println!("no market open yet: use `open <b> [price_yes]`");
    }

    // ── 6. Console loop ─────────────────────────────────────
    run_console(&mut simulator).await?;

    // ── 7. Graceful shutdown ────────────────────────────────
    health.begin_shutdown();
    let _ = shutdown_tx.send(());
    for handle in servers {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    if let Some(session) = simulator.session() {
        let summary = session.summary();
        info!(
            session_id = %summary.session_id,
            trades = summary.trade_count,
            collected = summary.total_cost,
            price_yes = summary.price_yes,
            "Final session state"
        );
    }

    info!("Shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `app.log_level`. Output goes to stderr so
/// stdout carries only console responses.
fn init_tracing(app: &AppSection) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&app.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match app.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Read stdin line by line until `quit`, EOF or SIGINT.
async fn run_console(simulator: &mut Simulator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("SIGINT received, shutting down");
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("End of input");
                    return Ok(());
                };
                match simulator.handle_line(&line).await {
                    Reply::Print(output) => println!("{output}"),
                    Reply::Nothing => {}
                    Reply::Quit => return Ok(()),
                }
            }
        }
    }
}
