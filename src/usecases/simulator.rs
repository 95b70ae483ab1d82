//! Simulator - Console Commands Against One Live Session
//!
//! Owns the current `MarketSession` and fans every executed command out
//! to its sinks: the journal port, the Prometheus registry and the
//! readiness flag. Rejected commands are counted by reason and never
//! journaled.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::adapters::console::{self, Command, HELP};
use crate::adapters::metrics::{HealthState, MetricsRegistry};
use crate::domain::{MarketError, Outcome};
use crate::ports::journal::{JournalEntry, TradeJournal};
use crate::usecases::session::{MarketSession, SessionError};

/// Why a console command was not executed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("no market open, use `open <b> [price_yes]`")]
    NoMarket,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CommandError {
    /// Metric label for the rejection.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NoMarket => "no_market",
            Self::Session(SessionError::NonPositiveQuantity(_)) => "non_positive_quantity",
            Self::Session(SessionError::InitialPriceOutOfRange(_)) => {
                "initial_price_out_of_range"
            }
            Self::Session(SessionError::Market(e)) => match e {
                MarketError::InvalidParameter { .. } => "invalid_parameter",
                MarketError::InvalidOutcome(_) => "invalid_outcome",
                MarketError::SeedAfterTrade => "seed_after_trade",
            },
        }
    }
}

/// What the console should do after one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text and keep reading.
    Print(String),
    /// Blank line, nothing to print.
    Nothing,
    /// Stop the console loop.
    Quit,
}

/// Caller-side context: the current session plus its sinks.
pub struct Simulator {
    session: Option<MarketSession>,
    journal: Arc<dyn TradeJournal>,
    metrics: Arc<MetricsRegistry>,
    health: Arc<HealthState>,
}

impl Simulator {
    /// Create a simulator with no market open.
    pub fn new(
        journal: Arc<dyn TradeJournal>,
        metrics: Arc<MetricsRegistry>,
        health: Arc<HealthState>,
    ) -> Self {
        Self {
            session: None,
            journal,
            metrics,
            health,
        }
    }

    /// The open session, if any.
    pub const fn session(&self) -> Option<&MarketSession> {
        self.session.as_ref()
    }

    /// Parse and execute one raw input line.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(Some(Command::Quit)) => Reply::Quit,
            Ok(Some(command)) => Reply::Print(self.handle(command).await),
            Ok(None) => Reply::Nothing,
            Err(e) => {
                self.metrics.observe_rejection("parse");
                Reply::Print(format!("error: {e}"))
            }
        }
    }

    /// Execute one command and return the text to show.
    pub async fn handle(&mut self, command: Command) -> String {
        match self.dispatch(command).await {
            Ok(output) => output,
            Err(e) => {
                self.metrics.observe_rejection(e.reason());
                warn!(error = %e, "Command rejected");
                format!("error: {e}")
            }
        }
    }

    /// Execute one command against the current session.
    ///
    /// Journal and metrics are updated only for commands that succeed.
    ///
    /// # Errors
    /// `NoMarket` before the first `open`; `Session` when the session
    /// refuses the request.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::Open {
                liquidity,
                price_yes,
            } => {
                let session = MarketSession::open(liquidity, price_yes)?;
                let (q_yes, q_no) = session.inventory();
                self.record(JournalEntry::SessionOpened {
                    session_id: session.id(),
                    liquidity,
                    initial_price_yes: price_yes,
                    q_yes,
                    q_no,
                    timestamp_ms: Utc::now().timestamp_millis(),
                })
                .await;
                self.metrics.observe_open(&session);
                self.health.set_market_open(true);
                let output = console::format_open(&session);
                self.session = Some(session);
                Ok(output)
            }
            Command::Buy { outcome, quantity } => {
                let session = self.session.as_mut().ok_or(CommandError::NoMarket)?;
                let record = session.execute_trade(outcome, quantity)?.clone();
                self.metrics.observe_trade(session, &record);
                let entry = JournalEntry::Trade {
                    session_id: session.id(),
                    record: record.clone(),
                };
                self.record(entry).await;
                Ok(console::format_trade(&record))
            }
            Command::Quote { outcome, quantity } => {
                let cost = self.require_session()?.quote(outcome, quantity)?;
                Ok(format!("cost of {quantity} {outcome}: {cost:.4}"))
            }
            Command::Price(Some(outcome)) => Ok(format!(
                "{outcome}: {:.4}",
                self.require_session()?.price(outcome)
            )),
            Command::Price(None) => {
                let session = self.require_session()?;
                Ok(format!(
                    "YES: {:.4} | NO: {:.4}",
                    session.price(Outcome::Yes),
                    session.price(Outcome::No)
                ))
            }
            Command::Inventory => {
                let (q_yes, q_no) = self.require_session()?.inventory();
                Ok(console::format_inventory(q_yes, q_no))
            }
            Command::History => Ok(console::format_history(
                self.require_session()?.price_history(),
            )),
            Command::Summary => Ok(console::format_summary(
                &self.require_session()?.summary(),
            )),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    fn require_session(&self) -> Result<&MarketSession, CommandError> {
        self.session.as_ref().ok_or(CommandError::NoMarket)
    }

    /// Journal failures are logged, never fatal to the console.
    async fn record(&self, entry: JournalEntry) {
        if let Err(e) = self.journal.append(&entry).await {
            warn!(error = %e, "Failed to write journal entry");
        }
    }
}
