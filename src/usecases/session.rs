//! Market Session - One Market Plus Its Trading History
//!
//! A session is the caller-owned context around a single `Market`:
//! the YES price after every event, the executed trade records and
//! a trade counter. Reopening a market means building a new session.
//!
//! The session is stricter than the engine: it rejects non-positive
//! quantities instead of turning them into zero-cost no-ops, and it
//! bounds the opening price to [0.01, 0.99].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Market, MarketError, Outcome};

/// Lowest opening YES price a session accepts.
pub const MIN_INITIAL_PRICE: f64 = 0.01;
/// Highest opening YES price a session accepts.
pub const MAX_INITIAL_PRICE: f64 = 0.99;

/// Errors raised at the session boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The engine rejected the call.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// Trade quantities must be strictly positive.
    #[error("quantity must be > 0, got {0}")]
    NonPositiveQuantity(f64),

    /// Opening price outside [0.01, 0.99].
    #[error("initial YES price must be between {MIN_INITIAL_PRICE} and {MAX_INITIAL_PRICE}, got {0}")]
    InitialPriceOutOfRange(f64),
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Unique trade identifier.
    pub id: Uuid,
    /// 1-based trade number within the session.
    pub sequence: u64,
    /// Outcome bought.
    pub outcome: Outcome,
    /// Contracts bought.
    pub quantity: f64,
    /// Amount owed to the market maker.
    pub cost: f64,
    /// YES price just before the trade.
    pub price_yes_before: f64,
    /// YES price just after the trade.
    pub price_yes_after: f64,
    /// YES inventory after the trade.
    pub q_yes: f64,
    /// NO inventory after the trade.
    pub q_no: f64,
    /// Timestamp (Unix ms).
    pub timestamp_ms: i64,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub liquidity: f64,
    pub trade_count: u64,
    /// Sum of all trade costs collected by the market maker.
    pub total_cost: f64,
    pub price_yes: f64,
    pub q_yes: f64,
    pub q_no: f64,
    /// Cost function `C(q_yes, q_no)` at the current inventory.
    pub cost_function: f64,
}

/// Caller-owned trading session around one market.
#[derive(Debug, Clone)]
pub struct MarketSession {
    id: Uuid,
    opened_at: DateTime<Utc>,
    initial_price_yes: f64,
    market: Market,
    price_history: Vec<f64>,
    trades: Vec<TradeRecord>,
}

impl MarketSession {
    /// Open a market with liquidity `b` whose YES price starts at
    /// `initial_price_yes`.
    ///
    /// # Errors
    /// `InitialPriceOutOfRange` outside [0.01, 0.99]; `Market` when the
    /// engine rejects `b`.
    pub fn open(b: f64, initial_price_yes: f64) -> Result<Self, SessionError> {
        if !(MIN_INITIAL_PRICE..=MAX_INITIAL_PRICE).contains(&initial_price_yes) {
            return Err(SessionError::InitialPriceOutOfRange(initial_price_yes));
        }

        let market = Market::with_price(b, initial_price_yes)?;
        let session = Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            initial_price_yes,
            market,
            price_history: vec![initial_price_yes],
            trades: Vec::new(),
        };

        let (q_yes, q_no) = session.market.inventory();
        info!(
            session_id = %session.id,
            liquidity = b,
            price_yes = initial_price_yes,
            q_yes,
            q_no,
            "Market session opened"
        );
        Ok(session)
    }

    /// Buy `quantity` contracts of `outcome` and record the trade.
    ///
    /// # Errors
    /// `NonPositiveQuantity` for `quantity <= 0` or NaN; `Market` if the
    /// engine refuses the trade. No state changes on error.
    pub fn execute_trade(
        &mut self,
        outcome: Outcome,
        quantity: f64,
    ) -> Result<&TradeRecord, SessionError> {
        if quantity.is_nan() || quantity <= 0.0 {
            return Err(SessionError::NonPositiveQuantity(quantity));
        }

        let price_yes_before = self.market.price(Outcome::Yes);
        let cost = self.market.buy(outcome, quantity)?;
        let price_yes_after = self.market.price(Outcome::Yes);
        let (q_yes, q_no) = self.market.inventory();

        let record = TradeRecord {
            id: Uuid::new_v4(),
            sequence: self.trade_count() + 1,
            outcome,
            quantity,
            cost,
            price_yes_before,
            price_yes_after,
            q_yes,
            q_no,
            timestamp_ms: Utc::now().timestamp_millis(),
        };

        debug!(
            session_id = %self.id,
            sequence = record.sequence,
            %outcome,
            quantity,
            cost,
            price_yes = price_yes_after,
            "Trade executed"
        );

        self.price_history.push(price_yes_after);
        self.trades.push(record);
        Ok(&self.trades[self.trades.len() - 1])
    }

    /// Cost of a prospective trade, without executing it.
    ///
    /// # Errors
    /// Same validation as [`Self::execute_trade`].
    pub fn quote(&self, outcome: Outcome, quantity: f64) -> Result<f64, SessionError> {
        if quantity.is_nan() || quantity <= 0.0 {
            return Err(SessionError::NonPositiveQuantity(quantity));
        }
        Ok(self.market.quote(outcome, quantity)?)
    }

    /// Current price of `outcome`.
    pub fn price(&self, outcome: Outcome) -> f64 {
        self.market.price(outcome)
    }

    /// Current `(q_yes, q_no)`.
    pub const fn inventory(&self) -> (f64, f64) {
        self.market.inventory()
    }

    /// YES price at open followed by the YES price after each trade.
    pub fn price_history(&self) -> &[f64] {
        &self.price_history
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn trade_count(&self) -> u64 {
        self.trades.len() as u64
    }

    pub const fn market(&self) -> &Market {
        &self.market
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub const fn initial_price_yes(&self) -> f64 {
        self.initial_price_yes
    }

    /// Aggregate view for reporting.
    pub fn summary(&self) -> SessionSummary {
        let (q_yes, q_no) = self.market.inventory();
        SessionSummary {
            session_id: self.id,
            opened_at: self.opened_at,
            liquidity: self.market.liquidity(),
            trade_count: self.trade_count(),
            total_cost: self.trades.iter().map(|t| t.cost).sum(),
            price_yes: self.market.price(Outcome::Yes),
            q_yes,
            q_no,
            cost_function: self.market.cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_records_initial_price() {
        let session = MarketSession::open(10.0, 0.5).unwrap();
        assert_eq!(session.price_history(), &[0.5]);
        assert_eq!(session.trade_count(), 0);
        assert_eq!(session.inventory(), (0.0, 0.0));
    }

    #[test]
    fn test_open_rejects_price_outside_session_bounds() {
        assert_eq!(
            MarketSession::open(10.0, 0.995).unwrap_err(),
            SessionError::InitialPriceOutOfRange(0.995)
        );
        assert!(MarketSession::open(10.0, 0.0).is_err());
    }

    #[test]
    fn test_open_rejects_bad_liquidity() {
        let err = MarketSession::open(0.0, 0.5).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Market(MarketError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_trade_appends_history() {
        let mut session = MarketSession::open(10.0, 0.5).unwrap();
        let record = session.execute_trade(Outcome::Yes, 2.0).unwrap().clone();
        assert_eq!(record.sequence, 1);
        assert!((record.price_yes_before - 0.5).abs() < 1e-12);
        assert!(record.price_yes_after > record.price_yes_before);
        assert_eq!(session.price_history().len(), 2);
        assert_eq!(session.price_history()[1], record.price_yes_after);

        session.execute_trade(Outcome::No, 4.0).unwrap();
        assert_eq!(session.trade_count(), 2);
        assert_eq!(session.trades()[1].sequence, 2);
        assert!(session.price_history()[2] < session.price_history()[1]);
    }

    #[test]
    fn test_non_positive_quantity_rejected_without_side_effects() {
        let mut session = MarketSession::open(10.0, 0.4).unwrap();
        let inventory = session.inventory();
        assert_eq!(
            session.execute_trade(Outcome::Yes, 0.0).unwrap_err(),
            SessionError::NonPositiveQuantity(0.0)
        );
        assert!(session.execute_trade(Outcome::No, -5.0).is_err());
        assert!(session.quote(Outcome::No, -1.0).is_err());
        assert_eq!(session.inventory(), inventory);
        assert_eq!(session.price_history().len(), 1);
        assert_eq!(session.trade_count(), 0);
    }

    #[test]
    fn test_summary_totals_costs() {
        let mut session = MarketSession::open(20.0, 0.5).unwrap();
        let a = session.execute_trade(Outcome::Yes, 3.0).unwrap().cost;
        let b = session.execute_trade(Outcome::Yes, 1.0).unwrap().cost;
        let summary = session.summary();
        assert_eq!(summary.trade_count, 2);
        assert!((summary.total_cost - (a + b)).abs() < 1e-12);
        assert_eq!(summary.q_yes, 4.0);
        assert_eq!(summary.session_id, session.id());
        assert_eq!(summary.opened_at, session.opened_at());
    }

    #[test]
    fn test_summary_cost_function_tracks_collected() {
        // From an even book, C rises by exactly what traders paid.
        let mut session = MarketSession::open(10.0, 0.5).unwrap();
        let opening = session.summary().cost_function;
        assert!((opening - 10.0 * 2.0_f64.ln()).abs() < 1e-12);

        session.execute_trade(Outcome::Yes, 2.0).unwrap();
        session.execute_trade(Outcome::No, 5.0).unwrap();
        let summary = session.summary();
        assert!((summary.cost_function - opening - summary.total_cost).abs() < 1e-9);
    }
}
