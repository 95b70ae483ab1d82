//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates the domain engine for its callers.
//!
//! Use cases:
//! - `MarketSession`: one market plus its price history and trades
//! - `Simulator`: console commands dispatched to a session and its sinks

pub mod session;
pub mod simulator;

pub use session::{MarketSession, SessionError, SessionSummary, TradeRecord};
pub use simulator::{CommandError, Reply, Simulator};
