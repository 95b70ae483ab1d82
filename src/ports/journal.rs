//! Journal Port - Append-only Session Audit Log
//!
//! Defines the trait the binary uses to record what happened in a
//! session. The journal is write-only: nothing is ever reloaded from
//! it, so a restart always begins with a fresh market.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::usecases::session::TradeRecord;

/// One line of the session journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEntry {
  /// A market was opened (or reopened).
  SessionOpened {
    session_id: Uuid,
    /// Liquidity parameter `b`.
    liquidity: f64,
    /// Seeded opening YES price.
    initial_price_yes: f64,
    /// Inventory after seeding.
    q_yes: f64,
    q_no: f64,
    /// Timestamp (Unix ms).
    timestamp_ms: i64,
  },
  /// A trade was executed.
  Trade {
    session_id: Uuid,
    record: TradeRecord,
  },
}

impl JournalEntry {
  /// Session this entry belongs to.
  pub const fn session_id(&self) -> Uuid {
    match self {
      Self::SessionOpened { session_id, .. } | Self::Trade { session_id, .. } => {
        *session_id
      }
    }
  }
}

/// Sink for session journal entries.
///
/// Implementations must be cheap to call once per trade; each entry
/// should be durable on return.
#[async_trait]
pub trait TradeJournal: Send + Sync + 'static {
  /// Append a single entry.
  async fn append(&self, entry: &JournalEntry) -> anyhow::Result<()>;

  /// Check if the journal can currently accept writes.
  async fn is_healthy(&self) -> bool;
}
