//! Null Journal - Discards Every Entry
//!
//! Used when `[journal] enabled = false`.

use anyhow::Result;
use async_trait::async_trait;

use crate::ports::journal::{JournalEntry, TradeJournal};

/// Journal that accepts and drops all entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullJournal;

#[async_trait]
impl TradeJournal for NullJournal {
    async fn append(&self, _entry: &JournalEntry) -> Result<()> {
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_accepts_everything() {
        let entry = JournalEntry::SessionOpened {
            session_id: Uuid::new_v4(),
            liquidity: 10.0,
            initial_price_yes: 0.5,
            q_yes: 0.0,
            q_no: 0.0,
            timestamp_ms: 0,
        };
        assert!(tokio_test::block_on(NullJournal.append(&entry)).is_ok());
        assert!(tokio_test::block_on(NullJournal.is_healthy()));
    }
}
