//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TradeJournal`: Append-only session audit log

pub mod journal;

pub use journal::{JournalEntry, TradeJournal};
