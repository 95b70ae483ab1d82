//! Journal Adapters - Session Audit Sinks
//!
//! Implements the `TradeJournal` port with append-only JSONL files,
//! plus a no-op sink for runs with journaling disabled.

pub mod jsonl;
pub mod null;

pub use jsonl::JsonlJournal;
pub use null::NullJournal;
