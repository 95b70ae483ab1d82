//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies, and hosts the terminal front end.
//!
//! Adapter categories:
//! - `console`: command parsing and display strings
//! - `journal`: JSONL session journal
//! - `metrics`: Prometheus metrics export and health checks

pub mod console;
pub mod journal;
pub mod metrics;
