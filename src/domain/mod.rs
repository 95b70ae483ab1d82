//! Domain layer - the LMSR market engine.
//!
//! Pure pricing logic with no I/O (hexagonal architecture inner ring).
//! Everything here is synchronous, bounded-time arithmetic.

pub mod error;
pub mod lmsr;
pub mod market;
pub mod outcome;

// Re-export core types for convenience
pub use error::MarketError;
pub use lmsr::LmsrModel;
pub use market::Market;
pub use outcome::Outcome;
