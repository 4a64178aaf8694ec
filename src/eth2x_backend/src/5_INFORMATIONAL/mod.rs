//! Informational - Human-readable views of the position
//! Read-only; nothing here feeds back into an operation

pub mod display;

pub use display::{build_position_summary, PositionSummary};
