//! Shared data types

pub mod context;
pub mod position;
pub mod receipts;
pub mod tokens;

pub use context::CallContext;
pub use position::{AccountSnapshot, PositionSnapshot, Price};
pub use receipts::{MintReceipt, RedeemReceipt};
pub use tokens::TrackedAsset;
