//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod admin;
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod stable_storage;

// Re-export commonly used items
pub use constants::*;
pub use errors::{
    Result, VaultError, MintError, RedeemError, RebalanceError, CalculationError,
    ExternalError, TradingError, AccessError, LedgerError, ValidationError, StorageError,
};
pub use math::{mul_div, mul_div_ceil, checked_net_value, to_canonical_scale};
pub use config::VaultConfig;
pub use admin::{AccessPolicy, AdminAction, AdminState};
pub use stable_storage::{save_state, restore_state, VaultState};
