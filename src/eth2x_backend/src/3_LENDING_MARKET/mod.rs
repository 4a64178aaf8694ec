//! Lending Market - External collaborator boundary
//!
//! The vault's collateral and debt live in an external lending market.
//! This zone only describes what the engine needs from it; the host supplies
//! the implementation.
//!
//! ## Contract
//! - Amounts are in each asset's native smallest unit
//! - Valuations are in the market's base currency, USD with 8 decimals
//!   (`BASE_CURRENCY_DECIMALS`); the engine never assumes the oracle shares
//!   that scale
//! - Calls are synchronous and immediately consistent within one invocation

pub mod oracle;

use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use crate::infrastructure::errors::{ExternalError, VaultError};
use crate::types::{AccountSnapshot, TrackedAsset};

pub use oracle::PriceOracle;

/// Rejection reported by an external collaborator
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CallFault {
    pub message: String,
}

impl CallFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::fmt::Display for CallFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

pub type CallResult<T> = std::result::Result<T, CallFault>;

/// Map a rejected state-changing call onto the vault's error taxonomy
pub fn call_failure(operation: &str, fault: CallFault) -> VaultError {
    log::warn!("❌ {} failed: {}", operation, fault);
    VaultError::External(ExternalError::ExternalCallFailure {
        operation: operation.to_string(),
        reason: fault.message,
    })
}

pub trait LendingMarket {
    /// Deposit `amount` of `asset` as collateral for `on_behalf_of`
    fn supply(&mut self, asset: TrackedAsset, amount: u128, on_behalf_of: Principal) -> CallResult<()>;

    /// Borrow against the account's collateral; must fail past the LTV limit
    fn borrow(&mut self, asset: TrackedAsset, amount: u128, on_behalf_of: Principal) -> CallResult<()>;

    /// Returns the amount actually repaid (never more than the outstanding debt)
    fn repay(&mut self, asset: TrackedAsset, amount: u128, on_behalf_of: Principal) -> CallResult<u128>;

    /// Withdraw collateral owned by the vault to `to`; must fail if it would
    /// leave the account liquidatable
    fn withdraw(&mut self, asset: TrackedAsset, amount: u128, to: Principal) -> CallResult<u128>;

    fn get_account_snapshot(&self, account: Principal) -> CallResult<AccountSnapshot>;
}
