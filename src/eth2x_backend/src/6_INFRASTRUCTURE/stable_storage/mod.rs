//! Stable storage management for upgrade persistence
//!
//! The vault's owned state is candid-encoded into one blob the host keeps
//! across upgrades. External position data is never stored: it lives in the
//! lending market and is re-read on every operation.

use candid::{CandidType, Deserialize};
use serde::Serialize;
use crate::_1_CRITICAL_OPERATIONS::rebalancing::RebalanceState;
use crate::_2_CRITICAL_DATA::share_supply::{ShareLedger, ShareSupply};
use crate::infrastructure::admin::AdminState;
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::errors::{Result, StorageError, VaultError};

/// Everything the vault owns locally
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VaultState {
    pub config: VaultConfig,
    pub shares: ShareSupply,
    pub admin: AdminState,
    pub rebalance: RebalanceState,
}

impl VaultState {
    pub fn new(config: VaultConfig, admin: AdminState) -> Self {
        Self {
            config,
            shares: ShareSupply::new(),
            admin,
            rebalance: RebalanceState::default(),
        }
    }
}

pub fn save_state(state: &VaultState) -> Result<Vec<u8>> {
    let bytes = candid::encode_one(state).map_err(|e| {
        log::warn!("⚠️ Failed to encode vault state: {}", e);
        VaultError::Storage(StorageError::EncodeFailed { reason: e.to_string() })
    })?;

    log::info!(
        "💾 Saved vault state: {} shares across {} holders, {} rebalance records ({} bytes)",
        state.shares.total_supply(),
        state.shares.holder_count(),
        state.rebalance.history.len(),
        bytes.len()
    );

    Ok(bytes)
}

/// Decode a saved state; the stored config is validated like a fresh one
pub fn restore_state(bytes: &[u8]) -> Result<VaultState> {
    let state: VaultState = candid::decode_one(bytes).map_err(|e| {
        log::warn!("⚠️ Failed to decode vault state: {}", e);
        VaultError::Storage(StorageError::DecodeFailed { reason: e.to_string() })
    })?;

    state.config.validate()?;

    log::info!(
        "✅ Restored vault state: {} shares across {} holders",
        state.shares.total_supply(),
        state.shares.holder_count()
    );

    Ok(state)
}
