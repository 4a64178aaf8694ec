//! # Swap Execution Module
//!
//! Exact-input swaps between the reference and quote assets, used by
//! rebalancing (lever and delever) and by redeem's debt unwinding.
//!
//! ## Swap Flow
//! 1. Validate inputs
//! 2. Estimate output from the operation's snapshot prices
//! 3. Derive the minimum from the slippage tolerance
//! 4. Call the venue's `swap_exact_in`
//! 5. Re-check the output against the minimum
//!
//! ## Key Constraints
//! - **Snapshot prices only**: the estimate uses the prices frozen at the
//!   start of the operation, never a fresh oracle read
//! - **Slippage Protected**: every swap carries a minimum output

use candid::CandidType;
use serde::{Deserialize, Serialize};
use crate::_3_LENDING_MARKET::{call_failure, CallResult};
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::constants::MAX_SLIPPAGE_BPS;
use crate::infrastructure::errors::{Result, TradingError, VaultError};
use crate::types::{PositionSnapshot, TrackedAsset};
use super::slippage::{calculate_min_receive, estimate_output, validate_swap_result};

/// Exact-input swap venue
pub trait SwapVenue {
    /// Swap all of `amount_in`; must fail if the output would be below
    /// `min_amount_out`. Returns the amount received.
    fn swap_exact_in(
        &mut self,
        asset_in: TrackedAsset,
        asset_out: TrackedAsset,
        amount_in: u128,
        min_amount_out: u128,
        fee_tier: u32,
    ) -> CallResult<u128>;
}

/// Record of one executed swap
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub asset_in: TrackedAsset,
    pub asset_out: TrackedAsset,
    pub amount_in: u128,
    pub expected_out: u128,
    pub min_out: u128,
    pub amount_out: u128,
}

/// Execute an exact-input swap priced off `position`
///
/// ## Returns
/// - `Ok(SwapOutcome)` with the amount actually received
/// - `Err(ExternalCallFailure)` if the venue rejects the swap
/// - `Err(SlippageExceeded)` if the venue returned less than the minimum
pub fn execute_swap<S: SwapVenue>(
    venue: &mut S,
    asset_in: TrackedAsset,
    amount_in: u128,
    asset_out: TrackedAsset,
    position: &PositionSnapshot,
    config: &VaultConfig,
) -> Result<SwapOutcome> {
    // === STEP 1: Validate Inputs ===
    validate_swap_params(asset_in, amount_in, asset_out, config.swap_slippage_bps)?;

    // === STEP 2: Estimate Output ===
    let expected_out = estimate_output(
        amount_in,
        asset_in,
        position.price_of(asset_in),
        asset_out,
        position.price_of(asset_out),
    )?;

    // === STEP 3: Minimum ===
    let min_out = calculate_min_receive(expected_out, config.swap_slippage_bps)?;

    log::info!(
        "🔄 Executing swap: {} {} → {} (expected {}, min {})",
        amount_in,
        asset_in,
        asset_out,
        expected_out,
        min_out
    );

    // === STEP 4: Execute Swap ===
    let amount_out = venue
        .swap_exact_in(asset_in, asset_out, amount_in, min_out, config.swap_fee_tier)
        .map_err(|fault| call_failure("swap_exact_in", fault))?;

    // === STEP 5: Validate Result ===
    validate_swap_result(expected_out, min_out, amount_out)?;

    log::info!(
        "✅ Swap complete: {} {} → {} {}",
        amount_in,
        asset_in,
        amount_out,
        asset_out
    );

    Ok(SwapOutcome {
        asset_in,
        asset_out,
        amount_in,
        expected_out,
        min_out,
        amount_out,
    })
}

/// Validate swap parameters before execution
///
/// Checks:
/// - Amount in > 0
/// - Slippage within `MAX_SLIPPAGE_BPS`
/// - Assets are different
pub fn validate_swap_params(
    asset_in: TrackedAsset,
    amount_in: u128,
    asset_out: TrackedAsset,
    slippage_bps: u32,
) -> Result<()> {
    if amount_in == 0 {
        return Err(VaultError::Trading(TradingError::InvalidSwapAmount {
            reason: "amount in must be greater than zero".to_string(),
        }));
    }

    if slippage_bps > MAX_SLIPPAGE_BPS {
        return Err(VaultError::Trading(TradingError::InvalidSwapAmount {
            reason: format!(
                "slippage must be at most {} bps, got {} bps",
                MAX_SLIPPAGE_BPS, slippage_bps
            ),
        }));
    }

    if asset_in == asset_out {
        return Err(VaultError::Trading(TradingError::InvalidSwapAmount {
            reason: "assets in and out must be different".to_string(),
        }));
    }

    Ok(())
}
