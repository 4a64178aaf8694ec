//! # Slippage Protection Module
//!
//! Derives swap minimums from an oracle-based output estimate and validates
//! what the venue actually returned.
//!
//! ## Key Functions
//! - `estimate_output`: value-preserving conversion at oracle prices
//! - `calculate_min_receive`: minimum acceptable output for a tolerance
//! - `validate_swap_result`: verify the venue honoured the minimum
//!
//! ## Safety Checks
//! - Positive slippage (getting more than expected) is allowed
//! - A zero estimate disables protection; it is logged, never patched over

use crate::_2_CRITICAL_DATA::position_snapshot::{amount_to_value, value_to_amount};
use crate::infrastructure::constants::BPS_DENOMINATOR;
use crate::infrastructure::errors::{Result, TradingError, VaultError};
use crate::infrastructure::math::mul_div;
use crate::types::TrackedAsset;

/// Expected output of swapping `amount_in` at oracle prices (base currency, e8)
///
/// Both conversions round down, so the estimate never overstates the output.
pub fn estimate_output(
    amount_in: u128,
    asset_in: TrackedAsset,
    price_in: u128,
    asset_out: TrackedAsset,
    price_out: u128,
) -> Result<u128> {
    let value = amount_to_value(amount_in, asset_in, price_in)?;
    value_to_amount(value, asset_out, price_out)
}

/// Calculate minimum acceptable receive amount based on slippage tolerance
///
/// ## Example
/// - Expected: 1_000_000 USDC units
/// - Slippage: 50 bps (0.5%)
/// - Result: 995_000
pub fn calculate_min_receive(expected_amount: u128, slippage_bps: u32) -> Result<u128> {
    if expected_amount == 0 {
        log::warn!("⚠️ Expected output is zero: swap runs without slippage protection");
        return Ok(0);
    }

    let keep_bps = BPS_DENOMINATOR.saturating_sub(slippage_bps as u128);
    mul_div(expected_amount, keep_bps, BPS_DENOMINATOR)
}

/// Validate that swap result meets the minimum
///
/// The venue is required to enforce the minimum itself; this catches a venue
/// that does not.
pub fn validate_swap_result(expected: u128, minimum: u128, actual: u128) -> Result<()> {
    if actual < minimum {
        return Err(VaultError::Trading(TradingError::SlippageExceeded {
            minimum: minimum.to_string(),
            actual: actual.to_string(),
        }));
    }

    if actual >= expected {
        log::debug!("✅ Positive slippage: expected {}, got {}", expected, actual);
    } else {
        log::debug!(
            "✅ Slippage acceptable: expected {}, got {} (minimum {})",
            expected,
            actual,
            minimum
        );
    }

    Ok(())
}
