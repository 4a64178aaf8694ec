//! Leverage engine
//!
//! Computes the collateral / debt ratio and plans the adjustment that moves
//! the position toward the target ratio. Planning is pure: it works on one
//! `PositionSnapshot` and never touches an adapter.
//!
//! ## Direction
//! - `ratio > target`: under-levered, borrow quote asset and buy collateral
//! - `ratio <= target`: over-levered, sell collateral and repay debt
//!
//! One step may close only part of the gap (borrow capacity, liquidation
//! threshold). Callers repeat with a fresh snapshot.

use candid::CandidType;
use serde::{Deserialize, Serialize};
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::constants::{BPS_DENOMINATOR, LEVERAGE_RATIO_SENTINEL, WAD};
use crate::infrastructure::errors::Result;
use crate::infrastructure::math::{bps_of, mul_div, mul_div_ceil};
use crate::types::{AccountSnapshot, PositionSnapshot, TrackedAsset};
use super::position_snapshot::value_to_amount;

/// Adjustment chosen for one rebalance step
///
/// Values are base currency (e8); amounts are native units of the asset
/// that leaves the lending market first.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum RebalanceAction {
    None,
    /// Borrow `borrow_amount` USDC, buy WETH, supply it
    Lever { borrow_value: u128, borrow_amount: u128 },
    /// Withdraw `withdraw_amount` WETH, sell it, repay USDC
    Delever { withdraw_value: u128, withdraw_amount: u128 },
}

/// Collateral / debt in WAD; `LEVERAGE_RATIO_SENTINEL` while there is no debt
pub fn leverage_ratio(account: &AccountSnapshot) -> Result<u128> {
    if account.debt_value == 0 {
        return Ok(LEVERAGE_RATIO_SENTINEL);
    }
    mul_div(account.collateral_value, WAD, account.debt_value)
}

/// True when `ratio` sits inside the no-op band around `target`
pub fn within_tolerance(ratio: u128, target: u128, tolerance_bps: u32) -> Result<bool> {
    if ratio == LEVERAGE_RATIO_SENTINEL {
        return Ok(false);
    }
    let band = bps_of(target, tolerance_bps)?;
    Ok(ratio.abs_diff(target) <= band)
}

/// Plan the next adjustment step for `position`
pub fn plan_adjustment(position: &PositionSnapshot, config: &VaultConfig) -> Result<RebalanceAction> {
    let account = &position.account;
    let ratio = leverage_ratio(account)?;
    let target = config.target_ratio_wad;

    if within_tolerance(ratio, target, config.rebalance_tolerance_bps)? {
        log::debug!("⚖️ Ratio {} within {} bps of target {}", ratio, config.rebalance_tolerance_bps, target);
        return Ok(RebalanceAction::None);
    }

    if ratio > target {
        plan_lever(position, target)
    } else {
        plan_delever(position, target)
    }
}

fn plan_lever(position: &PositionSnapshot, target: u128) -> Result<RebalanceAction> {
    let account = &position.account;

    let target_debt = mul_div(account.collateral_value, WAD, target)?;
    let gap = target_debt.saturating_sub(account.debt_value);
    let borrow_value = gap.min(account.available_borrow);

    if borrow_value < gap {
        log::info!(
            "📉 Borrow capped by lending market: wanted {} (e8), available {} (e8)",
            gap,
            account.available_borrow
        );
    }

    // Price correction: base-currency value to USDC units
    let borrow_amount = value_to_amount(borrow_value, TrackedAsset::USDC, position.quote_price)?;
    if borrow_amount == 0 {
        return Ok(RebalanceAction::None);
    }

    log::info!(
        "📈 Lever signal: borrow {} USDC (${} e8) toward target debt {} (e8)",
        borrow_amount,
        borrow_value,
        target_debt
    );

    Ok(RebalanceAction::Lever { borrow_value, borrow_amount })
}

fn plan_delever(position: &PositionSnapshot, target: u128) -> Result<RebalanceAction> {
    let account = &position.account;

    // Withdrawing w and repaying w lands on target when (C − w) / (D − w) = t,
    // i.e. w = (t·D − C) / (t − 1)
    let target_collateral = mul_div(account.debt_value, target, WAD)?;
    let shortfall = target_collateral.saturating_sub(account.collateral_value);
    let gap = mul_div(shortfall, WAD, target.saturating_sub(WAD))?;

    let withdrawable = max_withdrawable_value(account)?;
    let withdraw_value = gap.min(withdrawable);

    if withdraw_value < gap {
        log::info!(
            "📉 Withdrawal capped by liquidation threshold: wanted {} (e8), withdrawable {} (e8)",
            gap,
            withdrawable
        );
    }

    let withdraw_amount = value_to_amount(withdraw_value, TrackedAsset::WETH, position.reference_price)?;
    if withdraw_amount == 0 {
        if gap > 0 {
            log::warn!("⚠️ Over-levered but no collateral can be withdrawn safely");
        }
        return Ok(RebalanceAction::None);
    }

    log::info!(
        "📉 Delever signal: withdraw {} wei (${} e8) toward target collateral {} (e8)",
        withdraw_amount,
        withdraw_value,
        target_collateral
    );

    Ok(RebalanceAction::Delever { withdraw_value, withdraw_amount })
}

/// Collateral value that can leave while keeping `debt <= collateral × threshold`
pub fn max_withdrawable_value(account: &AccountSnapshot) -> Result<u128> {
    if account.debt_value == 0 {
        return Ok(account.collateral_value);
    }
    if account.liquidation_threshold_bps == 0 {
        return Ok(0);
    }
    let required_collateral = mul_div_ceil(
        account.debt_value,
        BPS_DENOMINATOR,
        account.liquidation_threshold_bps as u128,
    )?;
    Ok(account.collateral_value.saturating_sub(required_collateral))
}
