//! Unwinds a redeemer's share of the debt before collateral leaves the vault
//!
//! The debt share is repaid in `redeem_repay_legs` legs of
//! withdraw WETH → swap to USDC → repay. Each leg only withdraws what that
//! leg repays, so the position never carries the whole withdrawal against
//! the whole debt at once. The leg count is a tunable margin: nothing here
//! proves a given count keeps every intermediate state healthy.

use candid::CandidType;
use serde::{Deserialize, Serialize};
use crate::_1_CRITICAL_OPERATIONS::ExternalAdapters;
use crate::_2_CRITICAL_DATA::position_snapshot::value_to_amount;
use crate::_3_LENDING_MARKET::{call_failure, LendingMarket, PriceOracle};
use crate::_4_TRADING_EXECUTION::{execute_swap, SwapVenue};
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::Result;
use crate::types::{PositionSnapshot, TrackedAsset};

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UnwindSummary {
    pub legs: u8,
    /// WETH withdrawn and sold (wei)
    pub collateral_sold: u128,
    /// USDC repaid
    pub debt_repaid: u128,
}

/// Split `total` into `legs` parts; the last part takes the remainder
pub fn split_into_legs(total: u128, legs: u8) -> Vec<u128> {
    let legs = legs.max(1) as u128;
    let base = total / legs;
    let mut parts = vec![base; legs as usize];
    if let Some(last) = parts.last_mut() {
        *last = total - base * (legs - 1);
    }
    parts.retain(|part| *part > 0);
    parts
}

/// Repay `debt_share_value` (e8) of the vault's debt, priced off `position`
pub fn unwind_debt<M, S, O>(
    adapters: &mut ExternalAdapters<M, S, O>,
    position: &PositionSnapshot,
    debt_share_value: u128,
    config: &VaultConfig,
) -> Result<UnwindSummary>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
{
    let mut summary = UnwindSummary::default();
    if debt_share_value == 0 {
        return Ok(summary);
    }

    let legs = split_into_legs(debt_share_value, config.redeem_repay_legs);
    log::info!(
        "🔻 Unwinding ${} (e8) of debt in {} legs",
        debt_share_value,
        legs.len()
    );

    for (index, leg_value) in legs.iter().enumerate() {
        let withdraw_amount = value_to_amount(*leg_value, TrackedAsset::WETH, position.reference_price)?;
        if withdraw_amount == 0 {
            continue;
        }

        // Withdraw
        let withdrawn = adapters
            .market
            .withdraw(TrackedAsset::WETH, withdraw_amount, adapters.vault_account)
            .map_err(|fault| call_failure("withdraw", fault))?;

        // Swap
        let swap = execute_swap(
            &mut adapters.venue,
            TrackedAsset::WETH,
            withdrawn,
            TrackedAsset::USDC,
            position,
            config,
        )?;

        // Repay
        let repaid = adapters
            .market
            .repay(TrackedAsset::USDC, swap.amount_out, adapters.vault_account)
            .map_err(|fault| call_failure("repay", fault))?;

        log::debug!(
            "  Leg {}: withdrew {} wei, repaid {} USDC",
            index + 1,
            withdrawn,
            repaid
        );

        summary.legs += 1;
        summary.collateral_sold += withdrawn;
        summary.debt_repaid += repaid;
    }

    Ok(summary)
}
