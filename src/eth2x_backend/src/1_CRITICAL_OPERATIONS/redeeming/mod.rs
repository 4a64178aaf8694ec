//! Redeeming module - Burns vault shares for WETH
//! Critical operation that shrinks both the position and the share supply

pub mod debt_unwinder;
pub mod redeem_validator;


use crate::_2_CRITICAL_DATA::share_supply::ShareLedger;
use crate::_2_CRITICAL_DATA::valuation::{calculate_redeem_amount, RedeemQuote};
use crate::_3_LENDING_MARKET::{call_failure, LendingMarket, PriceOracle};
use crate::_4_TRADING_EXECUTION::SwapVenue;
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::Result;
use crate::types::{CallContext, RedeemReceipt, TrackedAsset};
use super::ExternalAdapters;

// Main redeem orchestration function
//
// REDEEM FLOW:
// 1. Validate amount and the caller's share balance (no external call yet)
// 2. Read ONE position snapshot; every number below comes from it
// 3. Quote the payout, including the collateral sufficiency check
// 4. Unwind the redeemer's share of debt in legs (withdraw → swap → repay)
// 5. Withdraw the payout to the redeemer
// 6. Burn the shares
//
// Shares are burned last: a failure anywhere above leaves the ledger as it was.
pub fn redeem<M, S, O, L>(
    ctx: &CallContext,
    share_amount: u128,
    adapters: &mut ExternalAdapters<M, S, O>,
    ledger: &mut L,
    config: &VaultConfig,
) -> Result<RedeemReceipt>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
    L: ShareLedger,
{
    let redeemer = ctx.caller;

    // Validate request
    redeem_validator::validate_redeem_request(&redeemer, share_amount, ledger.balance_of(&redeemer))?;

    // Snapshot
    let position = adapters.read_position(ledger.total_supply())?;

    // Quote (sufficiency check runs here, before any withdrawal)
    let quote = calculate_redeem_amount(share_amount, &position, config)?;

    log::info!(
        "🔥 Redeeming {} of {} shares for {}: payout {} wei (haircut {}), debt share ${} e8",
        share_amount,
        position.total_supply,
        redeemer,
        quote.underlying_amount,
        quote.haircut_amount,
        quote.debt_share_value
    );

    // Unwind debt share
    let unwind = debt_unwinder::unwind_debt(adapters, &position, quote.debt_share_value, config)?;

    // Pay out
    let paid = adapters
        .market
        .withdraw(TrackedAsset::WETH, quote.underlying_amount, redeemer)
        .map_err(|fault| call_failure("withdraw", fault))?;

    // Burn
    ledger.burn(redeemer, share_amount)?;

    log::info!(
        "✅ Redeem complete: {} shares burned, {} wei to {}, {} USDC repaid in {} legs",
        share_amount,
        paid,
        redeemer,
        unwind.debt_repaid,
        unwind.legs
    );

    Ok(RedeemReceipt {
        redeemer,
        shares_burned: share_amount,
        underlying_amount: paid,
        haircut_amount: quote.haircut_amount,
        debt_repaid: unwind.debt_repaid,
        collateral_sold: unwind.collateral_sold,
        legs: unwind.legs,
        timestamp: ctx.now,
    })
}

/// Quote for redeeming `share_amount` right now; reads, never writes
pub fn preview_redeem<M, S, O, L>(
    share_amount: u128,
    adapters: &ExternalAdapters<M, S, O>,
    ledger: &L,
    config: &VaultConfig,
) -> Result<RedeemQuote>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
    L: ShareLedger,
{
    let position = adapters.read_position(ledger.total_supply())?;
    calculate_redeem_amount(share_amount, &position, config)
}
