//! Main mint orchestration logic

use candid::Principal;
use crate::_1_CRITICAL_OPERATIONS::ExternalAdapters;
use crate::_2_CRITICAL_DATA::position_snapshot::amount_to_value;
use crate::_2_CRITICAL_DATA::share_supply::ShareLedger;
use crate::_2_CRITICAL_DATA::valuation::calculate_mint_amount;
use crate::_3_LENDING_MARKET::{call_failure, LendingMarket, PriceOracle};
use crate::_4_TRADING_EXECUTION::SwapVenue;
use crate::infrastructure::admin::AdminState;
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::Result;
use crate::types::{CallContext, MintReceipt, TrackedAsset};
use super::mint_validator::{validate_mint_request, validate_supply_headroom};

/// Deposit `deposit` wei of WETH and mint shares to `beneficiary`
///
/// ## Flow
/// 1. Access policy (before anything else)
/// 2. Validate request
/// 3. Snapshot the position BEFORE the deposit lands
/// 4. Price the shares against that snapshot
/// 5. Supply the deposit as collateral
/// 6. Mint the shares
pub fn mint<M, S, O, L>(
    ctx: &CallContext,
    beneficiary: Principal,
    deposit: u128,
    adapters: &mut ExternalAdapters<M, S, O>,
    ledger: &mut L,
    admin: &AdminState,
    config: &VaultConfig,
) -> Result<MintReceipt>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
    L: ShareLedger,
{
    // Step 1: Access policy
    admin.check_can_mint(&ctx.caller)?;

    // Step 2: Validate request
    validate_mint_request(&beneficiary, deposit)?;

    // Step 3: Snapshot
    // The deposit must not be part of the net value it is priced against,
    // otherwise the depositor is under-minted.
    let position = adapters.read_position(ledger.total_supply())?;

    // Step 4: Price
    let shares = calculate_mint_amount(deposit, &position, config)?;
    let total_supply_after = validate_supply_headroom(position.total_supply, shares)?;
    let deposit_value = amount_to_value(deposit, TrackedAsset::WETH, position.reference_price)?;

    log::info!(
        "🪙 Minting {} shares to {} for {} wei (${} e8), supply {} → {}",
        shares,
        beneficiary,
        deposit,
        deposit_value,
        position.total_supply,
        total_supply_after
    );

    // Step 5: Supply collateral
    adapters
        .market
        .supply(TrackedAsset::WETH, deposit, adapters.vault_account)
        .map_err(|fault| call_failure("supply", fault))?;

    // Step 6: Mint
    ledger.mint(beneficiary, shares)?;

    log::info!("✅ Mint complete: {} shares to {}", shares, beneficiary);

    Ok(MintReceipt {
        beneficiary,
        deposit,
        deposit_value,
        shares_minted: shares,
        total_supply_after,
        timestamp: ctx.now,
    })
}

/// Shares a deposit would mint right now; reads, never writes
pub fn preview_mint<M, S, O, L>(
    deposit: u128,
    adapters: &ExternalAdapters<M, S, O>,
    ledger: &L,
    config: &VaultConfig,
) -> Result<u128>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
    L: ShareLedger,
{
    let position = adapters.read_position(ledger.total_supply())?;
    calculate_mint_amount(deposit, &position, config)
}
