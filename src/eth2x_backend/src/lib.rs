//! ETH 2x Backend - Security-First Architecture with Numbered Zones
//!
//! A leveraged-ETH vault engine: share holders own a WETH collateral
//! position financed by USDC debt in an external lending market, held
//! near a 2.0 collateral / debt ratio.
//!
//! Architecture:
//! 1_CRITICAL_OPERATIONS - Mint, redeem, rebalance (highest security)
//! 2_CRITICAL_DATA - Position reads, share valuation, leverage math
//! 3_LENDING_MARKET - Lending market and price oracle boundary
//! 4_TRADING_EXECUTION - Swap venue interactions
//! 5_INFORMATIONAL - Display
//! 6_INFRASTRUCTURE - Math, errors, constants, config, admin, storage
//!
//! The crate is host-agnostic: the host supplies the adapters, the caller
//! and the clock, and undoes all effects of a call that returns `Err`.

// Import numbered modules with explicit paths
#[path = "1_CRITICAL_OPERATIONS/mod.rs"]
mod critical_operations_1;
use critical_operations_1 as _1_CRITICAL_OPERATIONS;

#[path = "2_CRITICAL_DATA/mod.rs"]
mod critical_data_2;
use critical_data_2 as _2_CRITICAL_DATA;

#[path = "3_LENDING_MARKET/mod.rs"]
mod lending_market_3;
use lending_market_3 as _3_LENDING_MARKET;

#[path = "4_TRADING_EXECUTION/mod.rs"]
mod trading_execution_4;
use trading_execution_4 as _4_TRADING_EXECUTION;

#[path = "5_INFORMATIONAL/mod.rs"]
mod informational_5;
use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
mod infrastructure_6;
use infrastructure_6 as infrastructure;

pub mod types;

#[cfg(test)]
mod testing;

use candid::Principal;

pub use _1_CRITICAL_OPERATIONS::ExternalAdapters;
pub use _1_CRITICAL_OPERATIONS::rebalancing::{
    RebalanceOutcome, RebalanceRecord, RebalanceStep, RebalancerStatus,
};
pub use _2_CRITICAL_DATA::{RebalanceAction, RedeemQuote, ShareLedger, ShareSupply};
pub use _3_LENDING_MARKET::{CallFault, CallResult, LendingMarket, PriceOracle};
pub use _4_TRADING_EXECUTION::SwapVenue;
pub use _5_INFORMATIONAL::PositionSummary;
pub use infrastructure::{AccessPolicy, AdminAction, AdminState, VaultConfig, VaultState};
pub use infrastructure::errors::{
    AccessError, CalculationError, ExternalError, LedgerError, MintError, RebalanceError,
    RedeemError, Result, StorageError, TradingError, ValidationError, VaultError,
};
pub use types::{AccountSnapshot, CallContext, MintReceipt, Price, RedeemReceipt, TrackedAsset};

/// The vault: persistent state plus the external collaborators it acts through
pub struct LeveragedVault<M, S, O> {
    state: VaultState,
    adapters: ExternalAdapters<M, S, O>,
}

impl<M, S, O> LeveragedVault<M, S, O>
where
    M: LendingMarket,
    S: SwapVenue,
    O: PriceOracle,
{
    pub fn new(
        config: VaultConfig,
        admin: AdminState,
        adapters: ExternalAdapters<M, S, O>,
    ) -> Result<Self> {
        config.validate()?;

        log::info!("===================================");
        log::info!("ETH 2x Vault Initialized");
        log::info!("Position account: {}", adapters.vault_account);
        log::info!("Target ratio: {}", config.target_ratio_wad);
        log::info!("===================================");

        Ok(Self {
            state: VaultState::new(config, admin),
            adapters,
        })
    }

    /// Rebuild a vault from previously exported state
    pub fn from_state(bytes: &[u8], adapters: ExternalAdapters<M, S, O>) -> Result<Self> {
        let state = infrastructure::restore_state(bytes)?;
        Ok(Self { state, adapters })
    }

    pub fn export_state(&self) -> Result<Vec<u8>> {
        infrastructure::save_state(&self.state)
    }

    // ===== CORE OPERATIONS =====

    /// Deposit `deposit` wei of WETH and mint shares to `beneficiary`
    pub fn mint(&mut self, ctx: &CallContext, beneficiary: Principal, deposit: u128) -> Result<MintReceipt> {
        _1_CRITICAL_OPERATIONS::minting::mint(
            ctx,
            beneficiary,
            deposit,
            &mut self.adapters,
            &mut self.state.shares,
            &self.state.admin,
            &self.state.config,
        )
    }

    /// Burn the caller's shares and pay out their WETH
    pub fn redeem(&mut self, ctx: &CallContext, share_amount: u128) -> Result<RedeemReceipt> {
        _1_CRITICAL_OPERATIONS::redeeming::redeem(
            ctx,
            share_amount,
            &mut self.adapters,
            &mut self.state.shares,
            &self.state.config,
        )
    }

    /// Open to any caller
    pub fn rebalance(&mut self, ctx: &CallContext) -> Result<RebalanceOutcome> {
        let total_supply = self.state.shares.total_supply();
        _1_CRITICAL_OPERATIONS::rebalancing::perform_rebalance(
            ctx,
            &mut self.adapters,
            total_supply,
            &self.state.config,
            &mut self.state.rebalance,
        )
    }

    // ===== QUERIES =====

    /// Current collateral / debt ratio in WAD; `u128::MAX` without debt
    pub fn leverage_ratio(&self) -> Result<u128> {
        let position = self.adapters.read_position(self.state.shares.total_supply())?;
        _2_CRITICAL_DATA::leverage_ratio(&position.account)
    }

    pub fn calculate_tokens_to_mint(&self, deposit: u128) -> Result<u128> {
        _1_CRITICAL_OPERATIONS::minting::preview_mint(deposit, &self.adapters, &self.state.shares, &self.state.config)
    }

    pub fn calculate_eth_to_redeem(&self, share_amount: u128) -> Result<RedeemQuote> {
        _1_CRITICAL_OPERATIONS::redeeming::preview_redeem(
            share_amount,
            &self.adapters,
            &self.state.shares,
            &self.state.config,
        )
    }

    pub fn position_summary(&self) -> Result<PositionSummary> {
        let position = self.adapters.read_position(self.state.shares.total_supply())?;
        _5_INFORMATIONAL::build_position_summary(&position, &self.state.config)
    }

    pub fn get_rebalancer_status(&self) -> RebalancerStatus {
        self.state.rebalance.status()
    }

    pub fn config(&self) -> &VaultConfig {
        &self.state.config
    }

    pub fn admin(&self) -> &AdminState {
        &self.state.admin
    }

    pub fn adapters(&self) -> &ExternalAdapters<M, S, O> {
        &self.adapters
    }

    pub fn adapters_mut(&mut self) -> &mut ExternalAdapters<M, S, O> {
        &mut self.adapters
    }

    // ===== SHARE LEDGER =====

    pub fn total_supply(&self) -> u128 {
        self.state.shares.total_supply()
    }

    pub fn balance_of(&self, holder: &Principal) -> u128 {
        self.state.shares.balance_of(holder)
    }

    pub fn allowance(&self, owner: &Principal, spender: &Principal) -> u128 {
        self.state.shares.allowance(owner, spender)
    }

    pub fn transfer(&mut self, ctx: &CallContext, to: Principal, amount: u128) -> Result<()> {
        self.state.shares.transfer(ctx.caller, to, amount)
    }

    pub fn approve(&mut self, ctx: &CallContext, spender: Principal, amount: u128) -> Result<()> {
        self.state.shares.approve(ctx.caller, spender, amount)
    }

    pub fn transfer_from(&mut self, ctx: &CallContext, from: Principal, to: Principal, amount: u128) -> Result<()> {
        self.state.shares.transfer_from(ctx.caller, from, to, amount)
    }

    // ===== ADMIN CONTROLS =====

    pub fn allow_minter(&mut self, ctx: &CallContext, minter: Principal) -> Result<()> {
        self.state.admin.allow_minter(ctx.caller, minter, ctx.now)
    }

    pub fn revoke_minter(&mut self, ctx: &CallContext, minter: Principal) -> Result<()> {
        self.state.admin.revoke_minter(ctx.caller, minter, ctx.now)
    }

    pub fn set_access_policy(&mut self, ctx: &CallContext, policy: AccessPolicy) -> Result<()> {
        self.state.admin.set_access_policy(ctx.caller, policy, ctx.now)
    }

    pub fn renounce_ownership(&mut self, ctx: &CallContext) -> Result<()> {
        self.state.admin.renounce_ownership(ctx.caller, ctx.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::constants::{LEVERAGE_RATIO_SENTINEL, WAD};
    use crate::testing::{adapters, MockMarket, MockOracle, MockSwapVenue, ALICE, BOB, ONE_ETH, OWNER};

    type TestVault = LeveragedVault<MockMarket, MockSwapVenue, MockOracle>;

    fn open_vault(market: MockMarket) -> TestVault {
        LeveragedVault::new(VaultConfig::default(), AdminState::ownerless(), adapters(market)).unwrap()
    }

    fn ctx(caller: Principal, now: u64) -> CallContext {
        CallContext::new(caller, now)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = VaultConfig { target_ratio_wad: WAD, ..VaultConfig::default() };
        let result = LeveragedVault::new(config, AdminState::ownerless(), adapters(MockMarket::new(3_000)));
        assert!(matches!(
            result,
            Err(VaultError::Validation(ValidationError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn test_bootstrap_mint_through_vault() {
        let mut vault = open_vault(MockMarket::new(3_000));

        assert_eq!(vault.calculate_tokens_to_mint(ONE_ETH).unwrap(), 10_000 * ONE_ETH);
        let receipt = vault.mint(&ctx(ALICE, 1), ALICE, ONE_ETH).unwrap();

        assert_eq!(receipt.shares_minted, 10_000 * ONE_ETH);
        assert_eq!(vault.balance_of(&ALICE), 10_000 * ONE_ETH);
        assert_eq!(vault.total_supply(), 10_000 * ONE_ETH);
        assert_eq!(vault.leverage_ratio().unwrap(), LEVERAGE_RATIO_SENTINEL);
    }

    #[test]
    fn test_mint_rebalance_redeem_cycle() {
        let mut vault = open_vault(MockMarket::new(3_000));

        vault.mint(&ctx(ALICE, 1), ALICE, ONE_ETH).unwrap();
        vault.mint(&ctx(BOB, 2), BOB, ONE_ETH).unwrap();

        for call in 0..3 {
            vault.rebalance(&ctx(BOB, 10 + call)).unwrap();
        }
        let ratio = vault.leverage_ratio().unwrap();
        assert!(ratio.abs_diff(2 * WAD) <= 2 * WAD / 100, "ratio {}", ratio);
        // The last call may already find the ratio in band and skip recording
        assert!(vault.get_rebalancer_status().total_rebalances >= 2);

        let quote = vault.calculate_eth_to_redeem(vault.balance_of(&ALICE)).unwrap();
        let receipt = vault.redeem(&ctx(ALICE, 20), vault.balance_of(&ALICE)).unwrap();

        assert_eq!(receipt.underlying_amount, quote.underlying_amount);
        // Alice deposited 1 WETH; swap fees and the haircut come out of her exit
        assert!(receipt.underlying_amount < ONE_ETH);
        assert!(receipt.underlying_amount > ONE_ETH * 95 / 100);
        assert_eq!(vault.balance_of(&ALICE), 0);
        assert_eq!(vault.total_supply(), vault.balance_of(&BOB));
    }

    #[test]
    fn test_allowlist_enforced_through_vault() {
        let mut vault: TestVault = LeveragedVault::new(
            VaultConfig::default(),
            AdminState::owned_by(OWNER),
            adapters(MockMarket::new(3_000)),
        )
        .unwrap();

        let result = vault.mint(&ctx(ALICE, 1), ALICE, ONE_ETH);
        assert!(matches!(result, Err(VaultError::Access(AccessError::Unauthorized { .. }))));

        assert!(vault.allow_minter(&ctx(ALICE, 2), ALICE).is_err());
        vault.allow_minter(&ctx(OWNER, 2), ALICE).unwrap();
        vault.mint(&ctx(ALICE, 3), ALICE, ONE_ETH).unwrap();

        vault.renounce_ownership(&ctx(OWNER, 4)).unwrap();
        assert_eq!(vault.admin().owner, None);
        vault.mint(&ctx(BOB, 5), BOB, ONE_ETH).unwrap();
    }

    #[test]
    fn test_share_transfers() {
        let mut vault = open_vault(MockMarket::new(3_000));
        vault.mint(&ctx(ALICE, 1), ALICE, ONE_ETH).unwrap();

        vault.transfer(&ctx(ALICE, 2), BOB, 100).unwrap();
        assert_eq!(vault.balance_of(&BOB), 100);

        vault.approve(&ctx(ALICE, 3), BOB, 50).unwrap();
        vault.transfer_from(&ctx(BOB, 4), ALICE, BOB, 50).unwrap();
        assert_eq!(vault.balance_of(&BOB), 150);
        assert_eq!(vault.allowance(&ALICE, &BOB), 0);

        let result = vault.transfer_from(&ctx(BOB, 5), ALICE, BOB, 1);
        assert!(matches!(
            result,
            Err(VaultError::Ledger(LedgerError::InsufficientAllowance { .. }))
        ));
    }

    #[test]
    fn test_state_export_import() {
        let mut vault = open_vault(MockMarket::new(3_000));
        vault.mint(&ctx(ALICE, 1), ALICE, ONE_ETH).unwrap();
        vault.rebalance(&ctx(BOB, 2)).unwrap();

        let bytes = vault.export_state().unwrap();
        let market = &vault.adapters().market;
        let market = MockMarket::with_position(3_000, market.collateral_weth(), market.debt_usdc());
        let restored = TestVault::from_state(&bytes, adapters(market)).unwrap();

        assert_eq!(restored.balance_of(&ALICE), vault.balance_of(&ALICE));
        assert_eq!(restored.get_rebalancer_status(), vault.get_rebalancer_status());
        assert_eq!(restored.leverage_ratio().unwrap(), vault.leverage_ratio().unwrap());
    }

    #[test]
    fn test_position_summary() {
        let vault = open_vault(MockMarket::with_position(3_000, 4 * ONE_ETH, 6_000_000_000));
        let summary = vault.position_summary().unwrap();
        assert_eq!(summary.leverage, Some(rust_decimal_macros::dec!(2)));
        assert_eq!(summary.share_price_weth, None);
    }
}
