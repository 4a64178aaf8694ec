//! In-memory adapter doubles
//!
//! One price feed is shared by the market, the oracle and the venue so that
//! moving the ETH price moves all three. The market keeps the vault's
//! position in native units and values it on every read, like a real
//! lending market would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use candid::Principal;
use crate::_1_CRITICAL_OPERATIONS::ExternalAdapters;
use crate::_3_LENDING_MARKET::{CallFault, CallResult, LendingMarket, PriceOracle};
use crate::_4_TRADING_EXECUTION::SwapVenue;
use crate::infrastructure::constants::{BPS_DENOMINATOR, WAD};
use crate::infrastructure::math::{mul_div, pow10};
use crate::types::{AccountSnapshot, Price, TrackedAsset};

pub const ONE_ETH: u128 = 1_000_000_000_000_000_000;

/// $1 on the base-currency scale
pub const USD: u128 = 100_000_000;

pub const VAULT: Principal = Principal::from_slice(&[0xEE, 0x01]);
pub const OWNER: Principal = Principal::from_slice(&[0x01]);
pub const ALICE: Principal = Principal::from_slice(&[0xA1]);
pub const BOB: Principal = Principal::from_slice(&[0xB0]);

pub type MockAdapters = ExternalAdapters<MockMarket, MockSwapVenue, MockOracle>;

/// Oracle and venue wired to `market`'s price feed
pub fn adapters(market: MockMarket) -> MockAdapters {
    let oracle = MockOracle::from_market(&market);
    let venue = MockSwapVenue::from_market(&market);
    ExternalAdapters::new(market, venue, oracle, VAULT)
}

/// ETH price in USD (e8), shared between doubles
#[derive(Clone, Debug)]
pub struct PriceFeed(Rc<Cell<u128>>);

impl PriceFeed {
    pub fn new(eth_usd: u128) -> Self {
        Self(Rc::new(Cell::new(eth_usd * USD)))
    }

    pub fn eth(&self) -> u128 {
        self.0.get()
    }

    pub fn set_eth(&self, eth_usd: u128) {
        self.0.set(eth_usd * USD)
    }

    /// Base-currency (e8) price of one whole unit
    pub fn price_of(&self, asset: TrackedAsset) -> u128 {
        match asset {
            TrackedAsset::WETH => self.eth(),
            TrackedAsset::USDC => USD,
        }
    }

    pub fn value_of(&self, asset: TrackedAsset, amount: u128) -> u128 {
        mul_div(amount, self.price_of(asset), pow10(asset.get_decimals()).unwrap()).unwrap()
    }

    pub fn amount_for(&self, asset: TrackedAsset, value: u128) -> u128 {
        mul_div(value, pow10(asset.get_decimals()).unwrap(), self.price_of(asset)).unwrap()
    }
}

#[derive(Debug)]
pub struct MockMarket {
    prices: PriceFeed,
    collateral_weth: u128,
    debt_usdc: u128,
    ltv_bps: u32,
    liquidation_threshold_bps: u32,
    failing: Option<String>,
    calls: RefCell<Vec<String>>,
    payouts: Vec<(Principal, u128)>,
}

impl MockMarket {
    /// Empty position, ETH at `eth_usd` dollars, 80% LTV, 82.5% threshold
    pub fn new(eth_usd: u128) -> Self {
        Self {
            prices: PriceFeed::new(eth_usd),
            collateral_weth: 0,
            debt_usdc: 0,
            ltv_bps: 8_000,
            liquidation_threshold_bps: 8_250,
            failing: None,
            calls: RefCell::new(Vec::new()),
            payouts: Vec::new(),
        }
    }

    /// Seed the position directly: collateral in wei, debt in USDC units
    pub fn with_position(eth_usd: u128, collateral_weth: u128, debt_usdc: u128) -> Self {
        let mut market = Self::new(eth_usd);
        market.collateral_weth = collateral_weth;
        market.debt_usdc = debt_usdc;
        market
    }

    pub fn prices(&self) -> PriceFeed {
        self.prices.clone()
    }

    pub fn set_eth_price(&self, eth_usd: u128) {
        self.prices.set_eth(eth_usd)
    }

    /// Every later call to `operation` is rejected
    pub fn fail_on(&mut self, operation: &str) {
        self.failing = Some(operation.to_string());
    }

    pub fn collateral_weth(&self) -> u128 {
        self.collateral_weth
    }

    pub fn debt_usdc(&self) -> u128 {
        self.debt_usdc
    }

    /// Operation names in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Withdrawals sent to accounts other than the vault
    pub fn payouts(&self) -> &[(Principal, u128)] {
        &self.payouts
    }

    pub fn account(&self) -> AccountSnapshot {
        let collateral_value = self.prices.value_of(TrackedAsset::WETH, self.collateral_weth);
        let debt_value = self.prices.value_of(TrackedAsset::USDC, self.debt_usdc);
        let borrow_limit = mul_div(collateral_value, self.ltv_bps as u128, BPS_DENOMINATOR).unwrap();
        let health_factor = if debt_value == 0 {
            u128::MAX
        } else {
            let adjusted = mul_div(collateral_value, self.liquidation_threshold_bps as u128, BPS_DENOMINATOR).unwrap();
            mul_div(adjusted, WAD, debt_value).unwrap()
        };

        AccountSnapshot {
            collateral_value,
            debt_value,
            available_borrow: borrow_limit.saturating_sub(debt_value),
            liquidation_threshold_bps: self.liquidation_threshold_bps,
            loan_to_value_bps: self.ltv_bps,
            health_factor,
        }
    }

    fn enter(&self, operation: &str) -> CallResult<()> {
        self.calls.borrow_mut().push(operation.to_string());
        if self.failing.as_deref() == Some(operation) {
            return Err(CallFault::new(format!("{} rejected by market", operation)));
        }
        Ok(())
    }
}

impl LendingMarket for MockMarket {
    fn supply(&mut self, asset: TrackedAsset, amount: u128, _on_behalf_of: Principal) -> CallResult<()> {
        self.enter("supply")?;
        if asset != TrackedAsset::WETH {
            return Err(CallFault::new("only WETH is accepted as collateral"));
        }
        self.collateral_weth += amount;
        Ok(())
    }

    fn borrow(&mut self, asset: TrackedAsset, amount: u128, _on_behalf_of: Principal) -> CallResult<()> {
        self.enter("borrow")?;
        if asset != TrackedAsset::USDC {
            return Err(CallFault::new("only USDC can be borrowed"));
        }
        let account = self.account();
        let new_debt_value = account.debt_value + self.prices.value_of(TrackedAsset::USDC, amount);
        let limit = mul_div(account.collateral_value, self.ltv_bps as u128, BPS_DENOMINATOR).unwrap();
        if new_debt_value > limit {
            return Err(CallFault::new("borrow exceeds loan-to-value limit"));
        }
        self.debt_usdc += amount;
        Ok(())
    }

    fn repay(&mut self, asset: TrackedAsset, amount: u128, _on_behalf_of: Principal) -> CallResult<u128> {
        self.enter("repay")?;
        if asset != TrackedAsset::USDC {
            return Err(CallFault::new("debt is denominated in USDC"));
        }
        let repaid = amount.min(self.debt_usdc);
        self.debt_usdc -= repaid;
        Ok(repaid)
    }

    fn withdraw(&mut self, asset: TrackedAsset, amount: u128, to: Principal) -> CallResult<u128> {
        self.enter("withdraw")?;
        if asset != TrackedAsset::WETH {
            return Err(CallFault::new("only WETH collateral can be withdrawn"));
        }
        if amount > self.collateral_weth {
            return Err(CallFault::new("withdraw exceeds collateral"));
        }

        let remaining_value = self.prices.value_of(TrackedAsset::WETH, self.collateral_weth - amount);
        let debt_value = self.prices.value_of(TrackedAsset::USDC, self.debt_usdc);
        if debt_value * BPS_DENOMINATOR > remaining_value * self.liquidation_threshold_bps as u128 {
            return Err(CallFault::new("withdraw would make the account liquidatable"));
        }

        self.collateral_weth -= amount;
        if to != VAULT {
            self.payouts.push((to, amount));
        }
        Ok(amount)
    }

    fn get_account_snapshot(&self, _account: Principal) -> CallResult<AccountSnapshot> {
        self.enter("get_account_snapshot")?;
        Ok(self.account())
    }
}

/// Oracle reporting USD prices with 18 decimals
#[derive(Debug)]
pub struct MockOracle {
    prices: PriceFeed,
    failing: bool,
}

impl MockOracle {
    pub fn from_market(market: &MockMarket) -> Self {
        Self { prices: market.prices(), failing: false }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }
}

impl PriceOracle for MockOracle {
    fn price(&self, asset: TrackedAsset) -> CallResult<Price> {
        if self.failing {
            return Err(CallFault::new("oracle unavailable"));
        }
        // e8 → e18
        Ok(Price {
            value: self.prices.price_of(asset) * 10_000_000_000,
            decimals: 18,
        })
    }
}

/// Venue that trades at feed prices less a fee
#[derive(Debug)]
pub struct MockSwapVenue {
    prices: PriceFeed,
    fee_bps: u32,
    extra_slippage_bps: u32,
    enforce_minimum: bool,
    failing: bool,
    swaps: Vec<(TrackedAsset, TrackedAsset, u128, u128)>,
}

impl MockSwapVenue {
    /// 0.3% fee, honours minimums
    pub fn from_market(market: &MockMarket) -> Self {
        Self {
            prices: market.prices(),
            fee_bps: 30,
            extra_slippage_bps: 0,
            enforce_minimum: true,
            failing: false,
            swaps: Vec::new(),
        }
    }

    pub fn set_extra_slippage_bps(&mut self, bps: u32) {
        self.extra_slippage_bps = bps;
    }

    pub fn set_enforce_minimum(&mut self, enforce: bool) {
        self.enforce_minimum = enforce;
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// (asset in, asset out, amount in, minimum out) per executed swap
    pub fn swaps(&self) -> &[(TrackedAsset, TrackedAsset, u128, u128)] {
        &self.swaps
    }
}

impl SwapVenue for MockSwapVenue {
    fn swap_exact_in(
        &mut self,
        asset_in: TrackedAsset,
        asset_out: TrackedAsset,
        amount_in: u128,
        min_amount_out: u128,
        _fee_tier: u32,
    ) -> CallResult<u128> {
        if self.failing {
            return Err(CallFault::new("pool unavailable"));
        }

        let value = self.prices.value_of(asset_in, amount_in);
        let gross = self.prices.amount_for(asset_out, value);
        let keep = BPS_DENOMINATOR - (self.fee_bps + self.extra_slippage_bps) as u128;
        let amount_out = mul_div(gross, keep, BPS_DENOMINATOR).unwrap();

        if self.enforce_minimum && amount_out < min_amount_out {
            return Err(CallFault::new(format!(
                "too little received: {} < {}",
                amount_out, min_amount_out
            )));
        }

        self.swaps.push((asset_in, asset_out, amount_in, min_amount_out));
        Ok(amount_out)
    }
}
