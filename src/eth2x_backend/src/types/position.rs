use candid::CandidType;
use serde::{Deserialize, Serialize};
use super::TrackedAsset;

/// Lending-market view of the vault's account
///
/// Values are in the market's base currency (USD, e8). Ratios in bps.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountSnapshot {
    pub collateral_value: u128,
    pub debt_value: u128,
    pub available_borrow: u128,
    pub liquidation_threshold_bps: u32,
    pub loan_to_value_bps: u32,
    /// WAD; u128::MAX while there is no debt
    pub health_factor: u128,
}

/// Oracle price of one whole unit of an asset
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub value: u128,
    pub decimals: u32,
}

/// Everything one operation is allowed to know about the position
///
/// Read once at the start of an operation (or rebalance step) and never
/// refreshed while it runs. Both prices are already on the base-currency scale.
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSnapshot {
    pub account: AccountSnapshot,
    /// USD (e8) per whole WETH
    pub reference_price: u128,
    /// USD (e8) per whole USDC
    pub quote_price: u128,
    /// Share supply at read time
    pub total_supply: u128,
}

impl PositionSnapshot {
    /// Base-currency price of `asset` frozen in this snapshot
    pub fn price_of(&self, asset: TrackedAsset) -> u128 {
        match asset {
            TrackedAsset::WETH => self.reference_price,
            TrackedAsset::USDC => self.quote_price,
        }
    }
}
