//! Display module - Position summary formatting for UI
//!
//! Converts fixed-point integers into `Decimal`s once, at the edge. Never
//! feed these values back into valuation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::_2_CRITICAL_DATA::leverage::leverage_ratio;
use crate::_2_CRITICAL_DATA::position_snapshot::value_to_amount;
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::constants::{BASE_CURRENCY_DECIMALS, LEVERAGE_RATIO_SENTINEL, SHARE_DECIMALS, WAD};
use crate::infrastructure::errors::{overflow, Result};
use crate::infrastructure::math::{checked_net_value, mul_div};
use crate::types::{PositionSnapshot, TrackedAsset};

/// Position state for display
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PositionSummary {
    pub collateral_usd: Decimal,
    pub debt_usd: Decimal,
    pub net_value_usd: Decimal,
    /// `None` while there is no debt
    pub leverage: Option<Decimal>,
    pub target_leverage: Decimal,
    /// `None` while there is no debt
    pub health_factor: Option<Decimal>,
    pub eth_price_usd: Decimal,
    /// WETH per whole share; `None` before the first mint
    pub share_price_weth: Option<Decimal>,
    pub total_supply: Decimal,
}

pub fn build_position_summary(position: &PositionSnapshot, config: &VaultConfig) -> Result<PositionSummary> {
    let account = &position.account;
    let net_value = checked_net_value(account.collateral_value, account.debt_value)?;

    let ratio = leverage_ratio(account)?;
    let leverage = if ratio == LEVERAGE_RATIO_SENTINEL {
        None
    } else {
        Some(fixed(ratio, 18)?)
    };

    let health_factor = if account.debt_value == 0 {
        None
    } else {
        Some(fixed(account.health_factor, 18)?)
    };

    let share_price_weth = if position.total_supply == 0 {
        None
    } else {
        let net_weth = value_to_amount(net_value, TrackedAsset::WETH, position.reference_price)?;
        let wei_per_share = mul_div(net_weth, WAD, position.total_supply)?;
        Some(fixed(wei_per_share, TrackedAsset::WETH.get_decimals())?)
    };

    Ok(PositionSummary {
        collateral_usd: fixed(account.collateral_value, BASE_CURRENCY_DECIMALS)?,
        debt_usd: fixed(account.debt_value, BASE_CURRENCY_DECIMALS)?,
        net_value_usd: fixed(net_value, BASE_CURRENCY_DECIMALS)?,
        leverage,
        target_leverage: fixed(config.target_ratio_wad, 18)?,
        health_factor,
        eth_price_usd: fixed(position.reference_price, BASE_CURRENCY_DECIMALS)?,
        share_price_weth,
        total_supply: fixed(position.total_supply, SHARE_DECIMALS)?,
    })
}

/// Fixed-point integer with `decimals` places as a normalized `Decimal`
fn fixed(value: u128, decimals: u32) -> Result<Decimal> {
    let signed = i128::try_from(value).map_err(|_| overflow(format!("{} as i128", value)))?;
    Decimal::try_from_i128_with_scale(signed, decimals)
        .map(|d| d.normalize())
        .map_err(|e| overflow(format!("{} at scale {}: {}", value, decimals, e)))
}
