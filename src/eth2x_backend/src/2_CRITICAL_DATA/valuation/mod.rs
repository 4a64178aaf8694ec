//! Share valuation engine
//!
//! Prices shares against the position's net asset value (collateral − debt).
//! A holder's balance is a claim on `balance / total_supply` of net value at
//! redemption time, so minting must never move the claim of existing holders.
//!
//! ## Formulas
//! - First mint: `shares = deposit × bootstrap_rate`
//! - Later mints: `shares = (deposit_value × WAD ÷ net_value) × supply ÷ WAD`
//! - Redeem: `underlying = (net_value × (shares × WAD ÷ supply) ÷ WAD) ÷ price`,
//!   less the haircut

use candid::CandidType;
use serde::{Deserialize, Serialize};
use crate::infrastructure::config::VaultConfig;
use crate::infrastructure::constants::WAD;
use crate::infrastructure::errors::{
    invariant_violated, overflow, MintError, RedeemError, Result, ValidationError, VaultError,
};
use crate::infrastructure::math::{apply_bps_haircut, checked_net_value, mul_div};
use crate::types::{PositionSnapshot, TrackedAsset};
use super::position_snapshot::{amount_to_value, value_to_amount};

/// Breakdown of a redemption, computed before anything moves
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RedeemQuote {
    pub share_amount: u128,
    /// Fraction of supply being redeemed, WAD
    pub percentage_owned: u128,
    /// Base currency (e8)
    pub net_value: u128,
    pub redeemer_value: u128,
    /// Part of the debt this exit has to unwind (e8)
    pub debt_share_value: u128,
    /// WETH before the haircut
    pub gross_amount: u128,
    pub haircut_amount: u128,
    /// WETH paid out
    pub underlying_amount: u128,
}

/// Shares minted for a deposit of `deposit` wei
pub fn calculate_mint_amount(deposit: u128, position: &PositionSnapshot, config: &VaultConfig) -> Result<u128> {
    if deposit == 0 {
        return Err(VaultError::Mint(MintError::ZeroDeposit));
    }

    // Bootstrap: no holders to dilute, any rate works
    if position.total_supply == 0 {
        if position.account.collateral_value > 0 {
            log::warn!(
                "⚠️ Minting at bootstrap rate while position holds {} (e8) collateral",
                position.account.collateral_value
            );
        }
        return deposit
            .checked_mul(config.bootstrap_rate)
            .ok_or_else(|| overflow(format!("bootstrap mint {} × {}", deposit, config.bootstrap_rate)));
    }

    let net_value_before = checked_net_value(
        position.account.collateral_value,
        position.account.debt_value,
    )?;
    if net_value_before == 0 {
        return Err(invariant_violated(format!(
            "{} shares outstanding against zero net value",
            position.total_supply
        )));
    }

    let deposit_value = amount_to_value(deposit, TrackedAsset::WETH, position.reference_price)?;
    let contribution_fraction = mul_div(deposit_value, WAD, net_value_before)?;
    let shares = mul_div(contribution_fraction, position.total_supply, WAD)?;

    log::debug!(
        "  Mint calculation: deposit={} wei (${} e8), net={} e8, fraction={} wad, supply={} → shares={}",
        deposit,
        deposit_value,
        net_value_before,
        contribution_fraction,
        position.total_supply,
        shares
    );

    if shares == 0 {
        return Err(VaultError::Mint(MintError::ZeroSharesMinted {
            deposit: deposit.to_string(),
        }));
    }

    Ok(shares)
}

/// Quote a redemption of `share_amount` shares
///
/// Includes the collateral sufficiency check so callers can run it before
/// the first external withdrawal.
pub fn calculate_redeem_amount(
    share_amount: u128,
    position: &PositionSnapshot,
    config: &VaultConfig,
) -> Result<RedeemQuote> {
    if share_amount == 0 {
        return Err(nothing_to_redeem("share amount is zero"));
    }

    if position.total_supply == 0 {
        return Err(nothing_to_redeem("no shares outstanding"));
    }

    if share_amount > position.total_supply {
        return Err(VaultError::Validation(ValidationError::InvalidAmount {
            amount: share_amount.to_string(),
            reason: format!("exceeds total supply {}", position.total_supply),
        }));
    }

    let percentage_owned = mul_div(share_amount, WAD, position.total_supply)?;
    if percentage_owned == 0 {
        return Err(nothing_to_redeem("share amount rounds to zero ownership"));
    }

    let net_value = checked_net_value(
        position.account.collateral_value,
        position.account.debt_value,
    )?;
    let redeemer_value = mul_div(net_value, percentage_owned, WAD)?;
    let debt_share_value = mul_div(position.account.debt_value, percentage_owned, WAD)?;

    let gross_amount = value_to_amount(redeemer_value, TrackedAsset::WETH, position.reference_price)?;
    let (underlying_amount, haircut_amount) = apply_bps_haircut(gross_amount, config.redeem_haircut_bps)?;

    if underlying_amount == 0 {
        return Err(nothing_to_redeem("redemption is worth zero WETH after rounding"));
    }

    ensure_collateral_covers(net_value, position.reference_price, underlying_amount)?;

    Ok(RedeemQuote {
        share_amount,
        percentage_owned,
        net_value,
        redeemer_value,
        debt_share_value,
        gross_amount,
        haircut_amount,
        underlying_amount,
    })
}

/// Collateral sufficiency: the whole net position must cover the payout
pub fn ensure_collateral_covers(net_value: u128, reference_price: u128, requested: u128) -> Result<()> {
    let available = value_to_amount(net_value, TrackedAsset::WETH, reference_price)?;
    if available < requested {
        return Err(VaultError::Redeem(RedeemError::InsufficientCollateral {
            requested: requested.to_string(),
            available: available.to_string(),
        }));
    }
    Ok(())
}

fn nothing_to_redeem(reason: &str) -> VaultError {
    VaultError::Redeem(RedeemError::NothingToRedeem {
        reason: reason.to_string(),
    })
}
