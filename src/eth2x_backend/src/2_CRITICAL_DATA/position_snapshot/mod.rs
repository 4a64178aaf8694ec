//! Position snapshot reader
//!
//! One lending-market read plus one oracle read per asset, aligned onto the
//! base-currency scale and frozen for the rest of the operation.
//! No retries: a failed read aborts the caller.

use candid::Principal;
use crate::_3_LENDING_MARKET::{CallFault, LendingMarket, PriceOracle};
use crate::infrastructure::constants::BASE_CURRENCY_DECIMALS;
use crate::infrastructure::errors::{invariant_violated, ExternalError, Result, VaultError};
use crate::infrastructure::math::{mul_div, pow10, to_canonical_scale};
use crate::types::{AccountSnapshot, PositionSnapshot, Price, TrackedAsset};

/// Read the vault's position
pub fn read_position<M: LendingMarket, O: PriceOracle>(
    market: &M,
    oracle: &O,
    vault_account: Principal,
    total_supply: u128,
) -> Result<PositionSnapshot> {
    let account = market
        .get_account_snapshot(vault_account)
        .map_err(|fault| read_failure("lending market", fault))?;
    validate_snapshot(&account)?;

    let reference_price = read_price(oracle, TrackedAsset::WETH)?;
    let quote_price = read_price(oracle, TrackedAsset::USDC)?;

    log::debug!(
        "📸 Position: collateral={} debt={} available={} (e8), WETH=${} USDC=${} (e8), supply={}",
        account.collateral_value,
        account.debt_value,
        account.available_borrow,
        reference_price,
        quote_price,
        total_supply
    );

    Ok(PositionSnapshot {
        account,
        reference_price,
        quote_price,
        total_supply,
    })
}

/// Oracle price of `asset`, rescaled to base-currency decimals
pub fn read_price<O: PriceOracle>(oracle: &O, asset: TrackedAsset) -> Result<u128> {
    let price = oracle
        .price(asset)
        .map_err(|fault| read_failure("price oracle", fault))?;
    validate_price(asset, &price)
}

/// Reject prices that cannot be used for valuation
pub fn validate_price(asset: TrackedAsset, price: &Price) -> Result<u128> {
    let rescaled = to_canonical_scale(price.value, price.decimals, BASE_CURRENCY_DECIMALS)?;

    if rescaled == 0 {
        return Err(VaultError::External(ExternalError::ExternalReadFailure {
            source_name: "price oracle".to_string(),
            reason: format!(
                "{} price {} (e{}) is zero on the base-currency scale",
                asset, price.value, price.decimals
            ),
        }));
    }

    Ok(rescaled)
}

/// Debt without collateral cannot come from a healthy market
pub fn validate_snapshot(account: &AccountSnapshot) -> Result<()> {
    if account.collateral_value == 0 && account.debt_value > 0 {
        return Err(invariant_violated(format!(
            "lending market reports debt {} with zero collateral",
            account.debt_value
        )));
    }
    Ok(())
}

/// Base-currency value of `amount` native units of `asset`, rounded down
pub fn amount_to_value(amount: u128, asset: TrackedAsset, price: u128) -> Result<u128> {
    mul_div(amount, price, pow10(asset.get_decimals())?)
}

/// Native units of `asset` worth `value`, rounded down
pub fn value_to_amount(value: u128, asset: TrackedAsset, price: u128) -> Result<u128> {
    mul_div(value, pow10(asset.get_decimals())?, price)
}

fn read_failure(source_name: &str, fault: CallFault) -> VaultError {
    log::warn!("❌ Read from {} failed: {}", source_name, fault);
    VaultError::External(ExternalError::ExternalReadFailure {
        source_name: source_name.to_string(),
        reason: fault.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockMarket, MockOracle, VAULT};

    #[test]
    fn test_oracle_scale_is_aligned() {
        let market = MockMarket::new(3_000);
        let oracle = MockOracle::from_market(&market);

        let position = read_position(&market, &oracle, VAULT, 0).unwrap();
        // Oracle reports e18, snapshot carries e8
        assert_eq!(position.reference_price, 300_000_000_000);
        assert_eq!(position.quote_price, 100_000_000);
    }

    #[test]
    fn test_market_failure_is_read_failure() {
        let mut market = MockMarket::new(3_000);
        market.fail_on("get_account_snapshot");
        let oracle = MockOracle::from_market(&market);

        let result = read_position(&market, &oracle, VAULT, 0);
        assert!(matches!(
            result,
            Err(VaultError::External(ExternalError::ExternalReadFailure { .. }))
        ));
    }

    #[test]
    fn test_dust_price_rejected() {
        // 1e-10 USD cannot be represented in e8
        let price = Price { value: 100_000_000, decimals: 18 };
        assert!(validate_price(TrackedAsset::WETH, &price).is_err());
    }

    #[test]
    fn test_debt_without_collateral_is_invariant_violation() {
        let account = AccountSnapshot { debt_value: 1, ..AccountSnapshot::default() };
        assert!(validate_snapshot(&account).unwrap_err().is_fatal());
    }

    #[test]
    fn test_amount_value_conversions() {
        let eth_price = 300_000_000_000; // $3,000 in e8
        // 2 WETH → $6,000
        assert_eq!(
            amount_to_value(2_000_000_000_000_000_000, TrackedAsset::WETH, eth_price).unwrap(),
            600_000_000_000
        );
        // $6,000 → 6,000 USDC (e6)
        assert_eq!(
            value_to_amount(600_000_000_000, TrackedAsset::USDC, 100_000_000).unwrap(),
            6_000_000_000
        );
        // $1,500 → 0.5 WETH
        assert_eq!(
            value_to_amount(150_000_000_000, TrackedAsset::WETH, eth_price).unwrap(),
            500_000_000_000_000_000
        );
    }
}
