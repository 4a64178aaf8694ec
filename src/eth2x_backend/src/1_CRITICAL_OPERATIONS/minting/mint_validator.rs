//! Validation for mint operations

use candid::Principal;
use crate::infrastructure::errors::overflow;
use crate::infrastructure::{MintError, Result, ValidationError, VaultError};

pub fn validate_mint_request(beneficiary: &Principal, deposit: u128) -> Result<()> {
    // Shares minted to the anonymous principal could never be redeemed
    if beneficiary == &Principal::anonymous() {
        return Err(VaultError::Validation(ValidationError::InvalidPrincipal {
            principal: beneficiary.to_text(),
        }));
    }

    if deposit == 0 {
        return Err(VaultError::Mint(MintError::ZeroDeposit));
    }

    Ok(())
}

/// Supply after minting `shares` must still fit the ledger
pub fn validate_supply_headroom(total_supply: u128, shares: u128) -> Result<u128> {
    total_supply
        .checked_add(shares)
        .ok_or_else(|| overflow(format!("total supply {} + minted {}", total_supply, shares)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_beneficiary_rejected() {
        let result = validate_mint_request(&Principal::anonymous(), 1);
        assert!(matches!(result, Err(VaultError::Validation(ValidationError::InvalidPrincipal { .. }))));
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let result = validate_mint_request(&Principal::from_slice(&[2]), 0);
        assert!(matches!(result, Err(VaultError::Mint(MintError::ZeroDeposit))));
    }

    #[test]
    fn test_supply_headroom() {
        assert_eq!(validate_supply_headroom(10, 5).unwrap(), 15);
        assert!(validate_supply_headroom(u128::MAX, 1).unwrap_err().is_fatal());
    }
}
