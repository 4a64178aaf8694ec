//! Validation for redeem operations

use candid::Principal;
use crate::infrastructure::{RedeemError, Result, ValidationError, VaultError};

/// Checks that need no external read: amount and the caller's balance
pub fn validate_redeem_request(caller: &Principal, share_amount: u128, balance: u128) -> Result<()> {
    if caller == &Principal::anonymous() {
        return Err(VaultError::Validation(ValidationError::InvalidPrincipal {
            principal: caller.to_text(),
        }));
    }

    if share_amount == 0 {
        return Err(VaultError::Redeem(RedeemError::NothingToRedeem {
            reason: "share amount is zero".to_string(),
        }));
    }

    if balance < share_amount {
        return Err(VaultError::Redeem(RedeemError::InsufficientShares {
            requested: share_amount.to_string(),
            available: balance.to_string(),
        }));
    }

    Ok(())
}
