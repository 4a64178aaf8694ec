//! Vault configuration
//!
//! Deploy-time parameters. Defaults come from `constants.rs`; a host may
//! supply its own values at construction, which are validated once.

use candid::CandidType;
use serde::{Deserialize, Serialize};
use crate::infrastructure::constants::*;
use crate::infrastructure::errors::{Result, ValidationError, VaultError};

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Target collateral / debt ratio in WAD (2.0 = 2e18)
    pub target_ratio_wad: u128,
    /// No-op band around the target, in bps of the target
    pub rebalance_tolerance_bps: u32,
    /// Upper bound on adjustment steps within one rebalance call
    pub max_rebalance_steps: u8,
    /// Shares per whole WETH on the first mint
    pub bootstrap_rate: u128,
    pub redeem_haircut_bps: u32,
    /// Tunable safety margin, not a proven-safe constant
    pub redeem_repay_legs: u8,
    pub swap_slippage_bps: u32,
    pub swap_fee_tier: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            target_ratio_wad: TARGET_RATIO_WAD,
            rebalance_tolerance_bps: REBALANCE_TOLERANCE_BPS,
            max_rebalance_steps: MAX_REBALANCE_STEPS,
            bootstrap_rate: BOOTSTRAP_RATE,
            redeem_haircut_bps: REDEEM_HAIRCUT_BPS,
            redeem_repay_legs: REDEEM_REPAY_LEGS,
            swap_slippage_bps: SWAP_SLIPPAGE_BPS,
            swap_fee_tier: SWAP_FEE_TIER,
        }
    }
}

impl VaultConfig {
    pub fn validate(&self) -> Result<()> {
        // A ratio at or below 1.0 would mean debt ≥ collateral at target
        if self.target_ratio_wad <= WAD {
            return Err(invalid(format!(
                "target ratio {} must be above 1.0 (1e18)",
                self.target_ratio_wad
            )));
        }

        if self.rebalance_tolerance_bps as u128 >= BPS_DENOMINATOR {
            return Err(invalid(format!(
                "rebalance tolerance {} bps must be below 100%",
                self.rebalance_tolerance_bps
            )));
        }

        if self.max_rebalance_steps == 0 {
            return Err(invalid("max_rebalance_steps must be at least 1".to_string()));
        }

        if self.bootstrap_rate == 0 {
            return Err(invalid("bootstrap_rate cannot be zero".to_string()));
        }

        if self.redeem_haircut_bps as u128 >= BPS_DENOMINATOR {
            return Err(invalid(format!(
                "redeem haircut {} bps must be below 100%",
                self.redeem_haircut_bps
            )));
        }

        if self.redeem_repay_legs == 0 {
            return Err(invalid("redeem_repay_legs must be at least 1".to_string()));
        }

        if self.swap_slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(invalid(format!(
                "swap slippage {} bps exceeds maximum {} bps",
                self.swap_slippage_bps, MAX_SLIPPAGE_BPS
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> VaultError {
    VaultError::Validation(ValidationError::InvalidConfig { reason })
}
