use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

/// Emitted by a successful mint
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub beneficiary: Principal,
    /// WETH supplied to the lending market (wei)
    pub deposit: u128,
    /// Base-currency value of the deposit at the snapshot price (e8)
    pub deposit_value: u128,
    pub shares_minted: u128,
    pub total_supply_after: u128,
    pub timestamp: u64,
}

/// Emitted by a successful redeem
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RedeemReceipt {
    pub redeemer: Principal,
    pub shares_burned: u128,
    /// WETH paid to the redeemer (wei)
    pub underlying_amount: u128,
    /// WETH kept back by the haircut (wei)
    pub haircut_amount: u128,
    /// USDC repaid while unwinding the redeemer's share of debt
    pub debt_repaid: u128,
    /// WETH withdrawn to fund the repayments (wei)
    pub collateral_sold: u128,
    pub legs: u8,
    pub timestamp: u64,
}
