//! Error taxonomy
//!
//! Every operation returns `Result<T>`. Errors never get caught and handled
//! inside an operation: the first one aborts it and the host undoes the call.

use candid::CandidType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("mint error: {0}")]
    Mint(MintError),
    #[error("redeem error: {0}")]
    Redeem(RedeemError),
    #[error("rebalance error: {0}")]
    Rebalance(RebalanceError),
    #[error("calculation error: {0}")]
    Calculation(CalculationError),
    #[error("external error: {0}")]
    External(ExternalError),
    #[error("trading error: {0}")]
    Trading(TradingError),
    #[error("access error: {0}")]
    Access(AccessError),
    #[error("ledger error: {0}")]
    Ledger(LedgerError),
    #[error("validation error: {0}")]
    Validation(ValidationError),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("deposit amount cannot be zero")]
    ZeroDeposit,
    #[error("deposit of {deposit} wei is too small to mint any shares")]
    ZeroSharesMinted { deposit: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum RedeemError {
    #[error("nothing to redeem: {reason}")]
    NothingToRedeem { reason: String },
    #[error("insufficient collateral: requested {requested} wei, position covers {available} wei")]
    InsufficientCollateral { requested: String, available: String },
    #[error("insufficient shares: holder has {available}, requested {requested}")]
    InsufficientShares { requested: String, available: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum RebalanceError {
    #[error("invalid rebalance plan: {reason}")]
    InvalidPlan { reason: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },
    #[error("division by zero in {operation}")]
    DivisionByZero { operation: String },
    #[error("accounting invariant violated: {reason}")]
    AccountingInvariantViolated { reason: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalError {
    #[error("read from {source_name} failed: {reason}")]
    ExternalReadFailure { source_name: String, reason: String },
    #[error("{operation} failed: {reason}")]
    ExternalCallFailure { operation: String, reason: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum TradingError {
    #[error("invalid swap: {reason}")]
    InvalidSwapAmount { reason: String },
    #[error("slippage exceeded: received {actual}, minimum {minimum}")]
    SlippageExceeded { minimum: String, actual: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("{principal} is not permitted to mint")]
    Unauthorized { principal: String },
    #[error("{principal} is not the owner")]
    NotOwner { principal: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: String, available: String },
    #[error("insufficient allowance: required {required}, approved {approved}")]
    InsufficientAllowance { required: String, approved: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: String },
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
    #[error("invalid principal: {principal}")]
    InvalidPrincipal { principal: String },
}

#[derive(CandidType, Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("failed to encode state: {reason}")]
    EncodeFailed { reason: String },
    #[error("failed to decode state: {reason}")]
    DecodeFailed { reason: String },
}

impl VaultError {
    /// Fatal errors signal a miscalibrated scale or an insolvent position
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VaultError::Calculation(CalculationError::ArithmeticOverflow { .. })
                | VaultError::Calculation(CalculationError::AccountingInvariantViolated { .. })
        )
    }
}

pub(crate) fn overflow(operation: impl Into<String>) -> VaultError {
    VaultError::Calculation(CalculationError::ArithmeticOverflow {
        operation: operation.into(),
    })
}

pub(crate) fn invariant_violated(reason: impl Into<String>) -> VaultError {
    VaultError::Calculation(CalculationError::AccountingInvariantViolated {
        reason: reason.into(),
    })
}
