use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Assets the vault touches
///
/// WETH is the reference asset held as collateral; USDC is the quote asset
/// the vault borrows against it.
#[allow(clippy::upper_case_acronyms)]
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackedAsset {
    WETH,
    USDC,
}

impl TrackedAsset {
    pub fn to_symbol(&self) -> &'static str {
        match self {
            TrackedAsset::WETH => "WETH",
            TrackedAsset::USDC => "USDC",
        }
    }

    /// Native decimals of the asset's smallest unit
    pub fn get_decimals(&self) -> u32 {
        match self {
            TrackedAsset::WETH => 18,
            TrackedAsset::USDC => 6,
        }
    }
}

impl std::fmt::Display for TrackedAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_symbol())
    }
}
