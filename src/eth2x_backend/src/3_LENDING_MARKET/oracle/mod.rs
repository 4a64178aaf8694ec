//! Spot price oracle boundary
//!
//! Prices come with their own decimal scale, which may differ from the
//! lending market's base currency. Reconciliation happens in the snapshot
//! reader, never here.

use crate::types::{Price, TrackedAsset};
use super::CallResult;

pub trait PriceOracle {
    /// Price of one whole unit of `asset` in USD, at the oracle's scale
    fn price(&self, asset: TrackedAsset) -> CallResult<Price>;
}
