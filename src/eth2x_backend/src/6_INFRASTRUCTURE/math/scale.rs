//! Fixed-point scale adapter
//!
//! Lending-market valuations and oracle prices arrive in different decimal
//! scales. Nothing combines them until both sit on the same scale.
//!
//! ## Rounding
//! - Widening multiplies exactly; overflow is `ArithmeticOverflow`
//! - Narrowing floors, so a conversion never fabricates precision in the
//!   caller's favour

use crate::infrastructure::errors::{overflow, Result};
use super::pure_math::pow10;

/// Move `value` from `source_decimals` to `target_decimals`
pub fn to_canonical_scale(value: u128, source_decimals: u32, target_decimals: u32) -> Result<u128> {
    if source_decimals == target_decimals {
        return Ok(value);
    }

    if source_decimals < target_decimals {
        let multiplier = pow10(target_decimals - source_decimals)?;
        value.checked_mul(multiplier).ok_or_else(|| {
            overflow(format!(
                "to_canonical_scale({}, {}, {})",
                value, source_decimals, target_decimals
            ))
        })
    } else {
        let diff = source_decimals - target_decimals;
        // Anything at or beyond 10^39 exceeds u128::MAX, so the quotient is zero
        match pow10(diff) {
            Ok(divisor) => Ok(value / divisor),
            Err(_) => Ok(0),
        }
    }
}
