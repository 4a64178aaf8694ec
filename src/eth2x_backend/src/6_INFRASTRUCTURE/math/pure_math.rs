//! Pure mathematical functions - no I/O, no adapter calls
//! All functions here must be deterministic and side-effect free

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use crate::infrastructure::constants::BPS_DENOMINATOR;
use crate::infrastructure::errors::{invariant_violated, overflow, CalculationError, Result, VaultError};

/// Multiply two values and divide by a third with arbitrary precision
/// Formula: (a × b) ÷ c, rounded down
///
/// The intermediate product never overflows; only a quotient that does not
/// fit `u128` is reported as `ArithmeticOverflow`.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(VaultError::Calculation(CalculationError::DivisionByZero {
            operation: format!("({} × {}) ÷ {}", a, b, c),
        }));
    }

    let result = (BigUint::from(a) * BigUint::from(b)) / BigUint::from(c);

    result
        .to_u128()
        .ok_or_else(|| overflow(format!("({} × {}) ÷ {}", a, b, c)))
}

/// Same as `mul_div` but rounds up; used for amounts owed to the protocol
pub fn mul_div_ceil(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(VaultError::Calculation(CalculationError::DivisionByZero {
            operation: format!("ceil(({} × {}) ÷ {})", a, b, c),
        }));
    }

    let product = BigUint::from(a) * BigUint::from(b);
    let divisor = BigUint::from(c);
    let mut result = &product / &divisor;
    if !(product % divisor).is_zero() {
        result += 1u32;
    }

    result
        .to_u128()
        .ok_or_else(|| overflow(format!("ceil(({} × {}) ÷ {})", a, b, c)))
}

/// 10^exp, failing once the power leaves u128
pub fn pow10(exp: u32) -> Result<u128> {
    10u128
        .checked_pow(exp)
        .ok_or_else(|| overflow(format!("10^{}", exp)))
}

/// `amount × bps ÷ 10_000`, rounded down
pub fn bps_of(amount: u128, bps: u32) -> Result<u128> {
    mul_div(amount, bps as u128, BPS_DENOMINATOR)
}

/// Remove a basis-point haircut from `amount`
///
/// Returns `(net, haircut)`. The haircut is rounded up so the net amount
/// never exceeds what the holder is entitled to.
pub fn apply_bps_haircut(amount: u128, haircut_bps: u32) -> Result<(u128, u128)> {
    if haircut_bps as u128 > BPS_DENOMINATOR {
        return Err(overflow(format!("haircut of {} bps", haircut_bps)));
    }
    let haircut = mul_div_ceil(amount, haircut_bps as u128, BPS_DENOMINATOR)?;
    Ok((amount - haircut, haircut))
}

/// collateral − debt, treating an insolvent position as a broken invariant
pub fn checked_net_value(collateral_value: u128, debt_value: u128) -> Result<u128> {
    collateral_value.checked_sub(debt_value).ok_or_else(|| {
        invariant_violated(format!(
            "debt value {} exceeds collateral value {}",
            debt_value, collateral_value
        ))
    })
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::constants::WAD;

    #[test]
    fn test_mul_div() {
        assert_eq!(mul_div(100, 200, 50).unwrap(), 400);
    }

    #[test]
    fn test_mul_div_rounds_down() {
        // (3 * 7) / 2 = 21 / 2 = 10
        assert_eq!(mul_div(3, 7, 2).unwrap(), 10);
    }

    #[test]
    fn test_mul_div_ceil_rounds_up() {
        assert_eq!(mul_div_ceil(3, 7, 2).unwrap(), 11);
        assert_eq!(mul_div_ceil(4, 5, 2).unwrap(), 10);
    }

    #[test]
    fn test_division_by_zero() {
        let result = mul_div(100, 200, 0);
        assert!(matches!(result, Err(VaultError::Calculation(CalculationError::DivisionByZero { .. }))));
    }

    #[test]
    fn test_large_intermediate_product() {
        // u128::MAX * WAD overflows a u128 product, but the quotient fits
        let result = mul_div(u128::MAX, WAD, WAD).unwrap();
        assert_eq!(result, u128::MAX);
    }

    #[test]
    fn test_quotient_overflow() {
        let result = mul_div(u128::MAX, 2, 1);
        assert!(matches!(result, Err(VaultError::Calculation(CalculationError::ArithmeticOverflow { .. }))));
    }

    #[test]
    fn test_pow10_bounds() {
        assert_eq!(pow10(0).unwrap(), 1);
        assert_eq!(pow10(18).unwrap(), WAD);
        assert!(pow10(38).is_ok());
        assert!(pow10(39).is_err());
    }

    #[test]
    fn test_haircut_one_percent() {
        let (net, haircut) = apply_bps_haircut(1_000_000, 100).unwrap();
        assert_eq!(haircut, 10_000);
        assert_eq!(net, 990_000);
    }

    #[test]
    fn test_haircut_rounds_against_holder() {
        // 1% of 150 = 1.5 → haircut 2, net 148
        let (net, haircut) = apply_bps_haircut(150, 100).unwrap();
        assert_eq!(haircut, 2);
        assert_eq!(net, 148);
    }

    #[test]
    fn test_net_value_insolvent() {
        assert_eq!(checked_net_value(10, 4).unwrap(), 6);
        let result = checked_net_value(4, 10);
        assert!(matches!(
            result,
            Err(VaultError::Calculation(CalculationError::AccountingInvariantViolated { .. }))
        ));
    }
}
