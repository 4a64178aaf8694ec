//! Math - fixed-point helpers and the scale adapter

pub mod pure_math;
pub mod scale;

pub use pure_math::{apply_bps_haircut, bps_of, checked_net_value, mul_div, mul_div_ceil, pow10};
pub use scale::to_canonical_scale;
