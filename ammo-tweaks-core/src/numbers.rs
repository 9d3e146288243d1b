//! Numeric helpers centralizing rounding and safe numeric casts.
//!
//! Every `round` in the patcher rounds half to even, so `2.5` becomes `2`
//! and `3.5` becomes `4`.

use num_traits::cast::cast;

/// Round a f32 half to even, returning 0.0 for non-finite values.
#[must_use]
pub fn round_f32(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    value.round_ties_even()
}

/// Round a f64 half to even and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round_ties_even();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Round a f32 half to even and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f32_to_i32(value: f32) -> i32 {
    round_f64_to_i32(f64::from(value))
}

/// Convert i32 to f32 while allowing precision loss in a single location.
#[must_use]
pub fn i32_to_f32(value: i32) -> f32 {
    cast::<i32, f32>(value).unwrap_or(0.0)
}
