//! Snap-to-grid and scale clamping.
//!
//! Every geometry update produced by the engine flows through these helpers,
//! so the numeric invariants (grid alignment, scale range) hold no matter
//! which gesture produced the value.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::{MAX_SCALE, MIN_SCALE};

/// Round `value` to the nearest multiple of `grid_size`.
///
/// A non-positive or non-finite grid size leaves the value untouched.
#[must_use]
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap only when snapping is enabled.
#[must_use]
pub fn snap_if(value: f64, enabled: bool, grid_size: f64) -> f64 {
    if enabled { snap(value, grid_size) } else { value }
}

/// Clamp a scale factor into `[MIN_SCALE, MAX_SCALE]`.
///
/// NaN collapses to the lower bound so a degenerate gesture can never
/// persist an out-of-range scale.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
