//! Conversions from user units to the driver's integer wire format.

use std::time::Duration;

/// Convert a time span to whole milliseconds, saturating to `[0, i32::MAX]`.
///
/// A span of days still fits; anything beyond `i32::MAX` milliseconds
/// (roughly 24.8 days) saturates instead of wrapping.
pub fn wire_milliseconds(span: Duration) -> i32 {
    saturating_millis(span.as_millis() as f64)
}

/// Clamp a raw millisecond count to the wire range `[0, i32::MAX]`.
///
/// Zero and negative counts map to 0. This is the signed-domain core of
/// [`wire_milliseconds`]; [`Duration`] cannot be negative, but the wire
/// contract is defined over the full signed domain.
pub fn saturating_millis(ms: f64) -> i32 {
    if ms <= 0.0 {
        return 0;
    }
    if ms >= i32::MAX as f64 {
        return i32::MAX;
    }
    ms as i32
}

/// Map a normalized gain onto the driver's asymmetric wire band.
///
/// The wire format puts attenuation below the driver default on `0..=255`
/// and boost above it on `256..`, so the two half-domains scale differently:
///
/// - `0.0` is the driver default and maps to `0` (a sentinel, not the band).
/// - positive gain maps to `round(gain * 256) + 255`, so `1.0` → `511`.
/// - negative gain shifts into `[0, 1]` and scales by 255, so `-1.0` → `0`
///   and `-0.5` → `128`; anything below `-1.0` clamps to `0`.
///
/// Rounds half away from zero (`f64::round`).
pub fn gain_to_wire(gain: f64) -> i32 {
    if gain == 0.0 {
        return 0;
    }
    if gain > 0.0 {
        let boost = (gain * 256.0).round();
        return saturating_i32(boost).saturating_add(255);
    }
    let attenuation = (gain + 1.0).max(0.0);
    saturating_i32((attenuation * 255.0).round())
}

/// Map a normalized frequency shift onto the driver's signed percentage.
///
/// The factor clamps to `[-1, 1]` before scaling, so `2.0` → `100` and
/// `-5.0` → `-100`. Rounds half away from zero (`f64::round`).
pub fn frequency_factor_to_wire(factor: f64) -> i32 {
    let f = if factor < -1.0 {
        -1.0
    } else if factor > 1.0 {
        1.0
    } else {
        factor
    };
    (f * 100.0).round() as i32
}

fn saturating_i32(value: f64) -> i32 {
    // `as` saturates float-to-int, including NaN -> 0.
    value as i32
}
