//! Tempo chain planning.
//!
//! The tempo filter only accepts factors in `[0.5, 2.0]`, so larger changes
//! are split into a chain of in-range steps whose product is the target.

/// Smallest factor a single tempo step accepts.
pub const MIN_STEP: f64 = 0.5;

/// Largest factor a single tempo step accepts.
pub const MAX_STEP: f64 = 2.0;

/// Decompose `target` into tempo steps, applied in order.
///
/// Every step but the last is exactly `0.5` or `2.0`; the last is the
/// residual with 6 decimal digits, emitted even when it is `1.000000`.
/// Non-positive and non-finite targets are treated as 1.0.
pub fn plan(target: f64) -> Vec<String> {
    let mut remaining = if target > 0.0 && target.is_finite() {
        target
    } else {
        1.0
    };

    let mut steps = Vec::new();
    while remaining < MIN_STEP {
        steps.push("0.5".to_string());
        remaining /= MIN_STEP;
    }
    while remaining > MAX_STEP {
        steps.push("2.0".to_string());
        remaining /= MAX_STEP;
    }
    steps.push(format!("{remaining:.6}"));
    steps
}
