//! Numeric Sanitization
//!
//! Numerical stability utilities for the scoring path.
//!
//! Functions:
//! - Ability / learning-rate repair
//! - Logit exponent clamping
//! - Text truncation on a char boundary (content filter scan cap)

use crate::types::{ScaleRange, EPSILON, MAX_LOGIT_EXPONENT};

/// Repair an ability estimate: NaN falls back to `prior`, infinities
/// saturate at the range bounds, everything is clipped into `range`.
pub fn sanitize_ability(value: f64, prior: f64, range: &ScaleRange) -> f64 {
    if value.is_nan() {
        return range.clip(prior);
    }
    range.clip(value)
}

/// Learning rates must be finite and non-negative; anything else disables
/// the update.
pub fn sanitize_learning_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        0.0
    }
}

/// Clamp a logit exponent so `exp` never overflows. NaN maps to 0 (the
/// inflection point).
pub fn clamp_exponent(z: f64) -> f64 {
    if z.is_nan() {
        0.0
    } else {
        z.clamp(-MAX_LOGIT_EXPONENT, MAX_LOGIT_EXPONENT)
    }
}

/// Keep a probability strictly inside (0, 1) for log/ratio computations
pub fn open_unit(p: f64) -> f64 {
    if p.is_nan() {
        return 0.5;
    }
    p.clamp(EPSILON, 1.0 - EPSILON)
}

/// Split `text` at the largest char boundary not exceeding `max_len` bytes.
///
/// Returns the scanned head and the (possibly empty) unscanned tail.
pub fn split_at_char_boundary(text: &str, max_len: usize) -> (&str, &str) {
    if text.len() <= max_len {
        return (text, "");
    }
    let mut cut = max_len;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.split_at(cut)
}
