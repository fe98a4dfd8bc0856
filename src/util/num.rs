/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Relative slack applied when counting steps, so that `0..0.3` with step
/// `0.1` yields three steps although `0.3 / 0.1` is `2.9999999999999996`.
const STEP_SLACK: f64 = 1e-9;

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// ## Example
/// ```
/// use mathtree::util::num::usize_to_f64_checked;
///
/// assert_eq!(usize_to_f64_checked(42), Some(42.0));
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn usize_to_f64_checked(value: usize) -> Option<f64> {
    let wide = u64::try_from(value).ok()?;
    if wide > MAX_SAFE_U64_INT {
        return None;
    }
    Some(wide as f64)
}

/// Safely converts a non-negative, integral, finite `f64` to `usize`.
///
/// ## Example
/// ```
/// use mathtree::util::num::f64_to_usize_checked;
///
/// assert_eq!(f64_to_usize_checked(12.0), Some(12));
/// assert_eq!(f64_to_usize_checked(1.5), None);
/// assert_eq!(f64_to_usize_checked(f64::NAN), None);
/// ```
#[allow(clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss)]
#[must_use]
pub fn f64_to_usize_checked(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return None;
    }
    if value > MAX_SAFE_U64_INT as f64 {
        return None;
    }
    usize::try_from(value as u64).ok()
}

/// Counts how many whole steps of size `step` fit into `span`.
///
/// Both arguments are taken by magnitude. Returns `None` when the count is
/// not finite (zero or NaN step, infinite span) or too large to index.
///
/// ## Example
/// ```
/// use mathtree::util::num::whole_steps;
///
/// assert_eq!(whole_steps(4.0, 1.0), Some(4));
/// assert_eq!(whole_steps(1.0, 0.1), Some(10));
/// assert_eq!(whole_steps(1.0, 0.0), None);
/// ```
#[must_use]
pub fn whole_steps(span: f64, step: f64) -> Option<usize> {
    let ratio = span.abs() / step.abs();
    if !ratio.is_finite() {
        return None;
    }
    f64_to_usize_checked((ratio * (1.0 + STEP_SLACK)).floor())
}

/// Counts how many steps of at most `step` cover `span`, rounding up and
/// never returning less than one.
///
/// ## Example
/// ```
/// use mathtree::util::num::covering_steps;
///
/// assert_eq!(covering_steps(1.0, 0.3), Some(4));
/// assert_eq!(covering_steps(1.0, 0.25), Some(4));
/// ```
#[must_use]
pub fn covering_steps(span: f64, step: f64) -> Option<usize> {
    let ratio = span.abs() / step.abs();
    if !ratio.is_finite() {
        return None;
    }
    f64_to_usize_checked((ratio * (1.0 - STEP_SLACK)).ceil().max(1.0))
}
