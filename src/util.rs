/// Numeric conversion helpers.
///
/// Lossless conversions between `usize` and `f64`, used wherever an iteration
/// count is derived from floating-point bounds. Every helper returns `None`
/// instead of silently rounding or saturating.
pub mod num;
