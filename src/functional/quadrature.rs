use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{
    error::{ParseError, parse_error::ParseResult},
    util::num::{covering_steps, usize_to_f64_checked, whole_steps},
};

/// Error control of adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureSettings {
    /// Absolute error accepted for the whole integral.
    pub abs_tolerance:    f64,
    /// Error accepted relative to the magnitude of the integral.
    pub rel_tolerance:    f64,
    /// Maximum number of bisections before giving up.
    pub max_subdivisions: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self { abs_tolerance:    1e-10,
               rel_tolerance:    1e-10,
               max_subdivisions: 1000, }
    }
}

impl QuadratureSettings {
    /// Checks that both tolerances are finite and not negative.
    ///
    /// # Errors
    /// Returns `InvalidConfig` otherwise.
    pub fn validate(&self) -> ParseResult<()> {
        for (role, tolerance) in [("absolute", self.abs_tolerance),
                                  ("relative", self.rel_tolerance)]
        {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ParseError::InvalidConfig { details: format!("{role} tolerance {tolerance} must be finite and not negative") });
            }
        }
        Ok(())
    }
}

/// Positive Kronrod nodes of the G7K15 rule; the center comes first.
const KRONROD_NODES: [f64; 8] = [0.0,
                                 0.207_784_955_007_898_467_600_689_403_773_245,
                                 0.405_845_151_377_397_166_906_606_412_076_961,
                                 0.586_087_235_467_691_130_294_144_838_258_730,
                                 0.741_531_185_599_394_439_863_864_773_280_788,
                                 0.864_864_423_359_769_072_789_712_788_640_926,
                                 0.949_107_912_342_758_524_526_189_684_047_851,
                                 0.991_455_371_120_812_639_206_854_697_526_329];

const KRONROD_WEIGHTS: [f64; 8] = [0.209_482_141_084_727_828_012_999_174_891_714,
                                   0.204_432_940_075_298_892_414_161_999_234_649,
                                   0.190_350_578_064_785_409_913_256_402_421_014,
                                   0.169_004_726_639_267_902_826_583_426_598_550,
                                   0.140_653_259_715_525_918_745_189_590_510_238,
                                   0.104_790_010_322_250_183_839_876_322_541_518,
                                   0.063_092_092_629_978_553_290_700_663_189_204,
                                   0.022_935_322_010_529_224_963_732_008_058_970];

/// Gauss weights, for the Kronrod nodes of even index.
const GAUSS_WEIGHTS: [f64; 4] = [0.417_959_183_673_469_387_755_102_040_816_327,
                                 0.381_830_050_505_118_944_950_369_775_488_975,
                                 0.279_705_391_489_276_667_901_467_771_423_780,
                                 0.129_484_966_168_869_693_270_611_432_679_082];

/// One application of the G7K15 rule.
#[derive(Debug, Clone, Copy)]
struct Estimate {
    value: f64,
    error: f64,
}

fn gauss_kronrod<F>(f: &mut F, a: f64, b: f64) -> Estimate
    where F: FnMut(f64) -> f64
{
    let mid = (a + b) / 2.0;
    let half_length = (b - a) / 2.0;

    let center = f(mid);
    let mut kronrod = KRONROD_WEIGHTS[0] * center;
    let mut gauss = GAUSS_WEIGHTS[0] * center;

    for index in 1..KRONROD_NODES.len() {
        let offset = half_length * KRONROD_NODES[index];
        let pair = f(mid - offset) + f(mid + offset);
        kronrod += KRONROD_WEIGHTS[index] * pair;
        if index % 2 == 0 {
            gauss += GAUSS_WEIGHTS[index / 2] * pair;
        }
    }

    let value = half_length * kronrod;
    Estimate { value,
               error: (value - half_length * gauss).abs() }
}

/// A subinterval waiting for bisection, ordered by its error.
#[derive(Debug, Clone, Copy)]
struct Pending {
    a:        f64,
    b:        f64,
    estimate: Estimate,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate.error.total_cmp(&other.estimate.error)
    }
}

/// Integrates `f` over `[a, b]` by adaptive bisection of G7K15 estimates.
///
/// The subinterval with the largest error is bisected until the total error
/// is within tolerance or `max_subdivisions` is reached. A result that did
/// not converge is still returned, with a warning logged.
///
/// ## Example
/// ```
/// use mathtree::functional::quadrature::{QuadratureSettings, adaptive};
///
/// let value = adaptive(&mut |x: f64| x.sin(), 0.0, std::f64::consts::PI,
///                      &QuadratureSettings::default());
///
/// assert!((value - 2.0).abs() < 1e-12);
/// ```
#[allow(clippy::float_cmp)]
pub fn adaptive<F>(f: &mut F, a: f64, b: f64, settings: &QuadratureSettings) -> f64
    where F: FnMut(f64) -> f64
{
    if !a.is_finite() || !b.is_finite() {
        return f64::NAN;
    }
    if a == b {
        return 0.0;
    }

    let tolerance = |value: f64| {
        settings.abs_tolerance
                .max(settings.rel_tolerance * value.abs().max(1e-15))
    };

    let initial = gauss_kronrod(f, a, b);
    let mut value = initial.value;
    let mut error = initial.error;
    let mut heap = BinaryHeap::from([Pending { a,
                                               b,
                                               estimate: initial }]);

    let mut subdivisions = 0;
    while error > tolerance(value) && subdivisions < settings.max_subdivisions {
        let Some(worst) = heap.pop() else {
            break;
        };
        subdivisions += 1;

        let mid = (worst.a + worst.b) / 2.0;
        let left = gauss_kronrod(f, worst.a, mid);
        let right = gauss_kronrod(f, mid, worst.b);

        value += left.value + right.value - worst.estimate.value;
        error += left.error + right.error - worst.estimate.error;

        heap.push(Pending { a:        worst.a,
                            b:        mid,
                            estimate: left, });
        heap.push(Pending { a:        mid,
                            b:        worst.b,
                            estimate: right, });
    }

    if error > tolerance(value) {
        log::warn!("integral over [{a}, {b}] did not converge after {subdivisions} subdivisions: \
                    {value} ± {error}");
    }
    value
}

/// Integrates `f` over `[a, b]` with the composite trapezoid rule, using
/// `ceil(|b - a| / step)` equal panels.
///
/// Returns NaN for non-finite bounds and for a zero or non-finite step.
///
/// ## Example
/// ```
/// use mathtree::functional::quadrature::trapezoid;
///
/// assert!((trapezoid(&mut |x| x, 0.0, 1.0, 0.25) - 0.5).abs() < 1e-15);
/// assert!(trapezoid(&mut |x| x, 0.0, 1.0, 0.0).is_nan());
/// ```
pub fn trapezoid<F>(f: &mut F, a: f64, b: f64, step: f64) -> f64
    where F: FnMut(f64) -> f64
{
    if !a.is_finite() || !b.is_finite() || !step.is_finite() || step == 0.0 {
        return f64::NAN;
    }
    let Some(panels) = covering_steps(b - a, step) else {
        return f64::NAN;
    };
    let Some(count) = usize_to_f64_checked(panels) else {
        return f64::NAN;
    };

    let width = (b - a) / count;
    let mut total = (f(a) + f(b)) / 2.0;
    for k in 1..panels {
        let Some(k) = usize_to_f64_checked(k) else {
            return f64::NAN;
        };
        total += f(k.mul_add(width, a));
    }
    total * width
}

/// Sums `f` over `min, min ± step, ...` up to and including `max`.
///
/// The direction follows the sign of `max - min`; the sign of `step` is
/// ignored. Returns NaN for non-finite bounds and for a zero or non-finite
/// step.
///
/// ## Example
/// ```
/// use mathtree::functional::quadrature::sum_range;
///
/// assert_eq!(sum_range(&mut |i| i, 1.0, 5.0, 1.0), 15.0);
/// assert_eq!(sum_range(&mut |i| i, 5.0, 1.0, 2.0), 9.0);
/// ```
pub fn sum_range<F>(f: &mut F, min: f64, max: f64, step: f64) -> f64
    where F: FnMut(f64) -> f64
{
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || step == 0.0 {
        return f64::NAN;
    }
    let Some(steps) = whole_steps(max - min, step) else {
        return f64::NAN;
    };
    let stride = if max < min { -step.abs() } else { step.abs() };

    let mut total = 0.0;
    for k in 0..=steps {
        let Some(k) = usize_to_f64_checked(k) else {
            return f64::NAN;
        };
        total += f(k.mul_add(stride, min));
    }
    total
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{E, PI};

    use super::*;

    #[test]
    fn single_rule_is_exact_for_polynomials() {
        let estimate = gauss_kronrod(&mut |x| x * x, 0.0, 1.0);

        assert!((estimate.value - 1.0 / 3.0).abs() < 1e-14);
        assert!(estimate.error < 1e-14);
    }

    #[test]
    fn adaptive_handles_reversed_bounds() {
        let settings = QuadratureSettings::default();
        let forward = adaptive(&mut f64::exp, 0.0, 1.0, &settings);
        let backward = adaptive(&mut f64::exp, 1.0, 0.0, &settings);

        assert!((forward - (E - 1.0)).abs() < 1e-12);
        assert!((forward + backward).abs() < 1e-12);
    }

    #[test]
    fn adaptive_refines_peaked_integrands() {
        let value = adaptive(&mut |x: f64| 1.0 / (1e-4 + x * x),
                             -1.0,
                             1.0,
                             &QuadratureSettings::default());
        let expected = 2.0 * (1.0_f64 / 1e-2).atan() / 1e-2;

        assert!((value - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn adaptive_returns_best_estimate_when_capped() {
        let settings = QuadratureSettings { max_subdivisions: 0,
                                            ..QuadratureSettings::default() };
        let value = adaptive(&mut |x: f64| x.abs().sqrt(), -1.0, 1.0, &settings);

        assert!((value - 4.0 / 3.0).abs() < 1e-2);
    }

    #[test]
    fn empty_ranges_integrate_to_zero() {
        assert_eq!(adaptive(&mut f64::sin, PI, PI, &QuadratureSettings::default()), 0.0);
    }

    #[test]
    fn trapezoid_uses_covering_panels() {
        let mut calls = 0;
        let value = trapezoid(&mut |x| {
                                  calls += 1;
                                  x * x
                              },
                              0.0,
                              1.0,
                              0.3);

        assert_eq!(calls, 5);
        assert!((value - 0.343_75).abs() < 1e-15);
    }

    #[test]
    fn sums_include_both_bounds() {
        assert_eq!(sum_range(&mut |_| 1.0, 0.0, 0.3, 0.1), 4.0);
        assert_eq!(sum_range(&mut |i| i, 2.0, 2.0, 1.0), 2.0);
    }

    #[test]
    fn degenerate_steps_are_nan() {
        assert!(sum_range(&mut |i| i, 0.0, 1.0, 0.0).is_nan());
        assert!(sum_range(&mut |i| i, 0.0, f64::INFINITY, 1.0).is_nan());
        assert!(trapezoid(&mut |x| x, 0.0, 1.0, f64::NAN).is_nan());
    }

    #[test]
    fn negative_tolerances_are_rejected() {
        let settings = QuadratureSettings { rel_tolerance: -1.0,
                                            ..QuadratureSettings::default() };

        assert!(settings.validate().is_err());
    }
}
