use std::f64::consts::{E, FRAC_1_SQRT_2, FRAC_PI_2, PI, SQRT_2, TAU};

/// Names resolved to constant variables, with their values.
pub const CONSTANTS: &[(&str, f64)] = &[("pi", PI),
                                        ("π", PI),
                                        ("pi2", TAU),
                                        ("pi05", FRAC_PI_2),
                                        ("e", E),
                                        ("sqrt2", SQRT_2),
                                        ("sqrt2inv", FRAC_1_SQRT_2),
                                        ("sqrt3", 1.732_050_807_568_877_2),
                                        ("sqrt5", 2.236_067_977_499_79),
                                        ("ToDeg", 180.0 / PI),
                                        ("ToRad", PI / 180.0)];

/// Looks up a built-in constant.
///
/// ## Example
/// ```
/// use mathtree::symbols::constant::constant_value;
///
/// assert_eq!(constant_value("pi05"), Some(std::f64::consts::FRAC_PI_2));
/// assert_eq!(constant_value("x"), None);
/// ```
#[must_use]
pub fn constant_value(name: &str) -> Option<f64> {
    CONSTANTS.iter()
             .find(|(constant, _)| *constant == name)
             .map(|(_, value)| *value)
}
