//! Degree/radian conversion and heading normalization.
//!
//! Headings follow screen coordinates: 0° points right, 90° down, 180° left
//! and 270° up, so angles grow clockwise on screen.

use std::f64::consts::{PI, TAU};

/// Decimal places kept for positions and headings.
const QUANTUM: f64 = 1_000.0;

/// Reduce `value` into `[0, modulus)`.
fn wrap(value: f64, modulus: f64) -> f64 {
    let wrapped = value.rem_euclid(modulus);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= modulus { 0.0 } else { wrapped }
}

/// Convert degrees to radians in `[0, 2π)`.
pub fn to_radians(degrees: f64) -> f64 {
    wrap(degrees * PI / 180.0, TAU)
}

/// Convert radians to degrees in `[0, 360)`.
pub fn to_degrees(radians: f64) -> f64 {
    wrap(radians * 180.0 / PI, 360.0)
}

/// Round to three decimals, ties to even.
pub fn quantize(value: f64) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0
    (value * QUANTUM).round_ties_even() / QUANTUM + 0.0
}

/// Wrap a heading into `[0, 360)` and quantize it.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let heading = quantize(wrap(degrees, 360.0));
    if heading >= 360.0 { 0.0 } else { heading }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Distance between two angles on the 360° circle.
    fn circular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_to_radians() {
        assert!((to_radians(180.0) - PI).abs() < 1e-12);
        assert!((to_radians(-90.0) - 1.5 * PI).abs() < 1e-12);
        let full_turn = to_radians(360.0);
        assert!(full_turn < 1e-12 || TAU - full_turn < 1e-12);
    }

    #[test]
    fn test_to_degrees() {
        assert!((to_degrees(PI / 2.0) - 90.0).abs() < 1e-12);
        assert!((to_degrees(-PI / 2.0) - 270.0).abs() < 1e-12);
        assert!((to_degrees(5.0 * PI) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            0.0, 1.0, 45.5, 90.0, 179.999, 359.9, 360.0, 725.25, -0.5, -30.0, -721.0, 1e6, -1e6,
        ];
        for d in samples {
            let back = to_degrees(to_radians(d));
            assert!(
                circular_distance(back, d.rem_euclid(360.0)) < 1e-6,
                "{d} came back as {back}"
            );
            assert!((0.0..360.0).contains(&back));
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(1.23456), 1.235);
        assert_eq!(quantize(-1.23449), -1.234);
        assert_eq!(quantize(0.0005), 0.0);
        assert_eq!(quantize(0.0015), 0.002);
        assert!(quantize(-0.0001).is_sign_positive());
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(-720.5), 359.5);
        // Rounds up to 360 and must wrap back to 0
        assert_eq!(normalize_degrees(-0.0001), 0.0);
        assert_eq!(normalize_degrees(359.9996), 0.0);
    }

    #[test]
    fn test_normalize_stays_in_range() {
        let mut value = -1234.5678;
        while value < 1234.5678 {
            let heading = normalize_degrees(value);
            assert!((0.0..360.0).contains(&heading), "{value} -> {heading}");
            value += 7.777;
        }
    }
}
