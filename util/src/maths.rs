//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Return the euclidian norm (distance between) of two points.
///
/// If the points do not have the same number of dimentions then `None` is
/// returned.
pub fn norm<T>(point_0: &[T], point_1: &[T]) -> Option<T>
where
    T: Float + std::ops::AddAssign
{
    // Check that the dimentions match
    if point_0.len() != point_1.len() {
        return None;
    }

    // Sum the squared differences of all elements
    let mut sum = T::from(0).unwrap();

    for i in 0..point_0.len() {
        sum += (point_0[i] - point_1[i]).powi(2);
    }

    // Return the squareroot of the sum
    Some(sum.sqrt())
}

/// Limit a value to the range [min, max].
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Normalize an angle into the range [-pi, pi).
///
/// The function is idempotent, angles already in the range are returned
/// unchanged.
pub fn normalize_angle<T>(angle: T) -> T
where
    T: Float + std::ops::Rem
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    rem_euclid(angle + pi_t, tau_t) - pi_t
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Rem
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[0f64, 0f64], &[3f64, 4f64]), Some(5f64));
        assert_eq!(norm(&[1f64, 1f64, 1f64], &[1f64, 1f64, 1f64]), Some(0f64));

        // Mismatched dimentions give no norm
        assert_eq!(norm(&[0f64], &[1f64, 2f64]), None);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5f64);
        assert_eq!(clamp(&7f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-7f64, &-1f64, &1f64), -1f64);
    }

    #[test]
    fn test_normalize_angle_in_range() {
        // A spread of angles, all results must lie in [-pi, pi)
        let angles = [
            0f64, 1.0, -1.0, PI, -PI, 2.0 * PI, -2.0 * PI, 3.0 * PI,
            -3.0 * PI, 10.0, -10.0, 100.0, -100.0,
        ];

        for a in angles.iter() {
            let n = normalize_angle(*a);
            assert!(n >= -PI && n < PI, "normalize_angle({}) = {}", a, n);
        }
    }

    #[test]
    fn test_normalize_angle_values() {
        assert!((normalize_angle(0f64)).abs() < 1e-12);
        assert!((normalize_angle(2.0 * PI)).abs() < 1e-12);
        assert!((normalize_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((normalize_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);

        // +pi wraps to -pi since the range is half open
        assert!((normalize_angle(PI) - (-PI)).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle_idempotent() {
        for a in [-9.7f64, -2.0, 0.3, 4.0, 27.1].iter() {
            let once = normalize_angle(*a);
            let twice = normalize_angle(once);
            assert!((once - twice).abs() < 1e-12);
        }
    }
}
