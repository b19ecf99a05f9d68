/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for bob and trace positions
pub type Vector = bevy::math::DVec2;

/// Largest absolute component, or NaN when any component is NaN.
///
/// `f64::max` silently drops NaN, which would let a poisoned error estimate
/// look like a small one.
pub fn max_norm<const N: usize>(values: &[Scalar; N]) -> Scalar {
    values
        .iter()
        .try_fold(0.0, |norm: Scalar, value| {
            if value.is_nan() {
                None
            } else {
                Some(norm.max(value.abs()))
            }
        })
        .unwrap_or(Scalar::NAN)
}

/// `base + Σ slope_i * weight_i`, accumulated left to right.
///
/// Terms are folded in the order given so results are reproducible bit for bit.
pub fn linear_combination<const N: usize>(
    base: &[Scalar; N],
    terms: &[(&[Scalar; N], Scalar)],
) -> [Scalar; N] {
    let mut result = *base;
    for (slope, weight) in terms {
        for (value, slope) in result.iter_mut().zip(slope.iter()) {
            *value += slope * weight;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_norm() {
        assert_eq!(max_norm(&[1.0, -3.0, 2.0]), 3.0);
        assert_eq!(max_norm(&[0.0; 4]), 0.0);
        assert!(max_norm(&[1.0, Scalar::NAN, 2.0]).is_nan());
        assert_eq!(max_norm(&[1.0, Scalar::NEG_INFINITY]), Scalar::INFINITY);
    }

    #[test]
    fn test_linear_combination() {
        let base = [1.0, 2.0];
        let a = [1.0, 0.0];
        let b = [0.0, 2.0];

        assert_eq!(linear_combination(&base, &[]), base);
        assert_eq!(linear_combination(&base, &[(&a, 2.0), (&b, 0.5)]), [3.0, 3.0]);
    }
}
