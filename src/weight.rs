//! Edge weights and their epsilon-tolerant canonical keys.
//!
//! The weight algebra (addition, multiplication, normalization) belongs to the
//! diagram builders. The node layer only needs two things from a weight: a way
//! to print it, and a deterministic integer key that is stable under
//! floating-point noise.
//!
//! # Quantization
//!
//! Every real component `x` is mapped to `round(x / epsilon)`, kept as an
//! `f64` and keyed by its bit pattern. Two weights are considered equal
//! exactly when their keys are equal, so the hash used by the unique table and
//! the equality it checks can never disagree. Rounded quotients beyond 2^53
//! are exact integers already, so large magnitudes never collapse onto one
//! key.
//!
//! ```text
//!        cell k-1      |       cell k        |      cell k+1
//!  ----------+---------|----------+----------|---------+--------
//!       (k-1)·eps  (k-½)·eps    k·eps    (k+½)·eps  (k+1)·eps
//! ```
//!
//! Consequences:
//!
//! - components more than `epsilon` apart never share a key;
//! - components in the same cell always share a key, even when they are
//!   almost `epsilon` apart;
//! - two components closer than `epsilon` that straddle a cell boundary get
//!   different keys.

use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Default tolerance for comparing weights.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Quantize a single real component onto the `epsilon` grid.
///
/// Returns the bit pattern of the rounded quotient. `-0.0` is folded into
/// `0.0` and every `NaN` into one canonical `NaN`. Quotients that overflow
/// `f64` land on the infinite keys.
pub fn quantize(value: f64, epsilon: f64) -> u64 {
    let scaled = (value / epsilon).round();
    if scaled == 0.0 {
        0.0f64.to_bits()
    } else if scaled.is_nan() {
        f64::NAN.to_bits()
    } else {
        scaled.to_bits()
    }
}

/// A weight carried by a diagram edge.
pub trait Weight: Clone + Debug + Display {
    /// Hashable, exactly comparable image of a weight on the epsilon grid.
    type Key: Copy + Eq + Hash + Debug;

    /// Derive the canonical key of this weight for the given tolerance.
    fn quantize(&self, epsilon: f64) -> Self::Key;

    /// Tolerant equality, consistent with [`Weight::quantize`].
    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.quantize(epsilon) == other.quantize(epsilon)
    }
}

impl Weight for f64 {
    type Key = u64;

    fn quantize(&self, epsilon: f64) -> u64 {
        quantize(*self, epsilon)
    }
}

/// A complex number used as an edge weight.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ONE: Complex = Complex::new(1.0, 0.0);

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::new(re, 0.0)
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}{:+.*}i", p, self.re, p, self.im),
            None => write!(f, "{}{:+}i", self.re, self.im),
        }
    }
}

impl Weight for Complex {
    type Key = (u64, u64);

    fn quantize(&self, epsilon: f64) -> (u64, u64) {
        (quantize(self.re, epsilon), quantize(self.im, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_quantize_grid() {
        assert_eq!(quantize(0.0, EPS), 0);
        assert_eq!(quantize(-0.0, EPS), 0);
        assert_eq!(quantize(-1e-12, EPS), 0);
        assert_eq!(quantize(1.0, EPS), 1e9f64.to_bits());
        assert_eq!(quantize(-1.0, EPS), (-1e9f64).to_bits());
        assert_eq!(quantize(f64::NAN, EPS), quantize(-f64::NAN, EPS));
        assert_ne!(quantize(f64::INFINITY, EPS), quantize(f64::NEG_INFINITY, EPS));
    }

    #[test]
    fn test_large_magnitudes_stay_distinct() {
        assert_ne!(quantize(1e10, EPS), quantize(2e10, EPS));
        assert_ne!(quantize(9.3e9, EPS), quantize(9.4e9, EPS));
        assert_ne!(quantize(1e200, EPS), quantize(-1e200, EPS));
        assert!(!1e10f64.approx_eq(&2e10, EPS));
        assert!(!Complex::new(1e10, 1.0).approx_eq(&Complex::new(2e10, 1.0), EPS));
        assert!(!Complex::new(0.0, -1e12).approx_eq(&Complex::new(0.0, -3e12), EPS));
    }

    #[test]
    fn test_noise_collapses() {
        assert!(1.0f64.approx_eq(&(1.0 + 3e-10), EPS));
        assert!(1.0f64.approx_eq(&(1.0 - 3e-10), EPS));
        assert!(!1.0f64.approx_eq(&(1.0 + 2e-9), EPS));
    }

    #[test]
    fn test_boundary_just_below_epsilon() {
        // Both ends sit in the cell centered on 1.0, 0.9·eps apart.
        let a = 1.0 - 0.45 * EPS;
        let b = 1.0 + 0.45 * EPS;
        assert!(b - a < EPS);
        assert_eq!(a.quantize(EPS), b.quantize(EPS));
    }

    #[test]
    fn test_boundary_just_above_epsilon() {
        let a = 1.0;
        let b = 1.0 + 1.1 * EPS;
        assert!(b - a > EPS);
        assert_ne!(a.quantize(EPS), b.quantize(EPS));
    }

    #[test]
    fn test_complex_key() {
        let a = Complex::new(0.5, -0.5);
        let b = Complex::new(0.5 + 1e-10, -0.5 - 1e-10);
        let c = Complex::new(0.5, 0.5);
        assert!(a.approx_eq(&b, EPS));
        assert!(!a.approx_eq(&c, EPS));
        assert_eq!(Complex::from(2.0), Complex::new(2.0, 0.0));
    }

    #[test]
    fn test_complex_display() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1-2i");
        assert_eq!(format!("{:.2}", Complex::new(0.5, 0.25)), "0.50+0.25i");
    }
}
