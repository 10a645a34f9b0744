//! Mathematical functions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cubic polynomial, such as the width of a lane along its length.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicFn {
    /// The coefficients, lowest order first.
    coeffs: [f64; 4],
}

impl CubicFn {
    pub const fn constant(y: f64) -> Self {
        Self::poly3(y, 0.0, 0.0, 0.0)
    }

    /// Creates the polynomial `a + b*x + c*x^2 + d*x^3`.
    pub const fn poly3(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            coeffs: [a, b, c, d],
        }
    }

    pub fn y(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.coeffs;
        a + x * (b + x * (c + x * d))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    pub fn poly3() {
        let cubic = CubicFn::poly3(3.5, 0.1, 0.0, -0.001);
        assert_approx_eq!(cubic.y(0.), 3.5);
        assert_approx_eq!(cubic.y(10.), 3.5 + 1.0 - 1.0);
        assert_approx_eq!(cubic.y(-10.), 3.5 - 1.0 + 1.0);
    }

    #[test]
    pub fn constant() {
        let cubic = CubicFn::constant(4.0);
        assert_approx_eq!(cubic.y(123.0), 4.0);
    }
}
