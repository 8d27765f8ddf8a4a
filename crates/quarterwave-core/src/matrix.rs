//! 2×2 characteristic matrices for lossless dielectric layers.
//!
//! At normal incidence a homogeneous layer of index $n$ and phase thickness
//! $\varphi$ relates the tangential fields on its two faces through
//!
//! $$
//! M(n) = \begin{pmatrix} \cos\varphi & \tfrac{i}{n}\sin\varphi \\ i n \sin\varphi & \cos\varphi \end{pmatrix}
//! $$
//!
//! The matrix of a stack is the ordered product of its layer matrices, first
//! factor nearest the incident medium.

use std::ops::Mul;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A 2×2 complex characteristic matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerMatrix {
    pub m00: Complex64,
    pub m01: Complex64,
    pub m10: Complex64,
    pub m11: Complex64,
}

impl LayerMatrix {
    pub fn new(m00: Complex64, m01: Complex64, m10: Complex64, m11: Complex64) -> Self {
        Self { m00, m01, m10, m11 }
    }

    /// The identity matrix (an empty stack).
    pub fn identity() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self::new(one, zero, zero, one)
    }

    /// Characteristic matrix of a single layer of real index `n` at phase `phi`.
    pub fn for_layer(n: f64, phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self {
            m00: Complex64::new(c, 0.0),
            m01: Complex64::new(0.0, s / n),
            m10: Complex64::new(0.0, n * s),
            m11: Complex64::new(c, 0.0),
        }
    }

    /// Determinant $m_{00}m_{11} - m_{01}m_{10}$.
    pub fn determinant(&self) -> Complex64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// `true` when $|\det M| = 1$ within `tol`, as required for a lossless layer.
    pub fn is_unimodular(&self, tol: f64) -> bool {
        (self.determinant().norm() - 1.0).abs() <= tol
    }

    /// Integer power by repeated squaring. `pow(0)` is the identity.
    pub fn pow(&self, exp: u32) -> Self {
        let mut result = Self::identity();
        let mut base = *self;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result * base;
            }
            e >>= 1;
            if e > 0 {
                base = base * base;
            }
        }
        result
    }

    /// `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.m00.is_finite() && self.m01.is_finite() && self.m10.is_finite() && self.m11.is_finite()
    }
}

impl Mul for LayerMatrix {
    type Output = LayerMatrix;

    fn mul(self, rhs: LayerMatrix) -> LayerMatrix {
        LayerMatrix {
            m00: self.m00 * rhs.m00 + self.m01 * rhs.m10,
            m01: self.m00 * rhs.m01 + self.m01 * rhs.m11,
            m10: self.m10 * rhs.m00 + self.m11 * rhs.m10,
            m11: self.m10 * rhs.m01 + self.m11 * rhs.m11,
        }
    }
}
