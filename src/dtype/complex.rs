//! Complex number type for numdag terminals
//!
//! `Complex128` is stored in interleaved format (re, im), matching the layout
//! of a column-major complex matrix buffer, and is `bytemuck`-Pod so buffers
//! can be reinterpreted without copies.
//!
//! Arithmetic follows the standard definitions:
//! - Addition: `(a+bi) + (c+di) = (a+c) + (b+d)i`
//! - Multiplication: `(a+bi)(c+di) = (ac-bd) + (ad+bc)i`
//! - Division: `(a+bi)/(c+di) = (a+bi)*conj(c+di)/|c+di|^2`

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// 128-bit complex number with f64 real and imaginary parts
///
/// Memory layout: two consecutive `f64`s, real part first.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Complex128 {
    /// Real component
    pub re: f64,
    /// Imaginary component
    pub im: f64,
}

impl Complex128 {
    /// Create a complex number from real and imaginary parts
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Complex zero
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Complex one (multiplicative identity)
    pub const ONE: Self = Self::new(1.0, 0.0);

    /// Magnitude (modulus): `|z| = sqrt(re^2 + im^2)`
    pub fn magnitude(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Squared magnitude, avoiding the square root
    pub fn magnitude_squared(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Complex conjugate: `conj(a+bi) = a-bi`
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// True when both components are finite (no NaN/Inf)
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl From<f64> for Complex128 {
    fn from(re: f64) -> Self {
        Self::new(re, 0.0)
    }
}

impl Add for Complex128 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex128 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex128 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex128 {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        // Smith's algorithm avoids overflow in the naive |rhs|^2 denominator
        if rhs.re.abs() >= rhs.im.abs() {
            let r = rhs.im / rhs.re;
            let d = rhs.re + rhs.im * r;
            Self::new((self.re + self.im * r) / d, (self.im - self.re * r) / d)
        } else {
            let r = rhs.re / rhs.im;
            let d = rhs.re * r + rhs.im;
            Self::new((self.re * r + self.im) / d, (self.im * r - self.re) / d)
        }
    }
}

impl Neg for Complex128 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{}+{}i", self.re, self.im)
        } else {
            write!(f, "{}{}i", self.re, self.im)
        }
    }
}
