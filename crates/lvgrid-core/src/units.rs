//! Compile-time unit safety for distribution network quantities.
//!
//! Cable data arrives per kilometre while lengths are stored in metres, and
//! federate inputs arrive in watts while the engine expects kilowatts. The
//! newtypes below keep those apart.
//!
//! All types are `#[repr(transparent)]` wrappers around `f64`.
//!
//! # Usage
//!
//! ```
//! use lvgrid_core::units::{Kilowatts, Meters};
//!
//! assert!((Meters(200.0).to_kilometers().value() - 0.2).abs() < 1e-12);
//! assert!((Kilowatts::from_watts(1500.0).value() - 1.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

// =============================================================================
// Length
// =============================================================================

/// Cable length in metres, as stored on cable assets.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(pub f64);

impl_unit_ops!(Meters, "m");

/// Length in kilometres, the unit line codes are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

impl_unit_ops!(Kilometers, "km");

impl Meters {
    #[inline]
    pub fn to_kilometers(self) -> Kilometers {
        Kilometers(self.0 / 1000.0)
    }
}

// =============================================================================
// Impedance
// =============================================================================

/// Series impedance component per kilometre (R1 or X1 of a line code).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct OhmsPerKm(pub f64);

impl_unit_ops!(OhmsPerKm, "Ω/km");

// =============================================================================
// Power
// =============================================================================

/// Active power in kilowatts (kW), the unit OpenDSS loads are set in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_unit_ops!(Kilowatts, "kW");

/// Reactive power in kilovolt-amperes reactive (kvar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovars(pub f64);

impl_unit_ops!(Kilovars, "kvar");

/// Apparent power in kilovolt-amperes (kVA)
///
/// Apparent power is the magnitude of complex power: S = √(P² + Q²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilovoltAmperes(pub f64);

impl_unit_ops!(KilovoltAmperes, "kVA");

impl Kilowatts {
    /// Convert a value published in watts.
    #[inline]
    pub fn from_watts(watts: f64) -> Self {
        Kilowatts(watts * 1e-3)
    }

    /// Compute apparent power given reactive power: S = √(P² + Q²)
    #[inline]
    pub fn apparent_power(self, q: Kilovars) -> KilovoltAmperes {
        KilovoltAmperes(self.0.hypot(q.0))
    }
}

impl Kilovars {
    /// Convert a value published in var.
    #[inline]
    pub fn from_vars(vars: f64) -> Self {
        Kilovars(vars * 1e-3)
    }
}

// =============================================================================
// Voltage & current
// =============================================================================

/// Voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

/// Current magnitude in amperes (A)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Amperes(pub f64);

impl_unit_ops!(Amperes, "A");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilowatts_arithmetic() {
        let p1 = Kilowatts(10.0);
        let p2 = Kilowatts(4.0);

        assert_eq!((p1 + p2).value(), 14.0);
        assert_eq!((p1 - p2).value(), 6.0);
        assert_eq!((-p1).value(), -10.0);
        assert_eq!((p1 * 2.0).value(), 20.0);
        assert_eq!((p1 / 2.0).value(), 5.0);
    }

    #[test]
    fn test_apparent_power() {
        let s = Kilowatts(30.0).apparent_power(Kilovars(40.0));
        assert!((s.value() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_watt_conversion() {
        assert!((Kilowatts::from_watts(2000.0).value() - 2.0).abs() < 1e-12);
        assert!((Kilovars::from_vars(-500.0).value() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_length_conversion() {
        assert!((Meters(1500.0).to_kilometers().value() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_sum_iterator() {
        let currents = vec![Amperes(10.0), Amperes(20.5), Amperes(30.0)];
        let total: Amperes = currents.into_iter().sum();
        assert_eq!(total.value(), 60.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Kilowatts(1.0)), "1.0000 kW");
        assert_eq!(format!("{}", OhmsPerKm(0.25)), "0.2500 Ω/km");
        assert_eq!(format!("{}", Kilovolts(10.5)), "10.5000 kV");
    }
}
