//! Unit newtypes for line lengths and outage durations.
//!
//! Reliability accounting multiplies lengths, rates and durations together,
//! and the field data mixes hours and minutes freely. Wrapping the two
//! dimensional quantities keeps a kilometre from ever being added to a
//! minute and makes the hour/minute conversion explicit.
//!
//! All types are `#[repr(transparent)]` over `f64`.
//!
//! ```
//! use relia_core::units::{Kilometers, Minutes};
//!
//! let trunk = Kilometers(1.5) + Kilometers(2.0);
//! assert_eq!(trunk.value(), 3.5);
//!
//! let repair = Minutes::from_hours(3.0);
//! assert_eq!(repair, Minutes(180.0));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Add;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            #[inline]
            pub fn is_sign_negative(self) -> bool {
                self.0 < 0.0
            }
        }
    };
}

/// Conductor length in kilometres (km)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

impl_unit_ops!(Kilometers, "km");

/// Duration in minutes (min)
///
/// All outage durations and the reporting period are carried in minutes,
/// so SAIDI comes out in minutes per customer per period.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Minutes(pub f64);

impl_unit_ops!(Minutes, "min");

impl Minutes {
    /// Minutes in a non-leap year (8760 h).
    pub const YEAR: Minutes = Minutes(8760.0 * 60.0);

    #[inline]
    pub fn from_hours(hours: f64) -> Self {
        Self(hours * 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hours() {
        let m = Minutes::from_hours(3.073);
        assert!((m.value() - 184.38).abs() < 1e-9);
    }

    #[test]
    fn test_year_constant() {
        assert_eq!(Minutes::YEAR.value(), 525_600.0);
    }

    #[test]
    fn test_add_and_sign() {
        assert_eq!(Kilometers(1.0) + Kilometers(2.5), Kilometers(3.5));
        assert!(Kilometers(-0.1).is_sign_negative());
        assert!(!Minutes(f64::INFINITY).is_finite());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Kilometers(1.25)), "1.2500 km");
        assert_eq!(format!("{}", Minutes(33.42)), "33.4200 min");
    }
}
