//! Unit newtypes for network and storage quantities.
//!
//! Input files give temperatures in °C while every COP, loss and content
//! formula works in Kelvin; lengths, loads and currents travel between the
//! street graph, the catalog and the load flow. Wrapping them keeps those
//! conversions visible at the boundaries:
//!
//! ```
//! use cea_core::units::{Celsius, Meters};
//!
//! let supply = Celsius(70.0).to_kelvin();
//! assert!((supply.value() - 343.15).abs() < 1e-9);
//! assert_eq!((Meters(100.0) + Meters(200.0)).value(), 300.0);
//! ```
//!
//! Arithmetic stays within one unit; `Meters(1.0) + Kilowatts(1.0)` does not compile.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, factor: f64) -> Self {
                Self(self.0 * factor)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*} {}", p, self.0, $symbol),
                    None => write!(f, "{} {}", self.0, $symbol),
                }
            }
        }
    };
}

quantity!(
    /// Street or line length (m)
    Meters,
    "m"
);
quantity!(
    /// Peak electrical load (kW)
    Kilowatts,
    "kW"
);
quantity!(
    /// Energy over one hourly step (Wh)
    WattHours,
    "Wh"
);
quantity!(
    /// Line current (A)
    Amperes,
    "A"
);
quantity!(
    /// Absolute temperature (K)
    Kelvin,
    "K"
);
quantity!(
    /// Temperature as written in hourly input and output files (°C)
    Celsius,
    "°C"
);

impl Meters {
    pub fn to_km(self) -> f64 {
        self.0 / 1_000.0
    }
}

impl Kilowatts {
    #[inline]
    pub fn to_watts(self) -> f64 {
        self.0 * 1_000.0
    }
}

impl WattHours {
    pub fn to_kwh(self) -> f64 {
        self.0 / 1_000.0
    }
}

impl Amperes {
    /// Fraction of `rating` carried; infinite for a zero rating.
    pub fn loading(self, rating: Amperes) -> f64 {
        if rating.0 > 0.0 {
            self.0 / rating.0
        } else {
            f64::INFINITY
        }
    }
}

impl Celsius {
    #[inline]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + KELVIN_OFFSET)
    }
}

impl Kelvin {
    #[inline]
    pub fn to_celsius(self) -> Celsius {
        Celsius(self.0 - KELVIN_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_add_up() {
        let route: Meters = [Meters(50.0), Meters(60.0), Meters(40.0)].into_iter().sum();
        assert_eq!(route.value(), 150.0);
        assert_eq!((route - Meters(50.0)).to_km(), 0.1);
        assert_eq!((route * 2.0).value(), 300.0);
    }

    #[test]
    fn supply_temperature_round_trip() {
        let supply = Celsius(65.0).to_kelvin();
        assert!((supply.value() - 338.15).abs() < 1e-10);
        assert!((supply.to_celsius().value() - 65.0).abs() < 1e-10);
    }

    #[test]
    fn load_and_energy_scaling() {
        assert_eq!(Kilowatts(2.5).to_watts(), 2_500.0);
        assert_eq!(WattHours(8_760.0).to_kwh(), 8.76);
    }

    #[test]
    fn loading_against_rating() {
        assert_eq!(Amperes(35.0).loading(Amperes(70.0)), 0.5);
        assert_eq!(Amperes(1.0).loading(Amperes(0.0)), f64::INFINITY);
    }

    #[test]
    fn display_honours_precision() {
        assert_eq!(format!("{:.1}", Meters(100.0)), "100.0 m");
        assert_eq!(format!("{}", Amperes(50.0)), "50 A");
    }
}
