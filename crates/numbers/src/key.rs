use serde::{Deserialize, Serialize};

/// Number of significant decimal digits kept in a [`Key`]
pub const SIGNIFICANT_DIGITS: i32 = 12;

const MANTISSA_FLOOR: i64 = 100_000_000_000;
const MANTISSA_CEIL: i64 = 1_000_000_000_000;

/// Canonical identity of a value, rounded to [`SIGNIFICANT_DIGITS`].
///
/// Values reached through different computation paths (`√4` and `2`,
/// `0.1 + 0.2` and `0.3`) collapse onto the same key. Distinct values that
/// happen to agree on every kept digit collapse too; that imprecision is
/// accepted.
///
/// The key is stored as an exact `(exponent, mantissa)` pair so hashing and
/// equality never see floating-point noise. For non-negative values the
/// derived ordering is the value ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    exponent: i32,
    mantissa: i64,
}

impl Key {
    pub const ZERO: Key = Key {
        exponent: i32::MIN,
        mantissa: 0,
    };

    /// Key of `value`, or `None` when the value is NaN or infinite
    pub fn of(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Self::ZERO);
        }

        let mut exponent = value.abs().log10().floor() as i32;
        let mut mantissa = scaled(value, exponent);

        // log10 may land one decade off near powers of ten
        if mantissa.abs() >= MANTISSA_CEIL {
            exponent += 1;
            mantissa = scaled(value, exponent);
        } else if mantissa.abs() < MANTISSA_FLOOR {
            exponent -= 1;
            mantissa = scaled(value, exponent);
        }

        Some(Self { exponent, mantissa })
    }

    /// The rounded value this key stands for
    pub fn value(self) -> f64 {
        if self == Self::ZERO {
            return 0.0;
        }
        scale(self.mantissa as f64, self.exponent - (SIGNIFICANT_DIGITS - 1))
    }
}

fn scaled(value: f64, exponent: i32) -> i64 {
    scale(value, SIGNIFICANT_DIGITS - 1 - exponent).round() as i64
}

/// `value * 10^shift`, dividing for negative shifts so exact decimals stay exact
fn scale(value: f64, shift: i32) -> f64 {
    let magnitude = shift.unsigned_abs() as i32;
    // split huge decades so the factor itself stays finite
    let factors = if magnitude > 300 {
        [magnitude / 2, magnitude - magnitude / 2]
    } else {
        [magnitude, 0]
    };
    factors.into_iter().fold(value, |acc, exp| {
        let factor = 10f64.powi(exp);
        if shift >= 0 {
            acc * factor
        } else {
            acc / factor
        }
    })
}
