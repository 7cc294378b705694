use std::{
    fmt,
    iter::Sum,
    ops::Sub,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::FormatError;

/// Currency symbol used when rendering amounts.
pub const CURRENCY_SYMBOL: &str = "$";
/// Currency code used in plain renderings (`40.00 USD`).
pub const CURRENCY_CODE: &str = "USD";

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (record amounts,
/// goal, totals) to avoid floating-point drift. On disk the amount is a JSON
/// number in major units (`12.5`), which keeps the document readable and
/// compatible with files written by hand.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(1_234_50);
/// assert_eq!(amount.cents(), 123450);
/// assert_eq!(amount.to_string(), "$1,234.50");
/// assert_eq!(amount.plain(), "1234.50");
/// ```
///
/// Parsing from user input (extra decimals are rounded half-up to the cent):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("12.345".parse::<MoneyCents>().unwrap().cents(), 1235);
/// assert!("10,5".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Saturating addition, used for totals over unbounded collections.
    #[must_use]
    pub const fn saturating_add(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0.saturating_add(rhs.0))
    }

    /// Renders the amount without symbol or grouping: `-1234.50`.
    #[must_use]
    pub fn plain(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    fn from_major(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        (cents.is_finite() && cents.abs() < i64::MAX as f64).then_some(Self(cents as i64))
    }
}

/// Inserts a `,` every three digits, counting from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = group_thousands(abs / 100);
        let cents = abs % 100;
        write!(f, "{sign}{CURRENCY_SYMBOL}{units}.{cents:02}")
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, MoneyCents::saturating_add)
    }
}

impl FromStr for MoneyCents {
    type Err = FormatError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - digits beyond the second decimal round half-up (away from zero)
    /// - rejects empty/invalid strings, exponents and thousands separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidAmount;

        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let (units_str, frac) = rest.split_once('.').unwrap_or((rest, ""));

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (units_str.is_empty() && frac.is_empty()) || !digits_only(units_str) || !digits_only(frac)
        {
            return Err(invalid());
        }

        let units: i64 = match units_str {
            "" => 0,
            units_str => units_str.parse().map_err(|_| invalid())?,
        };

        let mut digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = i64::from(digits.next().is_some_and(|d| d >= 5));

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths + round_up))
            .ok_or_else(invalid)?;

        Ok(MoneyCents(if negative { -total } else { total }))
    }
}

impl Serialize for MoneyCents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for MoneyCents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MajorUnits;

        impl de::Visitor<'_> for MajorUnits {
            type Value = MoneyCents;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an amount in major units, as number or decimal string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MoneyCents, E> {
                MoneyCents::from_major(v).ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MoneyCents, E> {
                v.checked_mul(100)
                    .map(MoneyCents)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MoneyCents, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(MoneyCents)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MoneyCents, E> {
                v.parse::<MoneyCents>().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MajorUnits)
    }
}
