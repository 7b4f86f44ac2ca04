use crate::error::{Error, Result};

use num_bigint::{BigInt, Sign};
use std::{cmp, fmt, str};

const NUMBER_FORMAT: &str = "[+-]digits[.digits][(e|E)[+-]digits]";
const MAX_EXPONENT: i64 = 1000;

/// Exact decimal number.
///
/// Stored as an arbitrary-precision mantissa and a decimal scale, normalized
/// so that the fractional part never carries trailing zeros. Two numbers that
/// denote the same value are therefore structurally equal, and the wire text
/// is stable.
///
/// ```rust
/// use dynamodb_model::value::Number;
///
/// let number: Number = "12345678909876543211234234324234".parse().unwrap();
/// assert!(number.is_integer());
/// assert_eq!(number.to_string(), "12345678909876543211234234324234");
///
/// let number: Number = "1.2500".parse().unwrap();
/// assert_eq!(number.to_string(), "1.25");
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Number {
    mantissa: BigInt,
    scale: u32,
}

impl Number {
    fn new(mut mantissa: BigInt, mut scale: u32) -> Self {
        let zero = BigInt::default();
        if mantissa == zero {
            scale = 0;
        }
        while scale > 0 && &mantissa % 10u32 == zero {
            mantissa /= 10u32;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Whether the number has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    /// The integer value, if the number is integral.
    pub fn as_big_int(&self) -> Option<&BigInt> {
        self.is_integer().then_some(&self.mantissa)
    }

    /// The value as `i64`, if integral and in range.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_big_int()
            .and_then(|integer| i64::try_from(integer).ok())
    }

    /// The nearest `f64`; precision may be lost.
    pub fn to_f64(&self) -> Option<f64> {
        self.to_string().parse().ok()
    }

    fn scaled(&self, scale: u32) -> BigInt {
        &self.mantissa * BigInt::from(10u32).pow(scale - self.scale)
    }
}

impl str::FromStr for Number {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::format(text, NUMBER_FORMAT);
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (significand, exponent) = match unsigned.find(['e', 'E']) {
            Some(position) => {
                let exponent = &unsigned[position + 1..];
                let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
                if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
                    return Err(invalid());
                }
                let exponent: i64 = exponent.parse().map_err(|_| invalid())?;
                (&unsigned[..position], exponent)
            }
            None => (unsigned, 0),
        };
        if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(invalid());
        }
        let (integral, fractional) = significand.split_once('.').unwrap_or((significand, ""));
        let digits = format!("{integral}{fractional}");
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let mantissa = if negative { -magnitude } else { magnitude };
        let scale = fractional.len() as i64 - exponent;
        let number = if scale < 0 {
            Self::new(mantissa * BigInt::from(10u32).pow(-scale as u32), 0)
        } else {
            Self::new(mantissa, scale as u32)
        };
        Ok(number)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        if self.mantissa.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        let digits = self.mantissa.magnitude().to_string();
        let scale = self.scale as usize;
        if digits.len() <= scale {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        } else {
            let (integral, fractional) = digits.split_at(digits.len() - scale);
            write!(f, "{integral}.{fractional}")
        }
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let scale = self.scale.max(other.scale);
        self.scaled(scale).cmp(&other.scaled(scale))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

macro_rules! number_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Number {
                fn from(value: $integer) -> Self {
                    Self::new(BigInt::from(value), 0)
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize);

impl TryFrom<f64> for Number {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::type_mismatch("finite number", value.to_string()));
        }
        // `Display` for f64 never uses exponent notation
        value.to_string().parse()
    }
}
