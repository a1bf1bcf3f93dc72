// Kubernetes resource quantity strings ("250m", "128Mi", "1.5", "12345n", "1e3").

use thiserror::Error;

const NANOS_PER_UNIT: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const BYTES_PER_MEBIBYTE: i128 = 1 << 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),
    #[error("unknown suffix in quantity {0:?}")]
    UnknownSuffix(String),
    #[error("quantity {0:?} out of range")]
    Overflow(String),
}

/// Exact quantity in nano-units (1e-9 of the base unit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i128);

impl Quantity {
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '+' || c == '-'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);

        let (negative, digits) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if (whole.is_empty() && frac.is_empty())
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(QuantityError::InvalidNumber(s.to_string()));
        }
        let overflow = || QuantityError::Overflow(s.to_string());

        let mut mantissa: i128 = 0;
        for b in whole.bytes().chain(frac.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or_else(overflow)?;
        }
        let divisor = 10i128
            .checked_pow(u32::try_from(frac.len()).map_err(|_| overflow())?)
            .ok_or_else(overflow)?;

        let (mul, div) =
            multiplier(suffix).ok_or_else(|| QuantityError::UnknownSuffix(s.to_string()))?;
        let numerator = mantissa.checked_mul(mul).ok_or_else(overflow)?;
        let denominator = divisor.checked_mul(div).ok_or_else(overflow)?;
        let nanos = ceil_div(numerator, denominator);
        Ok(Self(if negative { -nanos } else { nanos }))
    }

    pub fn nanos(&self) -> i128 {
        self.0
    }

    /// Milli-units, rounded up (CPU cores -> milli-cores).
    pub fn to_milli(&self) -> i64 {
        saturate(ceil_div(self.0, NANOS_PER_MILLI))
    }

    /// Mebibytes, rounded up (bytes -> MiB).
    pub fn to_mebibytes(&self) -> i64 {
        saturate(ceil_div(self.0, NANOS_PER_UNIT * BYTES_PER_MEBIBYTE))
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Nano-units per unit of `suffix`, as a fraction (mul / div).
fn multiplier(suffix: &str) -> Option<(i128, i128)> {
    let binary = |shift: u32| Some((NANOS_PER_UNIT << shift, 1));
    let decimal = |exp: i32| {
        let exp = exp + 9;
        if exp >= 0 {
            10i128.checked_pow(exp as u32).map(|m| (m, 1))
        } else {
            10i128.checked_pow(exp.unsigned_abs()).map(|d| (1, d))
        }
    };
    match suffix {
        "Ki" => binary(10),
        "Mi" => binary(20),
        "Gi" => binary(30),
        "Ti" => binary(40),
        "Pi" => binary(50),
        "Ei" => binary(60),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "" => decimal(0),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        s if s.starts_with(['e', 'E']) && s.len() > 1 => {
            let exp: i32 = s[1..].parse().ok()?;
            if !(-30..=27).contains(&exp) {
                return None;
            }
            decimal(exp)
        }
        _ => None,
    }
}

fn ceil_div(n: i128, d: i128) -> i128 {
    let q = n / d;
    if n % d > 0 { q + 1 } else { q }
}

fn saturate(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}
