//! Product identifier types with proper encapsulation.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::error::DomainError;

/// Amazon Standard Identification Number.
///
/// Always ten ASCII alphanumeric characters, stored upper-case. The inner
/// String is private so every value goes through [`Asin::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asin(String);

impl Asin {
    /// Parse and normalise an ASIN.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidAsin {
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Get the ASIN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Product page on Amazon.co.jp.
    #[must_use]
    pub fn amazon_url(&self) -> String {
        format!("https://www.amazon.co.jp/dp/{}", self.0)
    }

    /// Product page on Keepa for the given Keepa domain id.
    #[must_use]
    pub fn keepa_url(&self, domain: u8) -> String {
        format!("https://keepa.com/#!product/{}-{}", domain, self.0)
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Asin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Japanese Article Number (EAN-8 / EAN-13 barcode).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jan(String);

impl Jan {
    /// Parse a JAN code.
    ///
    /// Spreadsheet exports often render the code as a float
    /// (`4988601012345.0` or `4.988601012345e12`); both forms are accepted.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let digits = if trimmed.chars().all(|c| c.is_ascii_digit()) {
            trimmed.to_string()
        } else {
            Self::from_float(trimmed).ok_or_else(|| DomainError::InvalidJan {
                value: raw.to_string(),
            })?
        };

        if digits.len() != 8 && digits.len() != 13 {
            return Err(DomainError::InvalidJan {
                value: raw.to_string(),
            });
        }
        Ok(Self(digits))
    }

    fn from_float(raw: &str) -> Option<String> {
        let value = Decimal::from_scientific(raw)
            .ok()
            .or_else(|| raw.parse::<Decimal>().ok())?;
        if value.is_sign_negative() || !value.fract().is_zero() {
            return None;
        }
        Some(value.trunc().normalize().to_string())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Jan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Jan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
