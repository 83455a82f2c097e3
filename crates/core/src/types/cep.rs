//! Brazilian postal code (CEP) type.

use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Cep`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CepError {
    /// The input string is empty.
    #[error("CEP cannot be empty")]
    Empty,
    /// The input contains a character that is neither a digit nor a separator.
    #[error("CEP contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The input does not have exactly eight digits.
    #[error("CEP must have exactly {expected} digits (got {got})")]
    InvalidLength {
        /// Required digit count.
        expected: usize,
        /// Digit count found in the input.
        got: usize,
    },
}

/// A Brazilian postal code (CEP).
///
/// Stored canonically as eight digits. Parsing accepts the common written
/// forms (`01310-100`, `01310100`, with stray spaces or dots), and `Display`
/// always renders the dashed form.
///
/// ## Examples
///
/// ```
/// use meada_core::Cep;
///
/// let cep = Cep::parse("01310-100").unwrap();
/// assert_eq!(cep.as_str(), "01310100");
/// assert_eq!(cep.to_string(), "01310-100");
///
/// assert!(Cep::parse("1310-100").is_err()); // seven digits
/// assert!(Cep::parse("abcde-fgh").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Number of digits in a CEP.
    pub const DIGITS: usize = 8;

    /// Parse a `Cep` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, contains characters
    /// other than digits and the `-`, `.` or space separators, or does not
    /// hold exactly eight digits.
    pub fn parse(s: &str) -> Result<Self, CepError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(CepError::Empty);
        }

        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !matches!(c, '-' | '.' | ' ') {
                return Err(CepError::InvalidCharacter(c));
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(CepError::InvalidLength {
                expected: Self::DIGITS,
                got: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the bare eight digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the dashed written form (`01310-100`).
    #[must_use]
    pub fn formatted(&self) -> String {
        let (prefix, suffix) = self.0.split_at(5);
        format!("{prefix}-{suffix}")
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cep {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialized as the dashed form so stored and transmitted values match what
// people write; deserialization goes through `parse` and stays tolerant.
impl Serialize for Cep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

impl<'de> Deserialize<'de> for Cep {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!(Cep::parse("01310-100").unwrap().as_str(), "01310100");
        assert_eq!(Cep::parse("01310100").unwrap().as_str(), "01310100");
        assert_eq!(Cep::parse(" 01310-100 ").unwrap().as_str(), "01310100");
        assert_eq!(Cep::parse("01.310-100").unwrap().as_str(), "01310100");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Cep::parse(""), Err(CepError::Empty));
        assert_eq!(Cep::parse("  "), Err(CepError::Empty));
    }

    #[test]
    fn test_parse_wrong_digit_count() {
        assert_eq!(
            Cep::parse("1310-100"),
            Err(CepError::InvalidLength {
                expected: 8,
                got: 7
            })
        );
        assert_eq!(
            Cep::parse("013101000"),
            Err(CepError::InvalidLength {
                expected: 8,
                got: 9
            })
        );
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            Cep::parse("0131x-100"),
            Err(CepError::InvalidCharacter('x'))
        );
    }

    #[test]
    fn test_display_is_dashed() {
        let cep = Cep::parse("01310100").unwrap();
        assert_eq!(format!("{cep}"), "01310-100");
        assert_eq!(cep.formatted(), "01310-100");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cep = Cep::parse("01310100").unwrap();
        let json = serde_json::to_string(&cep).unwrap();
        assert_eq!(json, "\"01310-100\"");

        let parsed: Cep = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cep);
    }

    #[test]
    fn test_deserialize_bare_digits() {
        let parsed: Cep = serde_json::from_str("\"01310100\"").unwrap();
        assert_eq!(parsed.as_str(), "01310100");
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<Cep>("\"123\"").is_err());
    }
}
