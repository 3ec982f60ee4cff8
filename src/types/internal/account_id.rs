use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::internal::AccountError;

pub const ACCOUNT_ID_PREFIX: &str = "AASC";
pub const ACCOUNT_ID_DIGITS: usize = 7;
pub const MAX_ACCOUNT_NUMBER: i64 = 9_999_999;

/// Human-readable account key, `AASC` followed by a 7-digit number
///
/// The fixed width keeps string order equal to numeric order, which the
/// max-id seeding query relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(u32);

impl AccountId {
    /// Build an id from a sequence value
    ///
    /// # Returns
    /// * `Err(AccountError::IdentifierExhausted)` - value does not fit in 7 digits
    /// * `Err(AccountError::MalformedIdentifier)` - value is zero or negative
    pub fn from_number(number: i64) -> Result<Self, AccountError> {
        if number > MAX_ACCOUNT_NUMBER {
            return Err(AccountError::IdentifierExhausted { number });
        }
        if number < 1 {
            return Err(AccountError::MalformedIdentifier { value: number.to_string() });
        }
        // Bounds checked above
        Ok(Self(number as u32))
    }

    pub fn number(&self) -> i64 {
        i64::from(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", ACCOUNT_ID_PREFIX, self.0, width = ACCOUNT_ID_DIGITS)
    }
}

impl FromStr for AccountId {
    type Err = AccountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || AccountError::MalformedIdentifier { value: value.to_string() };

        let digits = value.strip_prefix(ACCOUNT_ID_PREFIX).ok_or_else(malformed)?;
        if digits.len() != ACCOUNT_ID_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let number: i64 = digits.parse().map_err(|_| malformed())?;
        Self::from_number(number).map_err(|_| malformed())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
