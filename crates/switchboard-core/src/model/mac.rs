// ── MAC address newtype ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// MAC address held in canonical lowercase colon-hex (aa:bb:cc:dd:ee:ff).
///
/// Accepts colon, dash, or dot separated input as well as bare 12-digit
/// hex; anything else is rejected so a malformed address surfaces as a
/// request error instead of flowing to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let stripped: String = raw.chars().filter(|c| !":-.".contains(*c)).collect();
        if stripped.len() != 12 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::request_value("mac", raw));
        }
        let lower = stripped.to_lowercase();
        let canonical = lower
            .as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect::<Vec<_>>()
            .join(":");
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
