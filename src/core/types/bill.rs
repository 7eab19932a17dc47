//! Bill identifiers

use crate::utils::error::GatewayError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A bill within a parliamentary session, e.g. `44-1-C-11`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillId {
    pub parliament: u32,
    pub session: u32,
    pub bill_number: String,
}

impl BillId {
    pub fn new(parliament: u32, session: u32, bill_number: impl Into<String>) -> Self {
        Self {
            parliament,
            session,
            bill_number: bill_number.into(),
        }
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.parliament, self.session, self.bill_number)
    }
}

impl FromStr for BillId {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(parliament), Some(session), Some(bill_number)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(GatewayError::parsing(format!("Invalid bill id: {}", s)));
        };

        let parliament = parliament
            .parse()
            .map_err(|_| GatewayError::parsing(format!("Invalid parliament in bill id: {}", s)))?;
        let session = session
            .parse()
            .map_err(|_| GatewayError::parsing(format!("Invalid session in bill id: {}", s)))?;
        if bill_number.is_empty() {
            return Err(GatewayError::parsing(format!("Missing bill number: {}", s)));
        }

        Ok(Self::new(parliament, session, bill_number))
    }
}

impl Serialize for BillId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BillId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
