use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque token identifying one specific delivery of a queue message.
///
/// Required to delete the message; a new lease of the same message yields a new receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaseReceipt(String);

impl LeaseReceipt {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaseReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeaseReceipt {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
