//! Fully-qualified device identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifies a device within the deployment's device hierarchy
/// (e.g. `"kitchen.ceiling_light"`).
///
/// The identifier is opaque: it is the join key between configuration,
/// the registry lookup and the entity bridge, and is never parsed further.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceFqid(String);

impl DeviceFqid {
    /// Build an identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceFqid`] if nothing remains after
    /// trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDeviceFqid);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceFqid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceFqid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DeviceFqid {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceFqid> for String {
    fn from(value: DeviceFqid) -> Self {
        value.0
    }
}

impl AsRef<str> for DeviceFqid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
