use crate::ids;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminates the two ways an import can break policy.
///
/// The numeric values are part of the public contract: hosts render them as
/// diagnostic codes, so they never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ViolationCode {
    /// No rule covers the file, or every covering rule has an empty allow-list.
    Unconfigured = 1,
    /// The file has an allow-list and the specifier matches none of it.
    Disallowed = 2,
}

impl ViolationCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Snake-case code used in reports and `explain`.
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCode::Unconfigured => ids::CODE_UNCONFIGURED,
            ViolationCode::Disallowed => ids::CODE_DISALLOWED,
        }
    }

    /// Inverse of [`ViolationCode::as_str`].
    pub fn from_code_str(code: &str) -> Option<Self> {
        match code {
            ids::CODE_UNCONFIGURED => Some(ViolationCode::Unconfigured),
            ids::CODE_DISALLOWED => Some(ViolationCode::Disallowed),
            _ => None,
        }
    }
}

impl From<ViolationCode> for u8 {
    fn from(value: ViolationCode) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for ViolationCode {
    type Error = UnknownViolationCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ViolationCode::Unconfigured),
            2 => Ok(ViolationCode::Disallowed),
            other => Err(UnknownViolationCode(other)),
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownViolationCode(pub u8);

impl fmt::Display for UnknownViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown violation code: {} (expected 1 or 2)", self.0)
    }
}

impl std::error::Error for UnknownViolationCode {}
