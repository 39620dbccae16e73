//! Boundary validation for the amplify prompt.
//!
//! The workspace only ever sees an [`AmplifyFactor`]; raw input is checked
//! here and every failure carries its own user-facing message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a factor was refused. Checked in this order, so `"-1.5"` reports
/// `NotAnInteger` rather than `NotPositive`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactorError {
    NotANumber,
    NotAnInteger,
    NotPositive,
    NotGreaterThanOne,
    TooLarge,
}

impl fmt::Display for FactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FactorError::NotANumber => "must be a number",
            FactorError::NotAnInteger => "must be a whole number",
            FactorError::NotPositive => "must be a positive number",
            FactorError::NotGreaterThanOne => "factor must be greater than 1",
            FactorError::TooLarge => "factor is too large",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for FactorError {}

/// A validated amplify factor: an integer strictly greater than 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct AmplifyFactor(u32);

impl AmplifyFactor {
    pub fn new(value: i64) -> Result<Self, FactorError> {
        if value <= 0 {
            return Err(FactorError::NotPositive);
        }
        if value == 1 {
            return Err(FactorError::NotGreaterThanOne);
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| FactorError::TooLarge)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for AmplifyFactor {
    type Error = FactorError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AmplifyFactor> for u32 {
    fn from(f: AmplifyFactor) -> Self {
        f.0
    }
}

impl fmt::Display for AmplifyFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parse free-text prompt input. Blank input counts as zero, the way a
/// number field coerces an empty value.
pub fn parse_factor(input: &str) -> Result<AmplifyFactor, FactorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FactorError::NotPositive);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return AmplifyFactor::new(n);
    }
    let value: f64 = trimmed.parse().map_err(|_| FactorError::NotANumber)?;
    if !value.is_finite() {
        return Err(FactorError::NotANumber);
    }
    if value.fract() != 0.0 {
        return Err(FactorError::NotAnInteger);
    }
    if value <= 0.0 {
        return Err(FactorError::NotPositive);
    }
    if value == 1.0 {
        return Err(FactorError::NotGreaterThanOne);
    }
    if value > f64::from(u32::MAX) {
        return Err(FactorError::TooLarge);
    }
    AmplifyFactor::new(value as i64)
}
