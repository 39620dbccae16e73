use std::fmt;

use crate::constants::MAX_GROUP_SLICES;
use crate::factor::FactorError;
use crate::ids::{CircleId, GroupId};

#[derive(Debug)]
pub enum FractionError {
    GroupNotFound(GroupId),
    CircleNotFound(CircleId),
    SliceOutOfRange { circle: CircleId, index: usize },
    EmptyGroup(GroupId),
    InactiveSlice,
    NothingToPick,
    Overflow,
    InvalidFactor(FactorError),
    InvalidBlocks(u32),
    InvalidDivisor { total: u32, divisor: u32 },
    Snapshot(serde_json::Error),
}

impl fmt::Display for FractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FractionError::GroupNotFound(id) => write!(f, "group not found: {id}"),
            FractionError::CircleNotFound(id) => write!(f, "circle not found: {id}"),
            FractionError::SliceOutOfRange { circle, index } => {
                write!(f, "slice {index} out of range for circle {circle}")
            }
            FractionError::EmptyGroup(id) => write!(f, "group {id} has no circles"),
            FractionError::InactiveSlice => write!(f, "only active slices can be picked"),
            FractionError::NothingToPick => write!(f, "group has no active slices to pick"),
            FractionError::Overflow => {
                write!(f, "group would exceed {MAX_GROUP_SLICES} slices")
            }
            FractionError::InvalidFactor(e) => write!(f, "invalid factor: {e}"),
            FractionError::InvalidBlocks(n) => write!(f, "block count out of range: {n}"),
            FractionError::InvalidDivisor { total, divisor } => {
                write!(f, "divisor {divisor} must be between 1 and {total}")
            }
            FractionError::Snapshot(e) => write!(f, "snapshot error: {e}"),
        }
    }
}

impl std::error::Error for FractionError {}

impl From<FactorError> for FractionError {
    fn from(e: FactorError) -> Self {
        FractionError::InvalidFactor(e)
    }
}

impl From<serde_json::Error> for FractionError {
    fn from(e: serde_json::Error) -> Self {
        FractionError::Snapshot(e)
    }
}

pub type Result<T> = std::result::Result<T, FractionError>;
