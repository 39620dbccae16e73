//! Block-grid teaching tools: grouping (division with remainder) and
//! rectangles (factor checking). Independent of the fraction workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BLOCK_PALETTE, MAX_TOTAL_BLOCKS, MIN_TOTAL_BLOCKS};
use crate::error::{FractionError, Result};

/// Number of blocks on the grid, always within `[1, 200]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BlockCount(u32);

impl BlockCount {
    pub fn new(n: u32) -> Result<Self> {
        if (MIN_TOTAL_BLOCKS..=MAX_TOTAL_BLOCKS).contains(&n) {
            Ok(Self(n))
        } else {
            Err(FractionError::InvalidBlocks(n))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    fn check_divisor(self, divisor: u32) -> Result<()> {
        if divisor == 0 || divisor > self.0 {
            return Err(FractionError::InvalidDivisor {
                total: self.0,
                divisor,
            });
        }
        Ok(())
    }
}

impl TryFrom<u32> for BlockCount {
    type Error = FractionError;

    fn try_from(n: u32) -> Result<Self> {
        Self::new(n)
    }
}

impl From<BlockCount> for u32 {
    fn from(b: BlockCount) -> Self {
        b.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockRole {
    Grouped(u32),
    Remainder,
}

/// `total ÷ group_size`, block by block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub total: u32,
    pub group_size: u32,
    pub quotient: u32,
    pub remainder: u32,
    pub blocks: Vec<BlockRole>,
}

impl Grouping {
    /// Palette color for a group, cycling when there are more groups than
    /// colors.
    pub fn color(group_index: u32) -> &'static str {
        BLOCK_PALETTE[group_index as usize % BLOCK_PALETTE.len()]
    }
}

pub fn group_blocks(total: BlockCount, group_size: u32) -> Result<Grouping> {
    total.check_divisor(group_size)?;
    let n = total.get();
    let quotient = n / group_size;
    let grouped = quotient * group_size;
    let blocks = (0..n)
        .map(|i| {
            if i < grouped {
                BlockRole::Grouped(i / group_size)
            } else {
                BlockRole::Remainder
            }
        })
        .collect();
    Ok(Grouping {
        total: n,
        group_size,
        quotient,
        remainder: n % group_size,
        blocks,
    })
}

/// All divisors of `total`, ascending.
pub fn factors(total: BlockCount) -> Vec<u32> {
    let n = total.get();
    (1..=n).filter(|i| n % i == 0).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum RectangleCheck {
    Fits { total: u32, columns: u32, rows: u32 },
    NotAFactor { total: u32, columns: u32, factors: Vec<u32> },
}

impl RectangleCheck {
    pub fn fits(&self) -> bool {
        matches!(self, RectangleCheck::Fits { .. })
    }

    pub fn description(&self) -> String {
        match self {
            RectangleCheck::Fits {
                total,
                columns,
                rows,
            } => format!("{columns} columns × {rows} rows = {total} total blocks."),
            RectangleCheck::NotAFactor { factors, .. } => {
                let list: Vec<String> = factors.iter().map(u32::to_string).collect();
                format!("Blocks are left over. Try: {}.", list.join(", "))
            }
        }
    }
}

impl fmt::Display for RectangleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RectangleCheck::Fits { total, columns, .. } => {
                write!(f, "Success! {columns} is a factor of {total}")
            }
            RectangleCheck::NotAFactor { total, columns, .. } => {
                write!(f, "{columns} is not a factor of {total}.")
            }
        }
    }
}

/// Lay `total` blocks out in `columns` columns and report whether they
/// form a complete rectangle.
pub fn try_rectangle(total: BlockCount, columns: u32) -> Result<RectangleCheck> {
    total.check_divisor(columns)?;
    let n = total.get();
    if n % columns == 0 {
        Ok(RectangleCheck::Fits {
            total: n,
            columns,
            rows: n / columns,
        })
    } else {
        Ok(RectangleCheck::NotAFactor {
            total: n,
            columns,
            factors: factors(total),
        })
    }
}
