use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circle::Circle;
use crate::ids::{CircleId, GroupId};

/// A fraction read off a group: total active slices over the shared
/// division count. Improper once mitosis has spread it across circles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    /// Value comparison without reducing: a/b == c/d iff a*d == c*b.
    pub fn equivalent(&self, other: &Fraction) -> bool {
        u64::from(self.numerator) * u64::from(other.denominator)
            == u64::from(other.numerator) * u64::from(self.denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// One fraction on the workspace, possibly spanning several circles of
/// the same division count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleGroup {
    pub id: GroupId,
    pub circles: Vec<Circle>,
}

impl CircleGroup {
    pub fn new(circles: Vec<Circle>) -> Self {
        Self {
            id: GroupId::new(),
            circles,
        }
    }

    /// The shape of a freshly added circle: one undivided, filled whole.
    pub fn single() -> Self {
        Self::new(vec![Circle::new(1, 1)])
    }

    /// Shared division count, read from the first circle.
    pub fn divisions(&self) -> Option<u32> {
        self.circles.first().map(|c| c.divisions)
    }

    /// Active slices across every circle of the group.
    pub fn active_count(&self) -> u32 {
        self.circles.iter().map(Circle::active_count).sum()
    }

    pub fn fraction(&self) -> Option<Fraction> {
        self.divisions().map(|denominator| Fraction {
            numerator: self.active_count(),
            denominator,
        })
    }

    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    pub fn circle_mut(&mut self, id: CircleId) -> Option<&mut Circle> {
        self.circles.iter_mut().find(|c| c.id == id)
    }

    /// True when every circle carries the same division count.
    pub fn is_homogeneous(&self) -> bool {
        match self.divisions() {
            Some(d) => self.circles.iter().all(|c| c.divisions == d),
            None => true,
        }
    }

    /// Deep copy with new ids for the group, every circle and every slice.
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: GroupId::new(),
            circles: self.circles.iter().map(Circle::fresh_copy).collect(),
        }
    }
}
