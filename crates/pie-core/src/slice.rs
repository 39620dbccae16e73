use serde::{Deserialize, Serialize};

use crate::ids::SliceId;

/// Smallest addressable piece of a circle. Active slices are the filled
/// ones, counted in the numerator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub id: SliceId,
    pub active: bool,
}

impl Slice {
    pub fn new(active: bool) -> Self {
        Self {
            id: SliceId::new(),
            active,
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}
