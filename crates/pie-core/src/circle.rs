use serde::{Deserialize, Serialize};

use crate::constants::MIN_DIVISIONS;
use crate::ids::CircleId;
use crate::slice::Slice;

/// One whole divided into `divisions` equal slices.
///
/// `slices.len() == divisions` holds for every circle built through this
/// type's constructors, and every operation in the crate rebuilds circles
/// through them rather than resizing `slices` in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub divisions: u32,
    pub slices: Vec<Slice>,
}

impl Circle {
    /// Build a circle of `divisions` slices with the first `active` filled.
    /// `divisions` is raised to 1 and `active` capped at `divisions`.
    pub fn new(divisions: u32, active: u32) -> Self {
        Self::with_id(CircleId::new(), divisions, active)
    }

    /// Same as [`Circle::new`] but keeps an existing circle id.
    pub fn with_id(id: CircleId, divisions: u32, active: u32) -> Self {
        let divisions = divisions.max(MIN_DIVISIONS);
        let slices = (0..divisions).map(|i| Slice::new(i < active)).collect();
        Self {
            id,
            divisions,
            slices,
        }
    }

    pub fn active_count(&self) -> u32 {
        self.slices.iter().filter(|s| s.active).count() as u32
    }

    /// Index of the lowest inactive slice, if any.
    pub fn first_inactive(&self) -> Option<usize> {
        self.slices.iter().position(|s| !s.active)
    }

    /// No active slice left: the cleanup sweep drops these.
    pub fn is_empty(&self) -> bool {
        !self.slices.iter().any(|s| s.active)
    }

    pub fn is_full(&self) -> bool {
        self.slices.iter().all(|s| s.active)
    }

    pub fn deactivate_all(&mut self) {
        for slice in &mut self.slices {
            slice.active = false;
        }
    }

    /// Deep copy with freshly minted circle and slice ids.
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: CircleId::new(),
            divisions: self.divisions,
            slices: self.slices.iter().map(|s| Slice::new(s.active)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_from_front() {
        let c = Circle::new(4, 2);
        assert_eq!(c.slices.len(), 4);
        let flags: Vec<bool> = c.slices.iter().map(|s| s.active).collect();
        assert_eq!(flags, vec![true, true, false, false]);
        assert_eq!(c.active_count(), 2);
        assert_eq!(c.first_inactive(), Some(2));
    }

    #[test]
    fn test_new_clamps_inputs() {
        let c = Circle::new(0, 5);
        assert_eq!(c.divisions, 1);
        assert_eq!(c.slices.len(), 1);
        assert!(c.is_full());

        let c = Circle::new(3, 10);
        assert_eq!(c.active_count(), 3);
    }

    #[test]
    fn test_empty_and_full() {
        let mut c = Circle::new(3, 3);
        assert!(c.is_full());
        assert!(!c.is_empty());
        assert_eq!(c.first_inactive(), None);
        c.deactivate_all();
        assert!(c.is_empty());
        assert_eq!(c.first_inactive(), Some(0));
    }

    #[test]
    fn test_fresh_copy_mints_new_ids() {
        let c = Circle::new(5, 3);
        let copy = c.fresh_copy();
        assert_ne!(c.id, copy.id);
        assert_eq!(c.divisions, copy.divisions);
        for (a, b) in c.slices.iter().zip(&copy.slices) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.active, b.active);
        }
    }
}
