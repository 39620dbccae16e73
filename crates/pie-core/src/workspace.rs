//! The owned collection of fraction groups and its lifecycle operations.
//!
//! Each operation comes in two forms: a pure function over values
//! (`divide_group`, `amplify_group`, ...) and a [`Workspace`] method that
//! resolves ids, calls the pure form, commits the result in one assignment
//! and then runs the cleanup sweep. What the sweep removed is accumulated
//! until the caller drains it with [`Workspace::take_swept`].

use serde::{Deserialize, Serialize};

use crate::circle::Circle;
use crate::constants::{DEFAULT_MAX_DIVISIONS, MAX_GROUP_SLICES, MIN_DIVISIONS};
use crate::error::{FractionError, Result};
use crate::factor::AmplifyFactor;
use crate::group::CircleGroup;
use crate::ids::{CircleId, GroupId};

/// What one cleanup pass removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub removed_circles: usize,
    pub removed_groups: usize,
}

impl CleanupReport {
    pub fn removed_count(&self) -> usize {
        self.removed_circles + self.removed_groups
    }

    pub fn is_noop(&self) -> bool {
        self.removed_count() == 0
    }

    fn absorb(&mut self, other: CleanupReport) {
        self.removed_circles += other.removed_circles;
        self.removed_groups += other.removed_groups;
    }
}

/// Result of toggling one slice in Select mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceToggle {
    pub active: bool,
    pub active_count: u32,
    pub divisions: u32,
}

/// Collection-wide counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub groups: usize,
    pub circles: usize,
    pub active_slices: u64,
}

// ---------------------------------------------------------------------------
// Pure operations
// ---------------------------------------------------------------------------

/// Change a group's division count by `delta`, clamped to
/// `[1, max_divisions]`. Returns `None` when the clamped count is unchanged.
///
/// The group collapses to its first circle (keeping that circle's id).
/// Extra circles left by mitosis are discarded, and with them any active
/// slices the single resized circle cannot hold.
pub fn divide_group(group: &CircleGroup, delta: i64, max_divisions: u32) -> Option<CircleGroup> {
    let first = group.circles.first()?;
    let current = first.divisions;
    let upper = i64::from(max_divisions.max(MIN_DIVISIONS));
    let target = i64::from(current)
        .saturating_add(delta)
        .clamp(i64::from(MIN_DIVISIONS), upper) as u32;
    if target == current {
        return None;
    }
    let active = group.active_count().min(target);
    Some(CircleGroup {
        id: group.id,
        circles: vec![Circle::with_id(first.id, target, active)],
    })
}

/// Deep copy with fresh ids throughout.
pub fn duplicate_group(group: &CircleGroup) -> CircleGroup {
    group.fresh_copy()
}

/// Scale a group by `factor`: divisions and active count both multiply.
///
/// Circles are rebuilt from scratch, each filled from the front, until the
/// scaled active count is placed. At least one circle is always produced.
/// Fails with `Overflow` when the result would exceed `MAX_GROUP_SLICES`.
pub fn amplify_group(group: &CircleGroup, factor: AmplifyFactor) -> Result<CircleGroup> {
    let divisions = group.divisions().ok_or(FractionError::EmptyGroup(group.id))?;
    let new_divisions = divisions
        .checked_mul(factor.get())
        .ok_or(FractionError::Overflow)?;
    let mut remaining = group
        .active_count()
        .checked_mul(factor.get())
        .ok_or(FractionError::Overflow)?;
    if new_divisions > MAX_GROUP_SLICES || remaining > MAX_GROUP_SLICES {
        return Err(FractionError::Overflow);
    }

    let mut circles = Vec::new();
    loop {
        let take = remaining.min(new_divisions);
        circles.push(Circle::new(new_divisions, take));
        remaining -= take;
        if remaining == 0 {
            break;
        }
    }

    Ok(CircleGroup {
        id: group.id,
        circles,
    })
}

/// Drop circles without an active slice, then groups without circles.
pub fn sweep_groups(groups: &[CircleGroup]) -> (Vec<CircleGroup>, CleanupReport) {
    let mut report = CleanupReport::default();
    let mut kept = Vec::with_capacity(groups.len());
    for group in groups {
        let circles: Vec<Circle> = group
            .circles
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect();
        report.removed_circles += group.circles.len() - circles.len();
        if circles.is_empty() {
            report.removed_groups += 1;
            continue;
        }
        kept.push(CircleGroup {
            id: group.id,
            circles,
        });
    }
    (kept, report)
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// The single owned collection of groups, in display order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workspace {
    pub groups: Vec<CircleGroup>,
    pub max_divisions: u32,
    #[serde(skip)]
    swept: CleanupReport,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIVISIONS)
    }
}

impl Workspace {
    pub fn new(max_divisions: u32) -> Self {
        Self {
            groups: Vec::new(),
            max_divisions: max_divisions.max(MIN_DIVISIONS),
            swept: CleanupReport::default(),
        }
    }

    /// Start from existing groups. Runs one sweep so the collection begins
    /// in a clean state.
    pub fn from_groups(groups: Vec<CircleGroup>, max_divisions: u32) -> Self {
        let mut ws = Self::new(max_divisions);
        ws.groups = groups;
        ws.cleanup();
        ws
    }

    pub fn group(&self, id: GroupId) -> Option<&CircleGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_index(&self, id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    fn require_index(&self, id: GroupId) -> Result<usize> {
        self.group_index(id).ok_or(FractionError::GroupNotFound(id))
    }

    pub fn totals(&self) -> Totals {
        Totals {
            groups: self.groups.len(),
            circles: self.groups.iter().map(|g| g.circles.len()).sum(),
            active_slices: self
                .groups
                .iter()
                .map(|g| u64::from(g.active_count()))
                .sum(),
        }
    }

    /// Drain what the automatic sweeps removed since the last call.
    pub fn take_swept(&mut self) -> CleanupReport {
        std::mem::take(&mut self.swept)
    }

    /// Append a new one-slice, filled circle group.
    pub fn add_group(&mut self) -> GroupId {
        let group = CircleGroup::single();
        let id = group.id;
        self.groups.push(group);
        id
    }

    /// Flip one slice. Turning off the last active slice of a circle lets
    /// the sweep remove that circle.
    pub fn toggle_slice(
        &mut self,
        group: GroupId,
        circle: CircleId,
        index: usize,
    ) -> Result<SliceToggle> {
        let gi = self.require_index(group)?;
        let target = self.groups[gi]
            .circle_mut(circle)
            .ok_or(FractionError::CircleNotFound(circle))?;
        let slice = target
            .slices
            .get_mut(index)
            .ok_or(FractionError::SliceOutOfRange { circle, index })?;
        let active = slice.toggle();
        let toggle = SliceToggle {
            active,
            active_count: target.active_count(),
            divisions: target.divisions,
        };
        self.sweep();
        Ok(toggle)
    }

    pub fn remove_group(&mut self, group: GroupId) -> Result<CircleGroup> {
        let gi = self.require_index(group)?;
        Ok(self.groups.remove(gi))
    }

    /// Returns the group's division count after the change (unchanged when
    /// the clamp made it a no-op).
    pub fn divide(&mut self, group: GroupId, delta: i64) -> Result<u32> {
        let gi = self.require_index(group)?;
        let Some(resized) = divide_group(&self.groups[gi], delta, self.max_divisions) else {
            return self.groups[gi]
                .divisions()
                .ok_or(FractionError::EmptyGroup(group));
        };
        let divisions = resized.divisions().unwrap_or(MIN_DIVISIONS);
        self.groups[gi] = resized;
        self.sweep();
        Ok(divisions)
    }

    /// Insert a copy right after the source group; returns the copy's id.
    pub fn duplicate(&mut self, group: GroupId) -> Result<GroupId> {
        let gi = self.require_index(group)?;
        let copy = duplicate_group(&self.groups[gi]);
        let id = copy.id;
        self.groups.insert(gi + 1, copy);
        Ok(id)
    }

    /// Replace the group's circles with the amplified set and return a
    /// snapshot of the group as committed.
    pub fn amplify(&mut self, group: GroupId, factor: AmplifyFactor) -> Result<CircleGroup> {
        let gi = self.require_index(group)?;
        let amplified = amplify_group(&self.groups[gi], factor)?;
        self.groups[gi] = amplified.clone();
        self.sweep();
        Ok(amplified)
    }

    /// Commit two updated groups in one step. Groups whose ids are no
    /// longer present are ignored.
    pub(crate) fn commit_pair(&mut self, first: CircleGroup, second: CircleGroup) {
        for updated in [first, second] {
            if let Some(gi) = self.group_index(updated.id) {
                self.groups[gi] = updated;
            }
        }
        self.sweep();
    }

    /// Run the sweep explicitly. Idempotent: a second call with no
    /// mutation in between removes nothing.
    pub fn cleanup(&mut self) -> CleanupReport {
        let (kept, report) = sweep_groups(&self.groups);
        if !report.is_noop() {
            self.groups = kept;
        }
        report
    }

    fn sweep(&mut self) {
        let report = self.cleanup();
        self.swept.absorb(report);
    }
}
