//! Pick/place merging of slices between fraction groups.
//!
//! A pick captures either one active slice or every active slice of a
//! group. Placing it on another group converts the picked units into the
//! target's denomination (only when that conversion is exact), switches
//! the source slices off and fills the target first-fit, growing new
//! circles when the existing ones are full.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circle::Circle;
use crate::error::{FractionError, Result};
use crate::group::CircleGroup;
use crate::ids::{CircleId, GroupId};
use crate::workspace::Workspace;

/// The item currently held. At most one exists at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PickedItem {
    Slice {
        source_group: GroupId,
        source_circle: CircleId,
        slice_index: usize,
        divisions: u32,
    },
    Group {
        source_group: GroupId,
        divisions: u32,
        slice_count: u32,
    },
}

impl PickedItem {
    pub fn source_group(&self) -> GroupId {
        match self {
            PickedItem::Slice { source_group, .. } | PickedItem::Group { source_group, .. } => {
                *source_group
            }
        }
    }

    pub fn divisions(&self) -> u32 {
        match self {
            PickedItem::Slice { divisions, .. } | PickedItem::Group { divisions, .. } => {
                *divisions
            }
        }
    }

    /// Slices carried, in the source's denomination.
    pub fn units(&self) -> u32 {
        match self {
            PickedItem::Slice { .. } => 1,
            PickedItem::Group { slice_count, .. } => *slice_count,
        }
    }
}

/// User-visible reasons a place was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum PlaceRejection {
    SelfTarget,
    DivisibilityViolation {
        source_divisions: u32,
        target_divisions: u32,
    },
}

impl fmt::Display for PlaceRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceRejection::SelfTarget => write!(f, "cannot place a group onto itself"),
            PlaceRejection::DivisibilityViolation { .. } => {
                write!(f, "target parts must be a multiple of source parts")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub conversion_factor: u32,
    pub slices_removed: u32,
    pub slices_added: u32,
    pub circles_created: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Merged(MergeStats),
    Rejected(PlaceRejection),
    /// Source or target could not be resolved; nothing changed.
    Unresolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(PickedItem),
    /// The held source was picked again: back to idle.
    Released,
    /// Something else was held, so the pick acted as a place.
    Placed(PlaceOutcome),
}

// ---------------------------------------------------------------------------
// Pure merge
// ---------------------------------------------------------------------------

/// Conversion factor from source to target denomination, or the
/// divisibility rejection.
pub fn conversion_factor(
    source_divisions: u32,
    target_divisions: u32,
) -> std::result::Result<u32, PlaceRejection> {
    if source_divisions == 0 || target_divisions % source_divisions != 0 {
        return Err(PlaceRejection::DivisibilityViolation {
            source_divisions,
            target_divisions,
        });
    }
    Ok(target_divisions / source_divisions)
}

/// Whether `item` still describes what is actually in `source`. A pick
/// that went stale (the source was resized or edited while held) must
/// not be placed.
fn still_valid(source: &CircleGroup, item: &PickedItem) -> bool {
    match *item {
        PickedItem::Slice {
            source_circle,
            slice_index,
            divisions,
            ..
        } => source.circle(source_circle).is_some_and(|c| {
            c.divisions == divisions && c.slices.get(slice_index).is_some_and(|s| s.active)
        }),
        PickedItem::Group {
            divisions,
            slice_count,
            ..
        } => source.divisions() == Some(divisions) && source.active_count() == slice_count,
    }
}

/// Fill `units` slices into `circles` first-fit, appending circles of
/// `divisions` when every existing one is full. Returns circles created.
fn distribute(circles: &mut Vec<Circle>, units: u32, divisions: u32) -> u32 {
    let mut created = 0;
    let mut cursor = 0;
    for _ in 0..units {
        // Placement only activates, so a circle found full stays full.
        while cursor < circles.len() && circles[cursor].is_full() {
            cursor += 1;
        }
        match circles.get_mut(cursor) {
            Some(circle) => {
                if let Some(i) = circle.first_inactive() {
                    circle.slices[i].active = true;
                }
            }
            None => {
                circles.push(Circle::new(divisions, 1));
                created += 1;
            }
        }
    }
    created
}

/// Merge `item` from `source` into `target`, returning updated clones of
/// exactly those two groups. Inputs are left untouched.
///
/// `Ok(None)` means the item no longer matches the source or the target
/// has no circles, which callers treat as a resolution failure.
pub fn merge_groups(
    source: &CircleGroup,
    target: &CircleGroup,
    item: &PickedItem,
) -> std::result::Result<Option<(CircleGroup, CircleGroup, MergeStats)>, PlaceRejection> {
    if source.id == target.id {
        return Err(PlaceRejection::SelfTarget);
    }
    let Some(target_divisions) = target.divisions() else {
        return Ok(None);
    };
    let factor = conversion_factor(item.divisions(), target_divisions)?;
    if !still_valid(source, item) {
        return Ok(None);
    }
    let Some(slices_to_add) = item.units().checked_mul(factor) else {
        return Ok(None);
    };

    let mut new_source = source.clone();
    match *item {
        PickedItem::Slice {
            source_circle,
            slice_index,
            ..
        } => {
            if let Some(circle) = new_source.circle_mut(source_circle) {
                circle.slices[slice_index].active = false;
            }
        }
        PickedItem::Group { .. } => {
            for circle in &mut new_source.circles {
                circle.deactivate_all();
            }
        }
    }

    let mut new_target = target.clone();
    let circles_created = distribute(&mut new_target.circles, slices_to_add, target_divisions);

    let stats = MergeStats {
        conversion_factor: factor,
        slices_removed: item.units(),
        slices_added: slices_to_add,
        circles_created,
    };
    Ok(Some((new_source, new_target, stats)))
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Idle when nothing is picked, holding otherwise.
#[derive(Clone, Debug, Default)]
pub struct MergeEngine {
    picked: Option<PickedItem>,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picked(&self) -> Option<&PickedItem> {
        self.picked.as_ref()
    }

    pub fn is_holding(&self) -> bool {
        self.picked.is_some()
    }

    /// Pick one active slice. While holding, picking the same slice
    /// releases it and picking anything else places onto its group.
    pub fn pick_slice(
        &mut self,
        ws: &mut Workspace,
        group: GroupId,
        circle: CircleId,
        index: usize,
    ) -> Result<PickOutcome> {
        if let Some(held) = self.picked {
            let same = matches!(held, PickedItem::Slice { source_group, source_circle, slice_index, .. }
                if source_group == group && source_circle == circle && slice_index == index);
            if same {
                self.picked = None;
                return Ok(PickOutcome::Released);
            }
            return Ok(PickOutcome::Placed(self.place(ws, group)));
        }

        let source = ws.group(group).ok_or(FractionError::GroupNotFound(group))?;
        let c = source
            .circle(circle)
            .ok_or(FractionError::CircleNotFound(circle))?;
        let slice = c
            .slices
            .get(index)
            .ok_or(FractionError::SliceOutOfRange { circle, index })?;
        if !slice.active {
            return Err(FractionError::InactiveSlice);
        }
        let item = PickedItem::Slice {
            source_group: group,
            source_circle: circle,
            slice_index: index,
            divisions: c.divisions,
        };
        self.picked = Some(item);
        Ok(PickOutcome::Picked(item))
    }

    /// Pick every active slice of a group as one unit.
    pub fn pick_group(&mut self, ws: &mut Workspace, group: GroupId) -> Result<PickOutcome> {
        if let Some(held) = self.picked {
            if matches!(held, PickedItem::Group { source_group, .. } if source_group == group) {
                self.picked = None;
                return Ok(PickOutcome::Released);
            }
            return Ok(PickOutcome::Placed(self.place(ws, group)));
        }

        let source = ws.group(group).ok_or(FractionError::GroupNotFound(group))?;
        let divisions = source
            .divisions()
            .ok_or(FractionError::EmptyGroup(group))?;
        let slice_count = source.active_count();
        if slice_count == 0 {
            return Err(FractionError::NothingToPick);
        }
        let item = PickedItem::Group {
            source_group: group,
            divisions,
            slice_count,
        };
        self.picked = Some(item);
        Ok(PickOutcome::Picked(item))
    }

    /// Place the held item onto `target`. Always ends idle; on anything but
    /// `Merged` the workspace is untouched.
    pub fn place(&mut self, ws: &mut Workspace, target: GroupId) -> PlaceOutcome {
        let Some(item) = self.picked.take() else {
            return PlaceOutcome::Unresolved;
        };
        let (Some(source), Some(target)) = (ws.group(item.source_group()), ws.group(target))
        else {
            return PlaceOutcome::Unresolved;
        };
        match merge_groups(source, target, &item) {
            Ok(Some((new_source, new_target, stats))) => {
                ws.commit_pair(new_source, new_target);
                PlaceOutcome::Merged(stats)
            }
            Ok(None) => PlaceOutcome::Unresolved,
            Err(rejection) => PlaceOutcome::Rejected(rejection),
        }
    }

    /// Drop the held item. Returns whether anything was held.
    pub fn cancel(&mut self) -> bool {
        self.picked.take().is_some()
    }

    /// Whether the held item could be placed on `target` right now; drives
    /// drop-target highlighting.
    pub fn drop_target_ok(&self, ws: &Workspace, target: GroupId) -> bool {
        let Some(item) = self.picked else {
            return false;
        };
        if item.source_group() == target {
            return false;
        }
        if !ws
            .group(item.source_group())
            .is_some_and(|source| still_valid(source, &item))
        {
            return false;
        }
        ws.group(target)
            .and_then(CircleGroup::divisions)
            .is_some_and(|d| conversion_factor(item.divisions(), d).is_ok())
    }
}
