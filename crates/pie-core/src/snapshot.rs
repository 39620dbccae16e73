//! Serializable view of a board for the presentational layer.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::follower::FollowerView;
use crate::group::{CircleGroup, Fraction};
use crate::merge::PickedItem;
use crate::mode::Mode;
use crate::workspace::{Totals, Workspace};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    /// 1-based display position.
    pub position: usize,
    pub fraction: Option<Fraction>,
    /// Whether the held item could be dropped here.
    pub drop_target: bool,
    #[serde(flatten)]
    pub group: CircleGroup,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub mode: Mode,
    pub max_divisions: u32,
    pub picked: Option<PickedItem>,
    pub follower: Option<FollowerView>,
    pub amplifying: Option<usize>,
    pub totals: Totals,
    pub groups: Vec<GroupSnapshot>,
}

impl WorkspaceSnapshot {
    pub(crate) fn capture(
        ws: &Workspace,
        mode: Mode,
        picked: Option<&PickedItem>,
        amplifying: Option<usize>,
        drop_target: impl Fn(&CircleGroup) -> bool,
    ) -> Self {
        Self {
            mode,
            max_divisions: ws.max_divisions,
            picked: picked.copied(),
            follower: picked.map(FollowerView::for_item),
            amplifying,
            totals: ws.totals(),
            groups: ws
                .groups
                .iter()
                .enumerate()
                .map(|(i, g)| GroupSnapshot {
                    position: i + 1,
                    fraction: g.fraction(),
                    drop_target: drop_target(g),
                    group: g.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
