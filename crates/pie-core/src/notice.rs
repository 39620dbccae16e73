//! Transient user notifications. Every gesture on the board reports its
//! result as a list of notices instead of an error.

use serde::{Deserialize, Serialize};

use crate::group::Fraction;
use crate::merge::{MergeStats, PlaceRejection};
use crate::mode::Mode;
use crate::workspace::CleanupReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const DRAG_HINT: &str = "Drop it on another circle to add, or press Esc to cancel.";

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn slice_selected(active: u32, divisions: u32) -> Self {
        Self::new(NoticeLevel::Info, format!("Slice selected: {active}/{divisions}"))
    }

    pub fn picked_slice() -> Self {
        Self::new(NoticeLevel::Info, "Dragging slice").with_description(DRAG_HINT)
    }

    pub fn picked_group(count: u32) -> Self {
        Self::new(NoticeLevel::Info, format!("Dragging {count} slices")).with_description(DRAG_HINT)
    }

    pub fn nothing_to_pick() -> Self {
        Self::new(NoticeLevel::Warning, "Nothing to drag")
            .with_description("Select some slices first.")
    }

    pub fn merged(stats: &MergeStats) -> Self {
        let notice = Self::new(NoticeLevel::Success, "Fractions added!");
        if stats.circles_created > 0 {
            notice.with_description(format!(
                "{} new circle(s) were needed to hold the result.",
                stats.circles_created
            ))
        } else {
            notice
        }
    }

    pub fn rejected(rejection: &PlaceRejection) -> Self {
        Self::new(NoticeLevel::Warning, "Cannot move").with_description(format!(
            "To add fractions, {rejection}."
        ))
    }

    pub fn drag_cancelled() -> Self {
        Self::new(NoticeLevel::Warning, "Drag cancelled")
    }

    pub fn group_removed() -> Self {
        Self::new(NoticeLevel::Warning, "Circle removed")
    }

    pub fn group_duplicated() -> Self {
        Self::new(NoticeLevel::Success, "Circle duplicated")
    }

    pub fn amplified(before: Fraction, after: Fraction) -> Self {
        Self::new(NoticeLevel::Success, "Fraction amplified")
            .with_description(format!("{before} = {after}"))
    }

    pub fn cleaned(report: &CleanupReport) -> Self {
        Self::new(NoticeLevel::Info, "Cleaning up empty circles").with_description(format!(
            "Removed {} circle(s) with no selected slices.",
            report.removed_circles
        ))
    }

    pub fn mode_entered(mode: Mode) -> Self {
        Self::new(
            NoticeLevel::Info,
            format!("{} tool active ({})", mode.label(), mode.shortcut()),
        )
    }

    pub fn amplify_prompt() -> Self {
        Self::new(NoticeLevel::Info, "Amplify fraction").with_description(
            "Enter the number to multiply the numerator and the denominator by.",
        )
    }
}
