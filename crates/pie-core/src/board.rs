//! The interaction surface: the current mode plus the command handler that
//! turns clicks and keys into workspace operations.
//!
//! Every gesture returns the notices it produced. Failures that come from
//! the UI and model briefly disagreeing (a stale id, a vanished circle)
//! produce nothing at all.

use crate::error::FractionError;
use crate::factor::{AmplifyFactor, FactorError, parse_factor};
use crate::follower::FollowerView;
use crate::ids::{CircleId, GroupId};
use crate::merge::{MergeEngine, PickOutcome, PickedItem, PlaceOutcome, PlaceRejection};
use crate::mode::Mode;
use crate::notice::{Notice, NoticeLevel};
use crate::snapshot::WorkspaceSnapshot;
use crate::workspace::Workspace;

/// Keyboard input the board understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

#[derive(Clone, Debug, Default)]
pub struct Board {
    workspace: Workspace,
    merge: MergeEngine,
    mode: Mode,
    amplifying: Option<GroupId>,
}

impl Board {
    pub fn new(max_divisions: u32) -> Self {
        Self::from_workspace(Workspace::new(max_divisions))
    }

    pub fn from_workspace(workspace: Workspace) -> Self {
        Self {
            workspace,
            merge: MergeEngine::new(),
            mode: Mode::Select,
            amplifying: None,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn picked(&self) -> Option<&PickedItem> {
        self.merge.picked()
    }

    /// Group whose amplify prompt is open.
    pub fn amplifying(&self) -> Option<GroupId> {
        self.amplifying
    }

    pub fn follower(&self) -> Option<FollowerView> {
        self.merge.picked().map(FollowerView::for_item)
    }

    pub fn drop_target_ok(&self, group: GroupId) -> bool {
        self.merge.drop_target_ok(&self.workspace, group)
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let amplifying = self
            .amplifying
            .and_then(|id| self.workspace.group_index(id))
            .map(|i| i + 1);
        WorkspaceSnapshot::capture(
            &self.workspace,
            self.mode,
            self.merge.picked(),
            amplifying,
            |g| self.drop_target_ok(g.id),
        )
    }

    // --- Modes and keys ---

    /// Request a mode. Requesting the active non-Select mode turns it off.
    pub fn set_mode(&mut self, requested: Mode) -> Vec<Notice> {
        let next = self.mode.toggled(requested);
        if next == self.mode {
            return Vec::new();
        }
        // A held item or an open prompt belongs to the mode being left.
        self.merge.cancel();
        self.amplifying = None;
        self.mode = next;
        if next == Mode::Select {
            Vec::new()
        } else {
            vec![Notice::mode_entered(next)]
        }
    }

    pub fn press_key(&mut self, key: Key) -> Vec<Notice> {
        match key {
            Key::Escape => {
                if self.amplifying.take().is_some() {
                    return Vec::new();
                }
                self.click_background()
            }
            Key::Char(c) if c.eq_ignore_ascii_case(&'n') => {
                self.add_circle();
                Vec::new()
            }
            Key::Char(c) => match Mode::from_shortcut(c) {
                Some(mode) => self.set_mode(mode),
                None => Vec::new(),
            },
        }
    }

    // --- Direct actions ---

    pub fn add_circle(&mut self) -> GroupId {
        self.workspace.add_group()
    }

    /// Resize a group. Returns the group's division count afterwards, or
    /// `None` when the group is gone.
    pub fn divide(&mut self, group: GroupId, delta: i64) -> (Option<u32>, Vec<Notice>) {
        let divisions = self.workspace.divide(group, delta).ok();
        (divisions, self.finish(Vec::new()))
    }

    pub fn duplicate(&mut self, group: GroupId) -> Vec<Notice> {
        let notices = match self.workspace.duplicate(group) {
            Ok(_) => vec![Notice::group_duplicated()],
            Err(_) => Vec::new(),
        };
        self.finish(notices)
    }

    /// Amplify without going through the prompt.
    pub fn amplify(&mut self, group: GroupId, factor: AmplifyFactor) -> Vec<Notice> {
        let before = self.workspace.group(group).and_then(|g| g.fraction());
        let notices = match self.workspace.amplify(group, factor) {
            Ok(after) => match (before, after.fraction()) {
                (Some(b), Some(a)) => vec![Notice::amplified(b, a)],
                _ => Vec::new(),
            },
            Err(e @ FractionError::Overflow) => {
                vec![Notice::new(NoticeLevel::Warning, "Cannot amplify").with_description(e.to_string())]
            }
            Err(_) => Vec::new(),
        };
        self.finish(notices)
    }

    /// Submit the amplify prompt. Invalid input leaves the prompt open and
    /// returns the field-level message.
    pub fn confirm_amplify(&mut self, input: &str) -> Result<Vec<Notice>, FactorError> {
        let factor = parse_factor(input)?;
        match self.amplifying.take() {
            Some(group) => Ok(self.amplify(group, factor)),
            None => Ok(Vec::new()),
        }
    }

    pub fn dismiss_amplify(&mut self) {
        self.amplifying = None;
    }

    // --- Pointer gestures ---

    pub fn click_slice(&mut self, group: GroupId, circle: CircleId, index: usize) -> Vec<Notice> {
        match self.mode {
            Mode::Select => {
                let notices = match self.workspace.toggle_slice(group, circle, index) {
                    Ok(t) if t.active => vec![Notice::slice_selected(t.active_count, t.divisions)],
                    _ => Vec::new(),
                };
                self.finish(notices)
            }
            Mode::Drag => {
                let outcome = self
                    .merge
                    .pick_slice(&mut self.workspace, group, circle, index);
                let notices = Self::pick_notices(outcome);
                self.finish(notices)
            }
            Mode::Erase | Mode::Amplify => self.click_container(group),
        }
    }

    pub fn click_container(&mut self, group: GroupId) -> Vec<Notice> {
        let notices = match self.mode {
            Mode::Select => Vec::new(),
            Mode::Erase => match self.workspace.remove_group(group) {
                Ok(_) => vec![Notice::group_removed()],
                Err(_) => Vec::new(),
            },
            Mode::Drag => {
                if self.merge.is_holding() {
                    let outcome = self.merge.place(&mut self.workspace, group);
                    Self::place_notices(outcome)
                } else {
                    Vec::new()
                }
            }
            Mode::Amplify => {
                if self.workspace.group(group).is_some() {
                    self.amplifying = Some(group);
                    vec![Notice::amplify_prompt()]
                } else {
                    Vec::new()
                }
            }
        };
        self.finish(notices)
    }

    /// The "drag slices" handle under a group; only present in Drag mode.
    pub fn click_handle(&mut self, group: GroupId) -> Vec<Notice> {
        if self.mode != Mode::Drag {
            return Vec::new();
        }
        let outcome = self.merge.pick_group(&mut self.workspace, group);
        let notices = Self::pick_notices(outcome);
        self.finish(notices)
    }

    /// Empty workspace area: cancels a held item.
    pub fn click_background(&mut self) -> Vec<Notice> {
        if self.merge.cancel() {
            vec![Notice::drag_cancelled()]
        } else {
            Vec::new()
        }
    }

    // --- Helpers ---

    fn pick_notices(outcome: crate::error::Result<PickOutcome>) -> Vec<Notice> {
        match outcome {
            Ok(PickOutcome::Picked(PickedItem::Slice { .. })) => vec![Notice::picked_slice()],
            Ok(PickOutcome::Picked(PickedItem::Group { slice_count, .. })) => {
                vec![Notice::picked_group(slice_count)]
            }
            Ok(PickOutcome::Released) => vec![Notice::drag_cancelled()],
            Ok(PickOutcome::Placed(placed)) => Self::place_notices(placed),
            Err(FractionError::NothingToPick) => vec![Notice::nothing_to_pick()],
            Err(_) => Vec::new(),
        }
    }

    fn place_notices(outcome: PlaceOutcome) -> Vec<Notice> {
        match outcome {
            PlaceOutcome::Merged(stats) => vec![Notice::merged(&stats)],
            PlaceOutcome::Rejected(PlaceRejection::SelfTarget) | PlaceOutcome::Unresolved => {
                Vec::new()
            }
            PlaceOutcome::Rejected(rejection) => vec![Notice::rejected(&rejection)],
        }
    }

    /// Append the cleanup notice when the sweeps behind this gesture
    /// actually removed something.
    fn finish(&mut self, mut notices: Vec<Notice>) -> Vec<Notice> {
        let swept = self.workspace.take_swept();
        if !swept.is_noop() {
            notices.push(Notice::cleaned(&swept));
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_groups(n: usize) -> (Board, Vec<GroupId>) {
        let mut board = Board::default();
        let ids = (0..n).map(|_| board.add_circle()).collect();
        (board, ids)
    }

    fn first_circle(board: &Board, group: GroupId) -> CircleId {
        board.workspace().group(group).unwrap().circles[0].id
    }

    #[test]
    fn test_mode_toggle_and_notice() {
        let mut board = Board::default();
        let notices = board.set_mode(Mode::Erase);
        assert_eq!(board.mode(), Mode::Erase);
        assert_eq!(notices, vec![Notice::mode_entered(Mode::Erase)]);

        let notices = board.set_mode(Mode::Erase);
        assert_eq!(board.mode(), Mode::Select);
        assert!(notices.is_empty());

        assert!(board.set_mode(Mode::Select).is_empty());
        assert_eq!(board.mode(), Mode::Select);
    }

    #[test]
    fn test_divide_reports_new_count() {
        let (mut board, ids) = board_with_groups(1);
        assert_eq!(board.divide(ids[0], 3).0, Some(4));
        assert_eq!(board.divide(ids[0], i64::MAX).0, Some(12));
        // unchanged count is still reported
        assert_eq!(board.divide(ids[0], 1).0, Some(12));
        assert_eq!(board.divide(GroupId::new(), 1), (None, Vec::new()));
    }

    #[test]
    fn test_keys() {
        let mut board = Board::default();
        board.press_key(Key::Char('d'));
        assert_eq!(board.mode(), Mode::Drag);
        board.press_key(Key::Char('N'));
        assert_eq!(board.workspace().groups.len(), 1);
        board.press_key(Key::Char('v'));
        assert_eq!(board.mode(), Mode::Select);
        assert!(board.press_key(Key::Char('z')).is_empty());
    }

    #[test]
    fn test_select_toggles_slice() {
        let (mut board, ids) = board_with_groups(1);
        board.divide(ids[0], 3);
        let circle = first_circle(&board, ids[0]);
        let notices = board.click_slice(ids[0], circle, 2);
        assert_eq!(notices, vec![Notice::slice_selected(2, 4)]);
        // turning a slice off says nothing
        assert!(board.click_slice(ids[0], circle, 2).is_empty());
    }

    #[test]
    fn test_deselecting_last_slice_reports_cleanup() {
        let (mut board, ids) = board_with_groups(1);
        let circle = first_circle(&board, ids[0]);
        let notices = board.click_slice(ids[0], circle, 0);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Cleaning up empty circles");
        assert!(board.workspace().groups.is_empty());
    }

    #[test]
    fn test_erase_removes_group_from_any_click() {
        let (mut board, ids) = board_with_groups(2);
        board.set_mode(Mode::Erase);
        let circle = first_circle(&board, ids[0]);
        let notices = board.click_slice(ids[0], circle, 0);
        assert_eq!(notices, vec![Notice::group_removed()]);
        assert_eq!(board.workspace().groups.len(), 1);
        board.click_container(ids[1]);
        assert!(board.workspace().groups.is_empty());
    }

    #[test]
    fn test_drag_pick_and_place() {
        let (mut board, ids) = board_with_groups(2);
        board.divide(ids[0], 1); // 1/2
        board.divide(ids[1], 3); // 1/4
        board.set_mode(Mode::Drag);

        let notices = board.click_handle(ids[0]);
        assert_eq!(notices[0].title, "Dragging 1 slices");
        assert!(board.follower().is_some());
        assert!(board.drop_target_ok(ids[1]));

        let notices = board.click_container(ids[1]);
        assert_eq!(notices[0], Notice::merged(&crate::merge::MergeStats {
            conversion_factor: 2,
            slices_removed: 1,
            slices_added: 2,
            circles_created: 0,
        }));
        assert_eq!(notices[1].title, "Cleaning up empty circles");
        assert!(board.picked().is_none());
        let target = board.workspace().group(ids[1]).unwrap();
        assert_eq!(target.active_count(), 3);
    }

    #[test]
    fn test_drag_incompatible_warns() {
        let (mut board, ids) = board_with_groups(2);
        board.divide(ids[0], 2); // thirds
        board.divide(ids[1], 3); // quarters
        board.set_mode(Mode::Drag);
        let circle = first_circle(&board, ids[0]);
        board.click_slice(ids[0], circle, 0);
        let notices = board.click_container(ids[1]);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(board.picked().is_none());
        assert_eq!(board.workspace().groups.len(), 2);
    }

    #[test]
    fn test_drag_inactive_slice_is_silent() {
        let (mut board, ids) = board_with_groups(1);
        board.divide(ids[0], 1);
        board.set_mode(Mode::Drag);
        let circle = first_circle(&board, ids[0]);
        assert!(board.click_slice(ids[0], circle, 1).is_empty());
        assert!(board.picked().is_none());
    }

    #[test]
    fn test_background_and_escape_cancel() {
        let (mut board, ids) = board_with_groups(1);
        board.set_mode(Mode::Drag);
        board.click_handle(ids[0]);
        assert_eq!(board.click_background(), vec![Notice::drag_cancelled()]);
        assert!(board.click_background().is_empty());

        board.click_handle(ids[0]);
        assert_eq!(board.press_key(Key::Escape), vec![Notice::drag_cancelled()]);
        assert!(board.picked().is_none());
    }

    #[test]
    fn test_leaving_drag_drops_held_item() {
        let (mut board, ids) = board_with_groups(1);
        board.set_mode(Mode::Drag);
        board.click_handle(ids[0]);
        board.set_mode(Mode::Erase);
        assert!(board.picked().is_none());
    }

    #[test]
    fn test_handle_outside_drag_mode_does_nothing() {
        let (mut board, ids) = board_with_groups(1);
        assert!(board.click_handle(ids[0]).is_empty());
        assert!(board.picked().is_none());
    }

    #[test]
    fn test_amplify_prompt_flow() {
        let (mut board, ids) = board_with_groups(1);
        board.divide(ids[0], 1); // 1/2
        board.set_mode(Mode::Amplify);
        board.click_container(ids[0]);
        assert_eq!(board.amplifying(), Some(ids[0]));

        assert_eq!(board.confirm_amplify("1"), Err(FactorError::NotGreaterThanOne));
        assert_eq!(board.amplifying(), Some(ids[0]), "prompt stays open");

        let notices = board.confirm_amplify("3").unwrap();
        assert_eq!(notices[0].description.as_deref(), Some("1/2 = 3/6"));
        assert_eq!(board.amplifying(), None);
        let g = board.workspace().group(ids[0]).unwrap();
        assert_eq!(g.divisions(), Some(6));
        assert_eq!(g.active_count(), 3);
    }

    #[test]
    fn test_escape_closes_prompt_first() {
        let (mut board, ids) = board_with_groups(1);
        board.set_mode(Mode::Amplify);
        board.click_container(ids[0]);
        assert!(board.press_key(Key::Escape).is_empty());
        assert_eq!(board.amplifying(), None);
        assert!(board.confirm_amplify("2").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_notice() {
        let (mut board, ids) = board_with_groups(1);
        assert_eq!(board.duplicate(ids[0]), vec![Notice::group_duplicated()]);
        assert_eq!(board.workspace().groups.len(), 2);
        assert!(board.duplicate(GroupId::new()).is_empty());
    }

    #[test]
    fn test_snapshot() {
        let (mut board, ids) = board_with_groups(2);
        board.set_mode(Mode::Drag);
        board.click_handle(ids[0]);
        let snap = board.snapshot();
        assert_eq!(snap.mode, Mode::Drag);
        assert_eq!(snap.groups.len(), 2);
        assert_eq!(snap.groups[1].position, 2);
        assert!(snap.groups[1].drop_target);
        assert!(!snap.groups[0].drop_target);
        assert!(matches!(snap.follower, Some(FollowerView::Badge { .. })));

        let json = snap.to_json().unwrap();
        let back = WorkspaceSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snap);
    }
}
