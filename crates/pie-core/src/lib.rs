//! Fraction circle engine.
//!
//! Models fractions as groups of pie-slice circles. Slices are switched on
//! and off, circles are re-divided, duplicated and amplified, and whole
//! selections are picked up and merged into other groups, converting
//! across denominators and growing new circles as needed.
//!
//! Zero I/O: rendering, persistence and transport belong to the caller.

pub mod blocks;
pub mod board;
pub mod circle;
pub mod constants;
pub mod error;
pub mod factor;
pub mod follower;
pub mod group;
pub mod ids;
pub mod merge;
pub mod mode;
pub mod notice;
pub mod slice;
pub mod snapshot;
pub mod workspace;

pub use blocks::{BlockCount, BlockRole, Grouping, RectangleCheck, factors, group_blocks, try_rectangle};
pub use board::{Board, Key};
pub use circle::Circle;
pub use constants::{
    DEFAULT_AMPLIFY_FACTOR, DEFAULT_MAX_DIVISIONS, DEFAULT_TOTAL_BLOCKS, MAX_GROUP_SLICES,
    MAX_TOTAL_BLOCKS,
    MIN_DIVISIONS, MIN_TOTAL_BLOCKS,
};
pub use error::{FractionError, Result};
pub use factor::{AmplifyFactor, FactorError, parse_factor};
pub use follower::{FollowerView, slice_path};
pub use group::{CircleGroup, Fraction};
pub use ids::{CircleId, GroupId, SliceId};
pub use merge::{
    MergeEngine, MergeStats, PickOutcome, PickedItem, PlaceOutcome, PlaceRejection,
    conversion_factor, merge_groups,
};
pub use mode::Mode;
pub use notice::{Notice, NoticeLevel};
pub use slice::Slice;
pub use snapshot::{GroupSnapshot, WorkspaceSnapshot};
pub use workspace::{
    CleanupReport, SliceToggle, Totals, Workspace, amplify_group, divide_group, duplicate_group,
    sweep_groups,
};
