/// Upper bound on slices per circle offered by the divide controls.
/// The engine takes the bound as a parameter; this is only the default.
pub const DEFAULT_MAX_DIVISIONS: u32 = 12;

/// A circle always has at least one slice.
pub const MIN_DIVISIONS: u32 = 1;

/// Pre-filled value of the amplify prompt.
pub const DEFAULT_AMPLIFY_FACTOR: u32 = 2;

/// Largest slice count an amplified group may hold, across its circles.
pub const MAX_GROUP_SLICES: u32 = 10_000;

/// Block tools: dividend shown when a tool is first opened.
pub const DEFAULT_TOTAL_BLOCKS: u32 = 40;

/// Block tools: smallest accepted dividend.
pub const MIN_TOTAL_BLOCKS: u32 = 1;

/// Block tools: largest accepted dividend (the grid stops being readable past this)
pub const MAX_TOTAL_BLOCKS: u32 = 200;

/// Colors cycled across groups in the grouping tool.
pub const BLOCK_PALETTE: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ec4899", "#8b5cf6", "#6366f1", "#14b8a6", "#ef4444",
];
