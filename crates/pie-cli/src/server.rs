use std::sync::Arc;

use pie_core::{
    AmplifyFactor, BlockCount, Board, CircleId, DEFAULT_AMPLIFY_FACTOR, GroupId, Key, Mode, Notice,
    group_blocks, parse_factor, try_rectangle,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::Config;

#[derive(Clone)]
pub struct PieServer {
    state: Arc<Mutex<Board>>,
    blocks: BlockCount,
    tool_router: ToolRouter<Self>,
}

impl PieServer {
    pub fn new(config: &Config) -> std::result::Result<Self, String> {
        let blocks = config
            .blocks()
            .map_err(|e| format!("invalid total_blocks: {e}"))?;
        Ok(Self {
            state: Arc::new(Mutex::new(Board::new(config.max_divisions))),
            blocks,
            tool_router: Self::tool_router(),
        })
    }

    fn group_id(board: &Board, position: usize) -> Result<GroupId, McpError> {
        position
            .checked_sub(1)
            .and_then(|i| board.workspace().groups.get(i))
            .map(|g| g.id)
            .ok_or_else(|| {
                McpError::invalid_params(format!("no group at position {position}"), None)
            })
    }

    fn circle_id(
        board: &Board,
        group: usize,
        circle: usize,
    ) -> Result<(GroupId, CircleId), McpError> {
        let gid = Self::group_id(board, group)?;
        let cid = board
            .workspace()
            .group(gid)
            .and_then(|g| circle.checked_sub(1).and_then(|i| g.circles.get(i)))
            .map(|c| c.id)
            .ok_or_else(|| {
                McpError::invalid_params(format!("group {group} has no circle {circle}"), None)
            })?;
        Ok((gid, cid))
    }

    fn blocks_for(&self, total: Option<u32>) -> Result<BlockCount, McpError> {
        match total {
            Some(n) => {
                BlockCount::new(n).map_err(|e| McpError::invalid_params(e.to_string(), None))
            }
            None => Ok(self.blocks),
        }
    }

    /// Every board tool answers with the notices it raised plus the new state.
    fn respond(board: &Board, notices: Vec<Notice>) -> Result<CallToolResult, McpError> {
        let result = serde_json::json!({
            "notices": notices,
            "state": board.snapshot(),
        });
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&result).unwrap_or_default(),
        )]))
    }

    fn json(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct ModeRequest {
    /// One of "select", "erase", "drag", "amplify". Requesting the active
    /// mode again switches back to select.
    mode: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct KeyRequest {
    /// A single character shortcut (v, e, d, a, n) or "escape"
    key: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GroupRequest {
    /// 1-based position of the group in the workspace
    group: usize,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SliceRequest {
    /// 1-based position of the group in the workspace
    group: usize,
    /// 1-based position of the circle within the group
    circle: usize,
    /// 1-based position of the slice within the circle
    slice: usize,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DivideRequest {
    /// 1-based position of the group in the workspace
    group: usize,
    /// Signed change to the number of divisions, e.g. 1 or -1
    delta: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AmplifyRequest {
    /// 1-based position of the group in the workspace
    group: usize,
    /// Whole-number factor greater than 1 (defaults to 2)
    factor: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConfirmAmplifyRequest {
    /// Factor typed into the open amplify prompt
    factor: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GroupBlocksRequest {
    /// How many blocks go in each group
    group_size: u32,
    /// Total blocks; defaults to the configured total
    total: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RectangleRequest {
    /// Number of columns to try
    columns: u32,
    /// Total blocks; defaults to the configured total
    total: Option<u32>,
}

// --- Tool implementations ---

#[tool_router]
impl PieServer {
    #[tool(
        description = "Return the current fraction board: mode, held item, totals and every group with its fraction, circles and slices. Groups are numbered from 1 in display order."
    )]
    async fn pie_state(&self) -> Result<CallToolResult, McpError> {
        let board = self.state.lock().await;
        Self::respond(&board, Vec::new())
    }

    #[tool(description = "Add a new group holding one whole circle (1/1).")]
    async fn pie_add_circle(&self) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let id = board.add_circle();
        tracing::debug!(%id, "added group");
        Self::respond(&board, Vec::new())
    }

    #[tool(
        description = "Switch interaction mode. Modes: select (toggle slices), erase (remove groups), drag (pick and place slices to add fractions), amplify (multiply a fraction's parts). Leaving a mode drops anything held."
    )]
    async fn pie_set_mode(
        &self,
        Parameters(req): Parameters<ModeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mode: Mode = req
            .mode
            .parse()
            .map_err(|e: String| McpError::invalid_params(e, None))?;
        let mut board = self.state.lock().await;
        let notices = board.set_mode(mode);
        Self::respond(&board, notices)
    }

    #[tool(description = "Press a keyboard shortcut: v, e, d, a switch modes, n adds a circle, escape cancels.")]
    async fn pie_press_key(
        &self,
        Parameters(req): Parameters<KeyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let key = if req.key.eq_ignore_ascii_case("escape") || req.key.eq_ignore_ascii_case("esc")
        {
            Key::Escape
        } else {
            let mut chars = req.key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => {
                    return Err(McpError::invalid_params(
                        format!("key must be a single character or 'escape', got '{}'", req.key),
                        None,
                    ));
                }
            }
        };
        let mut board = self.state.lock().await;
        let notices = board.press_key(key);
        Self::respond(&board, notices)
    }

    #[tool(
        description = "Click one slice. In select mode this toggles it; in drag mode it picks the slice up (or places a held item on this group); in erase and amplify modes it acts on the whole group."
    )]
    async fn pie_click_slice(
        &self,
        Parameters(req): Parameters<SliceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let (gid, cid) = Self::circle_id(&board, req.group, req.circle)?;
        let index = req
            .slice
            .checked_sub(1)
            .ok_or_else(|| McpError::invalid_params("slice positions start at 1", None))?;
        let notices = board.click_slice(gid, cid, index);
        Self::respond(&board, notices)
    }

    #[tool(
        description = "Click a group's card. Erase mode removes it, drag mode drops the held item on it, amplify mode opens the amplify prompt for it."
    )]
    async fn pie_click_group(
        &self,
        Parameters(req): Parameters<GroupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let gid = Self::group_id(&board, req.group)?;
        let notices = board.click_container(gid);
        Self::respond(&board, notices)
    }

    #[tool(description = "Pick up every active slice of a group at once. Drag mode only.")]
    async fn pie_drag_handle(
        &self,
        Parameters(req): Parameters<GroupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let gid = Self::group_id(&board, req.group)?;
        let notices = board.click_handle(gid);
        Self::respond(&board, notices)
    }

    #[tool(description = "Click empty workspace. Cancels a held item.")]
    async fn pie_click_background(&self) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let notices = board.click_background();
        Self::respond(&board, notices)
    }

    #[tool(
        description = "Change how many parts a group's circles are divided into. The group collapses to a single circle; selected parts are kept up to the new size."
    )]
    async fn pie_divide(
        &self,
        Parameters(req): Parameters<DivideRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let gid = Self::group_id(&board, req.group)?;
        let (divisions, notices) = board.divide(gid, req.delta);
        tracing::debug!(?divisions, "divided group");
        Self::respond(&board, notices)
    }

    #[tool(description = "Duplicate a group, placing the copy right after it.")]
    async fn pie_duplicate(
        &self,
        Parameters(req): Parameters<GroupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        let gid = Self::group_id(&board, req.group)?;
        let notices = board.duplicate(gid);
        Self::respond(&board, notices)
    }

    #[tool(
        description = "Amplify a group's fraction by a whole factor: 1/2 amplified by 3 becomes 3/6. Works in any mode."
    )]
    async fn pie_amplify(
        &self,
        Parameters(req): Parameters<AmplifyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let factor = match req.factor.as_deref() {
            Some(raw) => parse_factor(raw),
            None => AmplifyFactor::new(i64::from(DEFAULT_AMPLIFY_FACTOR)),
        }
        .map_err(|e| McpError::invalid_params(format!("invalid factor: {e}"), None))?;
        let mut board = self.state.lock().await;
        let gid = Self::group_id(&board, req.group)?;
        let notices = board.amplify(gid, factor);
        Self::respond(&board, notices)
    }

    #[tool(
        description = "Submit the open amplify prompt (opened by clicking a group in amplify mode). Invalid factors leave the prompt open."
    )]
    async fn pie_confirm_amplify(
        &self,
        Parameters(req): Parameters<ConfirmAmplifyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut board = self.state.lock().await;
        if board.amplifying().is_none() {
            return Err(McpError::invalid_params(
                "no amplify prompt is open".to_string(),
                None,
            ));
        }
        let notices = board
            .confirm_amplify(&req.factor)
            .map_err(|e| McpError::invalid_params(format!("invalid factor: {e}"), None))?;
        Self::respond(&board, notices)
    }

    #[tool(
        description = "Split a row of blocks into groups of a given size and report the quotient and remainder."
    )]
    async fn pie_group_blocks(
        &self,
        Parameters(req): Parameters<GroupBlocksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let total = self.blocks_for(req.total)?;
        let grouping = group_blocks(total, req.group_size)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        Self::json(&grouping)
    }

    #[tool(
        description = "Check whether the blocks arrange into a rectangle with the given number of columns. Lists the factors to try when they don't."
    )]
    async fn pie_rectangle(
        &self,
        Parameters(req): Parameters<RectangleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let total = self.blocks_for(req.total)?;
        let check = try_rectangle(total, req.columns)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let result = serde_json::json!({
            "fits": check.fits(),
            "message": check.to_string(),
            "description": check.description(),
            "check": check,
        });
        Self::json(&result)
    }
}

#[tool_handler]
impl ServerHandler for PieServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "A fraction board of circles cut into equal slices. Each group of circles shows one fraction: \
                 selected slices over slices per circle.\n\n\
                 - Call pie_state first; groups, circles and slices are addressed by 1-based position.\n\
                 - To add fractions: pie_set_mode drag, pick with pie_click_slice or pie_drag_handle, then \
                   pie_click_group on the target. The target's parts must be a multiple of the source's.\n\
                 - Groups left with nothing selected are removed automatically.\n\
                 - pie_group_blocks and pie_rectangle explore division with a row of blocks."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
