//! Plain-text rendering of boards, notices and block tools for the terminal.

use std::fmt::Write;

use pie_core::{
    BlockRole, Circle, FollowerView, Grouping, Notice, NoticeLevel, RectangleCheck,
    WorkspaceSnapshot,
};

fn circle_glyphs(circle: &Circle) -> String {
    circle
        .slices
        .iter()
        .map(|s| if s.active { '●' } else { '○' })
        .collect()
}

pub fn board(snap: &WorkspaceSnapshot) -> String {
    let mut out = String::new();
    let _ = write!(out, "mode: {}", snap.mode);
    match &snap.follower {
        Some(FollowerView::Badge { label }) => {
            let _ = write!(out, "  holding: {label}");
        }
        Some(FollowerView::Slice { divisions, .. }) => {
            let _ = write!(out, "  holding: 1/{divisions}");
        }
        None => {}
    }
    if let Some(position) = snap.amplifying {
        let _ = write!(out, "  amplifying: group {position}");
    }
    out.push('\n');

    if snap.groups.is_empty() {
        out.push_str("(workspace is empty)\n");
        return out;
    }
    for g in &snap.groups {
        let fraction = g
            .fraction
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        let circles: Vec<String> = g.group.circles.iter().map(circle_glyphs).collect();
        let _ = write!(out, "[{}] {:>7}  {}", g.position, fraction, circles.join(" "));
        if g.drop_target {
            out.push_str("  <- drop here");
        }
        out.push('\n');
    }
    out
}

pub fn notice(n: &Notice) -> String {
    let tag = match n.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warn",
    };
    match &n.description {
        Some(d) => format!("[{tag}] {}: {d}", n.title),
        None => format!("[{tag}] {}", n.title),
    }
}

pub fn grouping(g: &Grouping) -> String {
    let mut out = format!(
        "{} ÷ {} = {} remainder {}\n",
        g.total, g.group_size, g.quotient, g.remainder
    );
    for (i, chunk) in g.blocks.chunks(g.group_size as usize).enumerate() {
        let row: String = chunk
            .iter()
            .map(|b| match b {
                BlockRole::Grouped(_) => '■',
                BlockRole::Remainder => '□',
            })
            .collect();
        let label = match chunk.first() {
            Some(BlockRole::Grouped(_)) => format!("group {}", i + 1),
            _ => "remainder".to_string(),
        };
        let _ = writeln!(out, "{row}  {label}");
    }
    out
}

pub fn rectangle(check: &RectangleCheck) -> String {
    let mut out = format!("{}\n{}\n", check, check.description());
    if let RectangleCheck::Fits { columns, rows, .. } = check {
        let row = "■".repeat(*columns as usize);
        for _ in 0..*rows {
            let _ = writeln!(out, "{row}");
        }
    }
    out
}
