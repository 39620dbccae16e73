//! Geometry for drawing slices and the pointer-follow cursor.
//!
//! Pure projections only: nothing here reads or changes the workspace.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::merge::PickedItem;

/// What the cursor shows while an item is held.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FollowerView {
    /// A single wedge of the source denomination, rotated to where it was
    /// picked from.
    Slice { divisions: u32, rotation_degrees: f64 },
    /// A round badge such as `+3`.
    Badge { label: String },
}

impl FollowerView {
    pub fn for_item(item: &PickedItem) -> Self {
        match *item {
            PickedItem::Slice {
                slice_index,
                divisions,
                ..
            } => FollowerView::Slice {
                divisions,
                rotation_degrees: slice_index as f64 / f64::from(divisions.max(1)) * 360.0,
            },
            PickedItem::Group { slice_count, .. } => FollowerView::Badge {
                label: format!("+{slice_count}"),
            },
        }
    }
}

fn num(v: f64) -> String {
    // keep tiny trig residue from printing as -0.00
    let v = if v.abs() < 0.005 { 0.0 } else { v };
    format!("{v:.2}")
}

/// SVG path for slice `index` of a circle cut into `divisions` wedges,
/// starting at twelve o'clock and running clockwise. One division draws
/// the full circle.
pub fn slice_path(divisions: u32, index: u32, radius: f64, cx: f64, cy: f64) -> String {
    if divisions <= 1 {
        return format!(
            "M {},{} a {r},{r} 0 1,0 {d},0 a {r},{r} 0 1,0 -{d},0",
            num(cx - radius),
            num(cy),
            r = num(radius),
            d = num(radius * 2.0),
        );
    }
    let n = f64::from(divisions);
    let start = f64::from(index) / n * TAU - FRAC_PI_2;
    let end = f64::from(index + 1) / n * TAU - FRAC_PI_2;
    let large_arc = u8::from(TAU / n > PI);
    format!(
        "M {},{} L {},{} A {r},{r} 0 {large_arc} 1 {},{} Z",
        num(cx),
        num(cy),
        num(cx + radius * start.cos()),
        num(cy + radius * start.sin()),
        num(cx + radius * end.cos()),
        num(cy + radius * end.sin()),
        r = num(radius),
    )
}
