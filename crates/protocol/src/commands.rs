use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Page views emit a `Vec<RenderCommand>` per frame. Renderers (terminal,
/// canvas, DOM) consume this list sequentially; each command carries all the
/// data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a text label and a hit
    /// target (for tap/click routing).
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<String>,
        target: Option<HitTarget>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Begin a logical group (e.g. a category section or the tab strip).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// What a tap on a drawn rectangle refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTarget {
    /// A category tab; tapping it scrolls to that category.
    CategoryTab(String),
    /// A menu item row.
    MenuItem(String),
    /// The "view cart" button in the bottom bar.
    CartButton,
}

impl RenderCommand {
    /// Hit target of this command when `point` falls inside its rect.
    pub fn hit(&self, point: Point) -> Option<&HitTarget> {
        match self {
            RenderCommand::DrawRect {
                rect,
                target: Some(target),
                ..
            } if rect.contains(point) => Some(target),
            _ => None,
        }
    }
}
