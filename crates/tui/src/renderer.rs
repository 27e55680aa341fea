use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
};
use tabletop_protocol::{RenderCommand, TextAlign, ThemeToken};

pub fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Surface => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::TabBar => Color::Rgb(24, 24, 37),
        ThemeToken::TabActive => Color::Blue,
        ThemeToken::TabInactive => Color::Rgb(24, 24, 37),
        ThemeToken::CategoryHeader => Color::Yellow,
        ThemeToken::ItemRow => Color::Black,
        ThemeToken::ItemPrice => Color::White,
        ThemeToken::QuantityBadge => Color::LightBlue,
        ThemeToken::SoldOut => Color::Rgb(40, 40, 40),
        ThemeToken::CartBar => Color::DarkGray,
        ThemeToken::CartBarText => Color::White,
        ThemeToken::CartButton => Color::Blue,
    }
}

/// Paint render commands into `area`. One protocol unit is one cell;
/// command coordinates are relative to the area's top-left corner.
pub fn paint(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    let mut clip = area;
    for cmd in commands {
        match cmd {
            RenderCommand::SetClip { rect } => {
                clip = to_cells(area, rect.x, rect.y, rect.w, rect.h).intersection(area);
            }
            RenderCommand::ClearClip => clip = area,
            RenderCommand::DrawRect {
                rect, color, label, ..
            } => {
                let cells = to_cells(area, rect.x, rect.y, rect.w, rect.h).intersection(clip);
                if cells.is_empty() {
                    continue;
                }
                let bg = theme_to_color(*color);
                buf.set_style(cells, Style::default().bg(bg));
                if let Some(label) = label.as_deref() {
                    let style = Style::default().fg(label_color(*color)).bg(bg);
                    buf.set_stringn(
                        cells.x + 1,
                        cells.y,
                        label,
                        usize::from(cells.width.saturating_sub(1)),
                        style,
                    );
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let width = Line::from(text.as_str()).width() as f64;
                let x = match align {
                    TextAlign::Left => position.x + 1.0,
                    TextAlign::Center => position.x - width / 2.0,
                    TextAlign::Right => position.x - width - 1.0,
                };
                let cells = to_cells(area, x, position.y, width, 1.0).intersection(clip);
                if cells.is_empty() {
                    continue;
                }
                let style = Style::default().fg(theme_to_color(*color));
                buf.set_stringn(cells.x, cells.y, text, usize::from(cells.width), style);
            }
            RenderCommand::DrawLine { from, to, color, .. } => {
                // Only horizontal rules make sense at cell resolution.
                if (from.y - to.y).abs() >= 1.0 {
                    continue;
                }
                let cells = to_cells(area, from.x, from.y - 1.0, to.x - from.x, 1.0).intersection(clip);
                buf.set_style(cells, Style::default().fg(theme_to_color(*color)));
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

fn label_color(background: ThemeToken) -> Color {
    match background {
        ThemeToken::TabInactive | ThemeToken::SoldOut => Color::Gray,
        _ => Color::White,
    }
}

/// Convert a protocol rect to a cell rect inside `area`, dropping whatever
/// lies above or left of it.
fn to_cells(area: Rect, x: f64, y: f64, w: f64, h: f64) -> Rect {
    let x0 = x.max(0.0).floor();
    let y0 = y.max(0.0).floor();
    let x1 = (x + w).ceil();
    let y1 = (y + h).ceil();
    if x1 <= x0 || y1 <= y0 {
        return Rect::default();
    }
    let clamp = |v: f64| v.min(f64::from(u16::MAX)) as u16;
    Rect::new(
        area.x.saturating_add(clamp(x0)),
        area.y.saturating_add(clamp(y0)),
        clamp(x1 - x0),
        clamp(y1 - y0),
    )
}
