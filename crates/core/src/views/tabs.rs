use tabletop_protocol::{HitTarget, Point, Rect, RenderCommand, ThemeToken};

use crate::model::MenuData;

/// Render the sticky category tab strip. Tabs share the width equally; the
/// active one is highlighted and underlined.
pub fn render_category_tabs(
    menu: &MenuData,
    active: Option<&str>,
    width: f64,
    height: f64,
) -> Vec<RenderCommand> {
    let count = menu.categories.len();
    if count == 0 || width <= 0.0 {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(count + 4);
    commands.push(RenderCommand::BeginGroup {
        id: "category-tabs".into(),
        label: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, height),
        color: ThemeToken::TabBar,
        border_color: Some(ThemeToken::Border),
        label: None,
        target: None,
    });

    let tab_width = width / count as f64;
    for (i, category) in menu.categories.iter().enumerate() {
        let x = i as f64 * tab_width;
        let is_active = active == Some(category.id.as_str());
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, 0.0, tab_width, height),
            color: if is_active {
                ThemeToken::TabActive
            } else {
                ThemeToken::TabInactive
            },
            border_color: None,
            label: Some(category.name.clone()),
            target: Some(HitTarget::CategoryTab(category.id.clone())),
        });
        if is_active {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, height),
                to: Point::new(x + tab_width, height),
                color: ThemeToken::TabActive,
                width: 2.0,
            });
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
