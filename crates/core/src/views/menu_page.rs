use serde::{Deserialize, Serialize};
use tabletop_protocol::{HitTarget, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::model::{Cart, MenuData, MenuItem, format_price};
use crate::tracker::{CategoryBounds, CategoryLayout};

/// Vertical rhythm of the menu page, in the host's units (CSS pixels for the
/// browser, terminal rows for the TUI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetrics {
    /// Page offset where the first section starts.
    pub content_top: f64,
    pub heading_height: f64,
    pub item_height: f64,
    pub item_gap: f64,
    /// Space after each section; counted as part of the section above it.
    pub section_gap: f64,
    pub font_size: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            content_top: 0.0,
            heading_height: 56.0,
            item_height: 96.0,
            item_gap: 16.0,
            section_gap: 16.0,
            font_size: 14.0,
        }
    }
}

struct Section<'a> {
    id: &'a str,
    title: String,
    top: f64,
    bottom: f64,
    items: Vec<(&'a MenuItem, f64)>,
}

fn measure<'a>(menu: &'a MenuData, metrics: &PageMetrics) -> Vec<Section<'a>> {
    let mut y = metrics.content_top;
    let mut sections = Vec::with_capacity(menu.categories.len());
    for category in &menu.categories {
        let top = y;
        y += metrics.heading_height;
        let mut items = Vec::with_capacity(category.items.len());
        for (i, item) in category.items.iter().enumerate() {
            if i > 0 {
                y += metrics.item_gap;
            }
            items.push((item, y));
            y += metrics.item_height;
        }
        y += metrics.section_gap;
        sections.push(Section {
            id: &category.id,
            title: category.title(),
            top,
            bottom: y,
            items,
        });
    }
    sections
}

/// Measure every category section of the stacked menu page.
///
/// Sections are contiguous: each one owns its heading, its item rows and
/// the gap below it.
pub fn layout_menu(menu: &MenuData, metrics: &PageMetrics) -> CategoryLayout {
    CategoryLayout::new(
        measure(menu, metrics)
            .into_iter()
            .map(|s| CategoryBounds::new(s.id, s.top, s.bottom)),
    )
}

/// The item whose row is at or below page offset `y`: the one a reader is
/// looking at when the page is scrolled to `y`.
pub fn item_at<'a>(menu: &'a MenuData, metrics: &PageMetrics, y: f64) -> Option<&'a MenuItem> {
    measure(menu, metrics)
        .into_iter()
        .flat_map(|s| s.items)
        .find(|(_, top)| top + metrics.item_height > y)
        .map(|(item, _)| item)
}

/// Render the part of the menu page visible through `viewport`.
///
/// Output coordinates are relative to the viewport's top-left corner.
pub fn render_menu_page(
    menu: &MenuData,
    cart: &Cart,
    metrics: &PageMetrics,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    let mut commands = Vec::new();
    let width = viewport.width;
    commands.push(RenderCommand::SetClip {
        rect: Rect::new(0.0, 0.0, width, viewport.height),
    });

    for section in measure(menu, metrics) {
        if !viewport.shows(section.top, section.bottom) {
            continue;
        }
        commands.push(RenderCommand::BeginGroup {
            id: format!("category-{}", section.id),
            label: Some(section.title.clone()),
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(0.0, section.top - viewport.y),
            text: section.title,
            color: ThemeToken::CategoryHeader,
            font_size: metrics.font_size * 1.25,
            align: TextAlign::Left,
        });

        for (item, item_top) in section.items {
            if !viewport.shows(item_top, item_top + metrics.item_height) {
                continue;
            }
            let quantity = cart.quantity(&item.id);
            render_item(&mut commands, item, quantity, item_top - viewport.y, width, metrics);
        }
        commands.push(RenderCommand::EndGroup);
    }

    commands.push(RenderCommand::ClearClip);
    commands
}

fn render_item(
    commands: &mut Vec<RenderCommand>,
    item: &MenuItem,
    quantity: u32,
    y: f64,
    width: f64,
    metrics: &PageMetrics,
) {
    let row_color = if item.available {
        ThemeToken::ItemRow
    } else {
        ThemeToken::SoldOut
    };
    let label = if item.icon.is_empty() {
        item.name.clone()
    } else {
        format!("{} {}", item.icon, item.name)
    };
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, y, width, metrics.item_height),
        color: row_color,
        border_color: Some(ThemeToken::Border),
        label: Some(label),
        target: Some(HitTarget::MenuItem(item.id.clone())),
    });

    let line = metrics.font_size;
    if metrics.item_height > line {
        commands.push(RenderCommand::DrawText {
            position: Point::new(0.0, y + line),
            text: item.description.clone(),
            color: ThemeToken::TextMuted,
            font_size: metrics.font_size * 0.85,
            align: TextAlign::Left,
        });
    }
    commands.push(RenderCommand::DrawText {
        position: Point::new(width, y),
        text: format_price(item.price),
        color: ThemeToken::ItemPrice,
        font_size: metrics.font_size,
        align: TextAlign::Right,
    });
    if quantity > 0 {
        commands.push(RenderCommand::DrawText {
            position: Point::new(width, y + metrics.item_height - line),
            text: format!("x{quantity}"),
            color: ThemeToken::QuantityBadge,
            font_size: metrics.font_size,
            align: TextAlign::Right,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> MenuData {
        MenuData::bundled().unwrap()
    }

    fn viewport(y: f64, height: f64) -> Viewport {
        Viewport {
            y,
            width: 360.0,
            height,
        }
    }

    #[test]
    fn sections_are_contiguous() {
        let metrics = PageMetrics::default();
        let layout = layout_menu(&menu(), &metrics);
        let bounds: Vec<_> = layout.iter().collect();
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds[0].top, 0.0);
        for pair in bounds.windows(2) {
            assert!((pair[0].bottom - pair[1].top).abs() < f64::EPSILON);
        }
        // beer: heading + 3 rows + 2 inner gaps + section gap
        let beer = 56.0 + 3.0 * 96.0 + 2.0 * 16.0 + 16.0;
        assert!((bounds[0].height() - beer).abs() < f64::EPSILON);
    }

    #[test]
    fn content_top_offsets_everything() {
        let metrics = PageMetrics {
            content_top: 120.0,
            ..PageMetrics::default()
        };
        let layout = layout_menu(&menu(), &metrics);
        assert_eq!(layout.get("beer").map(|b| b.top), Some(120.0));
    }

    #[test]
    fn renders_only_visible_sections() {
        let metrics = PageMetrics::default();
        let menu = menu();
        let layout = layout_menu(&menu, &metrics);
        let soju_top = layout.get("soju").map_or(0.0, |b| b.top);
        let cmds = render_menu_page(&menu, &Cart::new(), &metrics, &viewport(soju_top, 100.0));
        let groups: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(groups, ["category-soju"]);
        assert!(matches!(cmds.first(), Some(RenderCommand::SetClip { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::ClearClip)));
    }

    #[test]
    fn quantity_badges_follow_cart() {
        let metrics = PageMetrics::default();
        let cart = Cart::from_quantities([("cass-draft", 2)]);
        let cmds = render_menu_page(&menu(), &cart, &metrics, &viewport(0.0, 400.0));
        let badges: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText {
                    text,
                    color: ThemeToken::QuantityBadge,
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(badges, ["x2"]);
    }

    #[test]
    fn item_at_follows_scroll() {
        let metrics = PageMetrics::default();
        let menu = menu();
        assert_eq!(item_at(&menu, &metrics, 0.0).map(|i| i.id.as_str()), Some("cass-draft"));
        // Second beer row starts after heading + row + gap.
        let second = 56.0 + 96.0 + 16.0;
        assert_eq!(item_at(&menu, &metrics, second).map(|i| i.id.as_str()), Some("hite-draft"));
        assert!(item_at(&menu, &metrics, 1e6).is_none());
    }

    #[test]
    fn item_rows_are_hit_targets() {
        let metrics = PageMetrics::default();
        let cmds = render_menu_page(&menu(), &Cart::new(), &metrics, &viewport(0.0, 400.0));
        let first_row = Point::new(10.0, metrics.heading_height + 1.0);
        let hit = cmds.iter().find_map(|c| c.hit(first_row));
        assert_eq!(hit, Some(&HitTarget::MenuItem("cass-draft".into())));
    }
}
