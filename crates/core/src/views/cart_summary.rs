use tabletop_protocol::{HitTarget, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::model::format_price;

const BUTTON_WIDTH_FRACTION: f64 = 0.4;

/// Bottom bar with the running total and a "view cart" button. Hidden while
/// the cart is empty.
pub fn render_cart_summary(
    total_amount: u64,
    item_count: u64,
    viewport: &Viewport,
    bar_height: f64,
) -> Vec<RenderCommand> {
    if item_count == 0 {
        return Vec::new();
    }
    let y = viewport.height - bar_height;
    let button_w = viewport.width * BUTTON_WIDTH_FRACTION;

    vec![
        RenderCommand::BeginGroup {
            id: "cart-summary".into(),
            label: None,
        },
        RenderCommand::DrawRect {
            rect: Rect::new(0.0, y, viewport.width, bar_height),
            color: ThemeToken::CartBar,
            border_color: Some(ThemeToken::Border),
            label: None,
            target: None,
        },
        RenderCommand::DrawText {
            position: Point::new(0.0, y),
            text: format!("총 {}", format_price(total_amount)),
            color: ThemeToken::CartBarText,
            font_size: 16.0,
            align: TextAlign::Left,
        },
        RenderCommand::DrawRect {
            rect: Rect::new(viewport.width - button_w, y, button_w, bar_height),
            color: ThemeToken::CartButton,
            border_color: None,
            label: Some(format!("카트 보기 ({item_count})")),
            target: Some(HitTarget::CartButton),
        },
        RenderCommand::EndGroup,
    ]
}
