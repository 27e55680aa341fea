use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tabletop_core::config::TrackerConfig;
use tabletop_core::model::{OrderState, PaymentMethod, format_price};
use tabletop_core::tracker::{ActiveCategoryTracker, ManualScheduler};
use tabletop_core::views::{cart_summary, menu_page, tabs};
use tabletop_protocol::{
    HitTarget, Point, RenderCommand, ScrollBehavior, ScrollRequest, Viewport,
};

use crate::renderer;

/// Rows above the menu: title bar and tab strip.
const CHROME_TOP: u16 = 2;
/// Row below the menu: cart summary bar.
const CHROME_BOTTOM: u16 = 1;

fn terminal_metrics() -> menu_page::PageMetrics {
    menu_page::PageMetrics {
        content_top: 0.0,
        heading_height: 1.0,
        item_height: 2.0,
        item_gap: 0.0,
        section_gap: 1.0,
        font_size: 1.0,
    }
}

/// Terminal menu page state.
pub struct MenuApp {
    state: OrderState,
    metrics: menu_page::PageMetrics,
    tracker: ActiveCategoryTracker<ManualScheduler>,
    scroll_y: f64,
    /// Where a smooth scroll is heading.
    scroll_target: Option<f64>,
    content_height: f64,
    show_cart: bool,
    /// Last rendered tab strip, kept for mouse hit-testing.
    tab_commands: Vec<RenderCommand>,
}

impl MenuApp {
    pub fn new(state: OrderState, content_height: f64) -> Self {
        // The tab strip sits outside the scrolled area, so nothing covers
        // the top of the menu.
        let config = TrackerConfig {
            header_offset: 0.0,
            ..TrackerConfig::default()
        };
        let listener = |id: &str| tracing::info!(category = id, "tab highlighted");
        let mut tracker = ActiveCategoryTracker::attach(config, ManualScheduler::new(), listener);
        let metrics = terminal_metrics();
        tracker.set_layout(menu_page::layout_menu(&state.menu, &metrics));

        Self {
            state,
            metrics,
            tracker,
            scroll_y: 0.0,
            scroll_target: None,
            content_height,
            show_cart: false,
            tab_commands: Vec::new(),
        }
    }

    pub fn active_category(&self) -> Option<&str> {
        self.tracker.active()
    }

    fn max_scroll(&self) -> f64 {
        (self.tracker.layout().content_bottom() - self.content_height).max(0.0)
    }

    fn set_scroll(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
        self.tracker.on_scroll(self.scroll_y);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_target = None;
        self.set_scroll(self.scroll_y + delta);
    }

    /// Tab tap / digit key: scroll so the category starts at the top.
    pub fn jump_to(&mut self, category_id: &str) -> bool {
        let Some(request) = self.tracker.scroll_to_category(category_id) else {
            return false;
        };
        self.apply(request);
        true
    }

    fn apply(&mut self, request: ScrollRequest) {
        let top = request.clamped_top(self.max_scroll());
        match request.behavior {
            ScrollBehavior::Instant => {
                self.scroll_target = None;
                self.set_scroll(top);
            }
            ScrollBehavior::Smooth => self.scroll_target = Some(top),
        }
    }

    /// Advance a smooth scroll by one step. Returns `true` while animating.
    pub fn step_animation(&mut self) -> bool {
        let Some(target) = self.scroll_target else {
            return false;
        };
        let distance = target - self.scroll_y;
        if distance.abs() <= 1.0 {
            self.scroll_target = None;
            self.set_scroll(target);
            return false;
        }
        let step = (distance / 3.0).abs().max(1.0).copysign(distance);
        self.set_scroll(self.scroll_y + step);
        true
    }

    /// Run the tracker's frame if one was requested since the last draw.
    pub fn frame(&mut self) {
        if self.tracker.scheduler_mut().take_pending() {
            self.tracker.on_frame();
        }
    }

    pub fn resize(&mut self, content_height: f64) {
        self.content_height = content_height;
        self.set_scroll(self.scroll_y);
    }

    fn focused_item(&self) -> Option<String> {
        menu_page::item_at(&self.state.menu, &self.metrics, self.scroll_y).map(|i| i.id.clone())
    }

    pub fn change_quantity(&mut self, increase: bool) {
        let Some(item) = self.focused_item() else {
            return;
        };
        self.state = if increase {
            self.state.increment(&item)
        } else {
            self.state.decrement(&item)
        };
    }

    fn next_category(&mut self, forward: bool) {
        let ids: Vec<String> = self.state.menu.category_ids().map(str::to_owned).collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .active_category()
            .and_then(|a| ids.iter().position(|id| id == a))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % ids.len()
        } else {
            (current + ids.len() - 1) % ids.len()
        };
        self.jump_to(&ids[next]);
    }

    fn cycle_payment(&mut self) {
        let all = PaymentMethod::ALL;
        let i = all
            .iter()
            .position(|m| *m == self.state.payment_method)
            .unwrap_or(0);
        self.state = self.state.with_payment_method(all[(i + 1) % all.len()]);
    }

    fn click(&mut self, column: u16, row: u16) {
        if row != 1 {
            return;
        }
        let point = Point::new(f64::from(column), 0.0);
        let target = self.tab_commands.iter().rev().find_map(|c| c.hit(point)).cloned();
        if let Some(HitTarget::CategoryTab(id)) = target {
            self.jump_to(&id);
        }
    }

    /// Handle one input event. Returns `false` when the app should exit.
    fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Esc if self.show_cart => self.show_cart = false,
                KeyCode::Esc => return false,
                KeyCode::Char('c') => self.show_cart = !self.show_cart,
                KeyCode::Char('p') if self.show_cart => self.cycle_payment(),
                KeyCode::Char('x') if self.show_cart => self.state = self.state.clear_cart(),
                KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1.0),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1.0),
                KeyCode::PageUp => self.scroll_by(-self.content_height),
                KeyCode::PageDown => self.scroll_by(self.content_height),
                KeyCode::Home => self.scroll_by(-self.scroll_y),
                KeyCode::End => self.scroll_by(self.max_scroll()),
                KeyCode::Tab | KeyCode::Right => self.next_category(true),
                KeyCode::BackTab | KeyCode::Left => self.next_category(false),
                KeyCode::Char('+') | KeyCode::Char('=') => self.change_quantity(true),
                KeyCode::Char('-') => self.change_quantity(false),
                KeyCode::Char(d @ '1'..='9') => {
                    let index = usize::from(d as u8 - b'1');
                    let id = self.state.menu.categories.get(index).map(|c| c.id.clone());
                    if let Some(id) = id {
                        self.jump_to(&id);
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => self.scroll_by(2.0),
                MouseEventKind::ScrollUp => self.scroll_by(-2.0),
                MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
                _ => {}
            },
            Event::Resize(_, height) => {
                self.resize(f64::from(height.saturating_sub(CHROME_TOP + CHROME_BOTTOM)));
            }
            _ => {}
        }
        true
    }

    fn title(&self) -> String {
        let focused = self
            .focused_item()
            .and_then(|id| self.state.menu.item(&id).map(|i| i.name.clone()))
            .unwrap_or_default();
        format!(
            " tabletop | {} / table {} | ↑↓ scroll | tab/1-9 category | +/- {} | c cart | q quit ",
            self.state.table.store_id, self.state.table.table_id, focused
        )
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let width = f64::from(area.width);

        let title = Block::default()
            .title(self.title())
            .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(title, Rect::new(area.x, area.y, area.width, 1));

        self.tab_commands =
            tabs::render_category_tabs(&self.state.menu, self.active_category(), width, 1.0);
        let content_rows = area.height.saturating_sub(CHROME_TOP + CHROME_BOTTOM);
        let content_area = Rect::new(area.x, area.y + CHROME_TOP, area.width, content_rows);
        let viewport = Viewport {
            y: self.scroll_y,
            width,
            height: f64::from(content_rows),
        };
        let page = menu_page::render_menu_page(
            &self.state.menu,
            &self.state.cart,
            &self.metrics,
            &viewport,
        );

        let bar_y = area.y + CHROME_TOP + content_rows;
        let bar_area = Rect::new(area.x, bar_y, area.width, CHROME_BOTTOM);
        let bar_viewport = Viewport {
            y: 0.0,
            width,
            height: f64::from(CHROME_BOTTOM),
        };
        let bar = cart_summary::render_cart_summary(
            self.state.total_amount(),
            self.state.total_item_count(),
            &bar_viewport,
            f64::from(CHROME_BOTTOM),
        );

        let buf = frame.buffer_mut();
        renderer::paint(buf, Rect::new(area.x, area.y + 1, area.width, 1), &self.tab_commands);
        renderer::paint(buf, content_area, &page);
        renderer::paint(buf, bar_area, &bar);

        if self.show_cart {
            self.draw_cart(frame, content_area);
        }
    }

    fn draw_cart(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line<'_>> = Vec::new();
        match self.state.checkout() {
            Ok(summary) => {
                lines.push(Line::from(format!("테이블 {}번", summary.table.table_id)));
                lines.push(Line::from(""));
                for line in &summary.lines {
                    lines.push(Line::from(format!(
                        "{} x{}  {}",
                        line.name,
                        line.quantity,
                        format_price(line.subtotal)
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(format!("총 {}개 상품", summary.item_count)));
                lines.push(Line::from(format!("배달료 {}", format_price(summary.delivery_fee))));
                lines.push(Line::from(format!("총 결제금액 {}", format_price(summary.total))));
                lines.push(Line::from(format!(
                    "결제 수단: {} (p 변경)",
                    summary.payment_method.label()
                )));
                lines.push(Line::from("x 비우기 | esc 닫기"));
            }
            Err(e) => {
                tracing::debug!(error = %e, "cart view without items");
                lines.push(Line::from("장바구니가 비어있습니다"));
                lines.push(Line::from("메뉴를 선택해 주세요"));
            }
        }

        let height = (lines.len() as u16 + 2).min(area.height);
        let width = area.width.saturating_sub(4).min(48);
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" 장바구니 ")),
            popup,
        );
    }
}

pub fn run(state: OrderState, focus: Option<&str>, show_cart: bool) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = MenuApp::new(
        state,
        f64::from(size.height.saturating_sub(CHROME_TOP + CHROME_BOTTOM)),
    );
    app.show_cart = show_cart;
    let category = focus
        .and_then(|id| app.state.menu.item(id))
        .map(|item| item.category.clone());
    if let Some(category) = category {
        app.jump_to(&category);
    }

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut MenuApp,
) -> Result<()> {
    loop {
        let animating = app.step_animation();
        app.frame();
        terminal.draw(|frame| app.draw(frame))?;

        let timeout = if animating {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        if event::poll(timeout)? && !app.handle(event::read()?) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_core::model::{MenuData, TableRoute};

    fn app() -> MenuApp {
        let state = OrderState::new(
            TableRoute::new("demo", "1"),
            MenuData::bundled().unwrap(),
        );
        let mut app = MenuApp::new(state, 10.0);
        app.frame();
        app
    }

    #[test]
    fn starts_on_first_category() {
        assert_eq!(app().active_category(), Some("beer"));
    }

    #[test]
    fn scrolling_moves_the_active_tab() {
        let mut app = app();
        // beer: heading + 3 two-row items + gap = 8 rows.
        app.scroll_by(8.0);
        app.frame();
        assert_eq!(app.active_category(), Some("soju"));
    }

    #[test]
    fn smooth_jump_animates_to_category() {
        let mut app = app();
        assert!(app.jump_to("soju"));
        let mut steps = 0;
        while app.step_animation() {
            steps += 1;
            assert!(steps < 100, "animation should settle");
        }
        app.frame();
        assert_eq!(app.active_category(), Some("soju"));
        assert!(!app.jump_to("wine"));
    }

    #[test]
    fn quantity_keys_edit_focused_item() {
        let mut app = app();
        app.change_quantity(true);
        app.change_quantity(true);
        app.change_quantity(false);
        assert_eq!(app.state.cart.quantity("cass-draft"), 1);
    }

    #[test]
    fn title_names_table_and_focused_item() {
        let title = app().title();
        assert!(title.starts_with(" tabletop | demo / table 1 | "));
        assert!(title.contains("+/- 카스 생맥주"));
    }

    #[test]
    fn payment_cycles_through_methods() {
        let mut app = app();
        let start = app.state.payment_method;
        for _ in 0..PaymentMethod::ALL.len() {
            app.cycle_payment();
        }
        assert_eq!(app.state.payment_method, start);
    }
}
