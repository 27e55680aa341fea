//! Integration test: measure the bundled menu page, drive an active-category
//! tracker with scroll events, and jump between categories the way the tab
//! strip does.

use std::cell::RefCell;
use std::rc::Rc;

use tabletop_core::config::TrackerConfig;
use tabletop_core::model::{MenuData, OrderState, TableRoute};
use tabletop_core::tracker::{ActiveCategoryTracker, ManualScheduler};
use tabletop_core::views::menu_page::{PageMetrics, layout_menu};

type Calls = Rc<RefCell<Vec<String>>>;

fn attach(config: TrackerConfig) -> (ActiveCategoryTracker<ManualScheduler>, Calls) {
    let calls: Calls = Rc::default();
    let sink = Rc::clone(&calls);
    let tracker = ActiveCategoryTracker::attach(config, ManualScheduler::new(), move |id: &str| {
        sink.borrow_mut().push(id.to_owned())
    });
    (tracker, calls)
}

fn run_frame(tracker: &mut ActiveCategoryTracker<ManualScheduler>) {
    if tracker.scheduler_mut().take_pending() {
        tracker.on_frame();
    }
}

#[test]
fn tabs_follow_scrolling_through_the_menu() {
    let menu = MenuData::bundled().expect("bundled menu should parse");
    let metrics = PageMetrics::default();
    let layout = layout_menu(&menu, &metrics);

    let (mut tracker, calls) = attach(TrackerConfig::default());
    tracker.set_layout(layout.clone());
    run_frame(&mut tracker);
    assert_eq!(tracker.active(), Some("beer"));

    // Scroll down a few pixels at a time, one frame every 8 events.
    let end = layout.content_bottom() + 500.0;
    let mut y = 0.0;
    let mut events = 0;
    while y < end {
        tracker.on_scroll(y);
        events += 1;
        if events % 8 == 0 {
            run_frame(&mut tracker);
        }
        y += 3.0;
    }
    run_frame(&mut tracker);

    assert_eq!(*calls.borrow(), ["beer", "soju", "food"]);
    assert!(tracker.scheduler().requested() < events);
}

#[test]
fn scroll_to_lands_category_under_the_header() {
    let menu = MenuData::bundled().expect("bundled menu should parse");
    let metrics = PageMetrics {
        content_top: 120.0,
        ..PageMetrics::default()
    };
    // Detection line sits at the bottom edge of the sticky header, so a
    // jump from the tab strip highlights the tab that was tapped.
    let config = TrackerConfig {
        header_offset: 120.0,
        detection_inset: 120.0,
        smooth_scroll: false,
    };
    let (mut tracker, calls) = attach(config);
    tracker.set_layout(layout_menu(&menu, &metrics));

    for id in ["food", "beer", "soju"] {
        let request = tracker
            .scroll_to_category(id)
            .expect("known category should be scrollable");
        tracker.on_scroll(request.top);
        run_frame(&mut tracker);
        assert_eq!(tracker.active(), Some(id));
    }
    assert_eq!(*calls.borrow(), ["food", "beer", "soju"]);
    assert!(tracker.scroll_to_category("wine").is_none());
}

#[test]
fn reflow_after_menu_change_is_picked_up() {
    let menu = MenuData::bundled().expect("bundled menu should parse");
    let metrics = PageMetrics::default();
    let (mut tracker, calls) = attach(TrackerConfig::default());
    tracker.set_layout(layout_menu(&menu, &metrics));

    let soju_top = tracker.layout().get("soju").map_or(0.0, |b| b.top);
    tracker.on_scroll(soju_top + 1.0);
    run_frame(&mut tracker);
    assert_eq!(tracker.active(), Some("soju"));

    // Drop the beer section: the same offset now lands in food.
    let mut trimmed = menu.clone();
    trimmed.categories.retain(|c| c.id != "beer");
    tracker.set_layout(layout_menu(&trimmed, &metrics));
    run_frame(&mut tracker);
    assert_eq!(*calls.borrow(), ["soju", "food"]);
}

#[test]
fn order_state_and_tracker_share_the_menu() {
    let menu = MenuData::bundled().expect("bundled menu should parse");
    let state = OrderState::new(TableRoute::new("demo", "5"), menu)
        .increment("pork-belly")
        .increment("chamisul")
        .increment("chamisul");
    assert_eq!(state.total_amount(), 15_000 + 2 * 4000);

    let summary = state.checkout().expect("non-empty cart should check out");
    assert_eq!(summary.item_count, 3);
    assert_eq!(summary.lines[0].item_id, "chamisul");
}
