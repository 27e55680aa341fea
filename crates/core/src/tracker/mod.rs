//! Scroll-driven active-category tracking.
//!
//! The tracker maps a continuous scroll offset onto the category section that
//! is currently under the detection line and tells a listener whenever that
//! changes. Scroll notifications are coalesced: any number of them between two
//! frames results in one recomputation, using the latest offset.

mod layout;
mod scheduler;

pub use layout::{CategoryBounds, CategoryLayout, CategoryMeasurement};
pub use scheduler::{FrameScheduler, ManualScheduler};

use tabletop_protocol::ScrollRequest;
use tracing::{debug, trace};

use crate::config::TrackerConfig;

/// Receives the new active category id. Called at most once per frame and
/// only when the id differs from the last one reported.
pub trait ActiveCategoryListener {
    fn on_active_category_change(&mut self, category_id: &str);
}

impl<F: FnMut(&str)> ActiveCategoryListener for F {
    fn on_active_category_change(&mut self, category_id: &str) {
        self(category_id)
    }
}

pub struct ActiveCategoryTracker<S: FrameScheduler> {
    config: TrackerConfig,
    scheduler: S,
    listener: Option<Box<dyn ActiveCategoryListener>>,
    layout: CategoryLayout,
    /// Layout reported since the last recomputation. Swapped in whole at the
    /// start of the next pass.
    staged_layout: Option<CategoryLayout>,
    scroll_y: f64,
    frame_pending: bool,
    active: Option<String>,
}

impl<S: FrameScheduler> ActiveCategoryTracker<S> {
    /// Start tracking with `listener`. Nothing is reported until a layout
    /// has been supplied and a frame has run.
    pub fn attach(
        config: TrackerConfig,
        scheduler: S,
        listener: impl ActiveCategoryListener + 'static,
    ) -> Self {
        Self {
            config,
            scheduler,
            listener: Some(Box::new(listener)),
            layout: CategoryLayout::default(),
            staged_layout: None,
            scroll_y: 0.0,
            frame_pending: false,
            active: None,
        }
    }

    /// Stop observing: release the listener and cancel any scheduled frame.
    /// Safe to call any number of times.
    pub fn detach(&mut self) {
        if self.frame_pending {
            self.scheduler.cancel_frame();
            self.frame_pending = false;
        }
        if self.listener.take().is_some() {
            debug!("active-category tracker detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Last category reported to the listener, or `None` when no layout has
    /// been measured yet (or the layout became empty).
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Layout the next pass will use: the staged one if a change is pending.
    pub fn layout(&self) -> &CategoryLayout {
        self.staged_layout.as_ref().unwrap_or(&self.layout)
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Record a new layout after content or size changed. Cached offsets are
    /// replaced before the next decision; a frame is requested so the active
    /// category follows the reflow even without further scrolling.
    pub fn set_layout(&mut self, layout: CategoryLayout) {
        debug!(categories = layout.len(), "category layout changed");
        self.staged_layout = Some(layout);
        self.schedule();
    }

    /// Scroll notification from the host. Only the latest offset matters.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        if !self.is_attached() || scroll_y.is_nan() {
            return;
        }
        self.scroll_y = scroll_y.max(0.0);
        trace!(scroll_y = self.scroll_y, coalesced = self.frame_pending, "scroll");
        self.schedule();
    }

    /// Frame callback from the host. Recomputes once and notifies the
    /// listener on change. Returns `true` if the listener was called.
    ///
    /// A callback that arrives after [`detach`](Self::detach), or without a
    /// pending request, does nothing.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;

        let Some(listener) = self.listener.as_mut() else {
            return false;
        };

        if let Some(layout) = self.staged_layout.take() {
            self.layout = layout;
        }
        if self.layout.is_empty() {
            self.active = None;
            return false;
        }

        let line = self.scroll_y + self.config.detection_inset;
        let Some(found) = self.layout.detect(line) else {
            return false;
        };
        if self.active.as_deref() == Some(found.id.as_str()) {
            return false;
        }

        debug!(category = %found.id, line, "active category changed");
        listener.on_active_category_change(&found.id);
        self.active = Some(found.id.clone());
        true
    }

    /// Where the viewport should go so that `category_id` sits just below
    /// the sticky header. `None` when the category is not in the layout.
    pub fn scroll_to_category(&self, category_id: &str) -> Option<ScrollRequest> {
        let Some(bounds) = self.layout().get(category_id) else {
            debug!(category = category_id, "scroll target not found");
            return None;
        };
        Some(ScrollRequest {
            top: bounds.top - self.config.header_offset,
            behavior: self.config.scroll_behavior(),
        })
    }

    fn schedule(&mut self) {
        if self.frame_pending || !self.is_attached() {
            return;
        }
        self.frame_pending = true;
        self.scheduler.request_frame();
    }
}

impl<S: FrameScheduler> Drop for ActiveCategoryTracker<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use tabletop_protocol::ScrollBehavior;

    type Calls = Rc<RefCell<Vec<String>>>;

    fn pub_layout() -> CategoryLayout {
        CategoryLayout::new([
            CategoryBounds::new("beer", 0.0, 400.0),
            CategoryBounds::new("soju", 400.0, 900.0),
            CategoryBounds::new("food", 900.0, 2000.0),
        ])
    }

    fn tracker() -> (ActiveCategoryTracker<ManualScheduler>, Calls) {
        let calls: Calls = Rc::default();
        let sink = Rc::clone(&calls);
        let tracker = ActiveCategoryTracker::attach(
            TrackerConfig::default(),
            ManualScheduler::new(),
            move |id: &str| sink.borrow_mut().push(id.to_owned()),
        );
        (tracker, calls)
    }

    /// Run the frame the host would run, if one was requested.
    fn tick(tracker: &mut ActiveCategoryTracker<ManualScheduler>) -> bool {
        tracker.scheduler_mut().take_pending() && tracker.on_frame()
    }

    #[test]
    fn pub_menu_scenario() {
        let (mut t, calls) = tracker();
        t.set_layout(pub_layout());

        t.on_scroll(350.0);
        tick(&mut t);
        assert_eq!(t.active(), Some("beer"));

        t.on_scroll(450.0);
        tick(&mut t);
        assert_eq!(t.active(), Some("soju"));

        t.on_scroll(2500.0);
        tick(&mut t);
        assert_eq!(t.active(), Some("food"));

        assert_eq!(*calls.borrow(), ["beer", "soju", "food"]);
    }

    #[test]
    fn burst_within_one_frame_notifies_once() {
        let (mut t, calls) = tracker();
        t.set_layout(pub_layout());
        // The layout change already requested a frame; scrolls coalesce into it.
        for y in [350.0, 360.0, 370.0] {
            t.on_scroll(y);
        }
        assert_eq!(t.scheduler().requested(), 1);
        assert!(tick(&mut t));
        assert_eq!(*calls.borrow(), ["beer"]);

        // Same category again: frames run but nobody is told.
        for y in [380.0, 390.0] {
            t.on_scroll(y);
        }
        assert!(!tick(&mut t));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn burst_uses_latest_position() {
        let (mut t, calls) = tracker();
        t.set_layout(pub_layout());
        t.on_scroll(100.0);
        t.on_scroll(950.0);
        tick(&mut t);
        assert_eq!(*calls.borrow(), ["food"]);
    }

    #[test]
    fn flag_clears_only_after_frame_runs() {
        let (mut t, _) = tracker();
        t.set_layout(pub_layout());
        assert!(t.is_frame_pending());
        t.on_scroll(10.0);
        assert_eq!(t.scheduler().requested(), 1);
        tick(&mut t);
        assert!(!t.is_frame_pending());
        t.on_scroll(20.0);
        assert_eq!(t.scheduler().requested(), 2);
    }

    #[test]
    fn empty_layout_reports_none() {
        let (mut t, calls) = tracker();
        t.set_layout(CategoryLayout::default());
        t.on_scroll(300.0);
        assert!(!tick(&mut t));
        assert_eq!(t.active(), None);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn detach_cancels_scheduled_frame() {
        let (mut t, calls) = tracker();
        t.set_layout(pub_layout());
        t.on_scroll(500.0);
        t.detach();
        assert_eq!(t.scheduler().cancelled(), 1);

        // A host that could not cancel still delivers the callback.
        assert!(!t.on_frame());
        assert!(calls.borrow().is_empty());

        // Idempotent, and later scrolls are not observed.
        t.detach();
        t.on_scroll(1000.0);
        assert!(!t.is_frame_pending());
        assert_eq!(t.scheduler().requested(), 1);
        assert_eq!(t.scheduler().cancelled(), 1);
    }

    #[test]
    fn layout_change_applies_before_next_decision() {
        let (mut t, calls) = tracker();
        t.set_layout(pub_layout());
        t.on_scroll(450.0);
        tick(&mut t);
        assert_eq!(t.active(), Some("soju"));

        // Beer grows (more items loaded): 450 now falls inside beer.
        t.set_layout(CategoryLayout::new([
            CategoryBounds::new("beer", 0.0, 600.0),
            CategoryBounds::new("soju", 600.0, 1100.0),
            CategoryBounds::new("food", 1100.0, 2200.0),
        ]));
        tick(&mut t);
        assert_eq!(*calls.borrow(), ["soju", "beer"]);
    }

    #[test]
    fn negative_scroll_is_clamped() {
        let (mut t, calls) = tracker();
        t.set_layout(pub_layout());
        t.on_scroll(-40.0);
        tick(&mut t);
        assert_eq!(t.scroll_y(), 0.0);
        assert_eq!(*calls.borrow(), ["beer"]);
    }

    #[test]
    fn detection_inset_shifts_the_line() {
        let calls: Calls = Rc::default();
        let sink = Rc::clone(&calls);
        let config = TrackerConfig {
            detection_inset: 120.0,
            ..TrackerConfig::default()
        };
        let mut t = ActiveCategoryTracker::attach(config, ManualScheduler::new(), move |id: &str| {
            sink.borrow_mut().push(id.to_owned())
        });
        t.set_layout(pub_layout());
        t.on_scroll(300.0);
        tick(&mut t);
        assert_eq!(*calls.borrow(), ["soju"]);
    }

    #[test]
    fn scroll_to_known_category() {
        let (mut t, _) = tracker();
        t.set_layout(pub_layout());
        let req = t.scroll_to_category("soju");
        assert_eq!(
            req,
            Some(ScrollRequest {
                top: 400.0 - 120.0,
                behavior: ScrollBehavior::Smooth,
            })
        );
        assert_eq!(t.scroll_to_category("beer").map(|r| r.top), Some(-120.0));
    }

    #[test]
    fn scroll_to_unknown_category_is_not_found() {
        let (mut t, _) = tracker();
        assert_eq!(t.scroll_to_category("beer"), None);
        t.set_layout(pub_layout());
        assert_eq!(t.scroll_to_category("wine"), None);
    }
}
