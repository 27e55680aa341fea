use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tabletop_core::config::TrackerConfig;
use tabletop_core::model::{Cart, MenuData};
use tabletop_core::tracker::{
    ActiveCategoryListener, ActiveCategoryTracker, CategoryLayout, CategoryMeasurement,
    ManualScheduler,
};
use tabletop_core::views::menu_page::{self, PageMetrics};
use tabletop_protocol::Viewport;
use thiserror::Error;
use wasm_bindgen::prelude::*;

type Tracker = ActiveCategoryTracker<ManualScheduler>;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
enum BridgeError {
    #[error("invalid tracker handle {0}")]
    InvalidHandle(usize),
    #[error("tracker {0} is busy notifying its listener")]
    Busy(usize),
    #[error("tracker table is in use")]
    TableBusy,
}

/// One live tracker plus the last exception its JS listener threw.
struct TrackerSlot {
    tracker: RefCell<Tracker>,
    listener_error: Rc<Cell<Option<JsValue>>>,
}

impl TrackerSlot {
    fn new(tracker: Tracker, listener_error: Rc<Cell<Option<JsValue>>>) -> Self {
        Self {
            tracker: RefCell::new(tracker),
            listener_error,
        }
    }
}

// Trackers hold JS callbacks, which are not `Send`; wasm32 is single-threaded.
// The table is only borrowed to look a slot up, never while a listener runs,
// so listeners may create or destroy trackers.
thread_local! {
    static TRACKERS: RefCell<Vec<Option<Rc<TrackerSlot>>>> = const { RefCell::new(Vec::new()) };
}

/// Forwards active-category changes to a JS function `(id: string) => void`.
struct JsListener {
    function: js_sys::Function,
    last_error: Rc<Cell<Option<JsValue>>>,
}

impl ActiveCategoryListener for JsListener {
    fn on_active_category_change(&mut self, category_id: &str) {
        // The tracker keeps running; the exception waits for `take_listener_error`.
        if let Err(err) = self
            .function
            .call1(&JsValue::NULL, &JsValue::from_str(category_id))
        {
            self.last_error.set(Some(err));
        }
    }
}

fn insert_slot(slot: TrackerSlot) -> Result<usize, BridgeError> {
    TRACKERS.with(|trackers| {
        let mut trackers = trackers
            .try_borrow_mut()
            .map_err(|_| BridgeError::TableBusy)?;
        let slot = Rc::new(slot);
        let handle = match trackers.iter().position(Option::is_none) {
            Some(free) => {
                trackers[free] = Some(slot);
                free
            }
            None => {
                trackers.push(Some(slot));
                trackers.len() - 1
            }
        };
        Ok(handle)
    })
}

fn lookup(handle: usize) -> Result<Rc<TrackerSlot>, BridgeError> {
    TRACKERS.with(|trackers| {
        let trackers = trackers.try_borrow().map_err(|_| BridgeError::TableBusy)?;
        trackers
            .get(handle)
            .and_then(Option::as_ref)
            .cloned()
            .ok_or(BridgeError::InvalidHandle(handle))
    })
}

fn with_tracker<T>(handle: usize, f: impl FnOnce(&mut Tracker) -> T) -> Result<T, BridgeError> {
    let slot = lookup(handle)?;
    // Fails only when a listener calls back into its own tracker.
    let mut tracker = slot
        .tracker
        .try_borrow_mut()
        .map_err(|_| BridgeError::Busy(handle))?;
    let out = f(&mut tracker);
    Ok(out)
}

/// Take a tracker out of the table and detach it. `false` for an unknown or
/// already removed handle.
fn remove_slot(handle: usize) -> Result<bool, BridgeError> {
    let removed = TRACKERS.with(|trackers| {
        let mut trackers = trackers
            .try_borrow_mut()
            .map_err(|_| BridgeError::TableBusy)?;
        Ok(trackers.get_mut(handle).and_then(Option::take))
    })?;
    let Some(slot) = removed else {
        return Ok(false);
    };
    // Called from its own listener, the tracker is still borrowed by
    // `on_frame`; it detaches on drop when that call releases the slot.
    if let Ok(mut tracker) = slot.tracker.try_borrow_mut() {
        tracker.detach();
    }
    Ok(true)
}

/// Whether the host should schedule `requestAnimationFrame(() => on_frame(handle))`.
fn frame_requested(tracker: &mut Tracker) -> bool {
    tracker.scheduler_mut().take_pending()
}

/// Create a tracker for a mounted menu page. Returns a handle for later calls.
///
/// `config_json` may be empty to use the defaults. The default
/// `detection_inset` is 0: the detection line is the scroll offset itself, so
/// after a jump (which lands `header_offset` above the category) the previous
/// tab can stay highlighted. Pages that want the jumped-to tab highlighted
/// pass the same value for both, e.g.
/// `{"header_offset": 120, "detection_inset": 120}`.
#[wasm_bindgen]
pub fn create_tracker(config_json: &str, listener: js_sys::Function) -> Result<usize, JsError> {
    let config = if config_json.trim().is_empty() {
        TrackerConfig::default()
    } else {
        TrackerConfig::from_json(config_json.as_bytes())
            .map_err(|e| JsError::new(&e.to_string()))?
    };
    let listener_error = Rc::new(Cell::new(None));
    let listener = JsListener {
        function: listener,
        last_error: Rc::clone(&listener_error),
    };
    let tracker = ActiveCategoryTracker::attach(config, ManualScheduler::new(), listener);
    Ok(insert_slot(TrackerSlot::new(tracker, listener_error))?)
}

/// Report measured category sections: `[{ "id", "top", "bottom" }, ...]`.
/// Sections without `top`/`bottom` are skipped. Returns whether a frame
/// should be scheduled.
#[wasm_bindgen]
pub fn set_layout(handle: usize, measurements_json: &str) -> Result<bool, JsError> {
    let measurements: Vec<CategoryMeasurement> =
        serde_json::from_str(measurements_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(with_tracker(handle, |tracker| {
        tracker.set_layout(CategoryLayout::from_measurements(measurements));
        frame_requested(tracker)
    })?)
}

/// Scroll listener body. Returns whether a frame should be scheduled.
#[wasm_bindgen]
pub fn on_scroll(handle: usize, scroll_y: f64) -> Result<bool, JsError> {
    Ok(with_tracker(handle, |tracker| {
        tracker.on_scroll(scroll_y);
        frame_requested(tracker)
    })?)
}

/// Animation-frame callback. Returns the new active category if the
/// listener was notified during this frame.
#[wasm_bindgen]
pub fn on_frame(handle: usize) -> Result<Option<String>, JsError> {
    Ok(with_tracker(handle, run_frame)?)
}

fn run_frame(tracker: &mut Tracker) -> Option<String> {
    if tracker.on_frame() {
        tracker.active().map(str::to_owned)
    } else {
        None
    }
}

/// Scroll request as JSON (`{ "top", "behavior" }`) for `window.scrollTo`,
/// or `undefined` when the category is unknown.
#[wasm_bindgen]
pub fn scroll_to_category(handle: usize, category_id: &str) -> Result<Option<String>, JsError> {
    with_tracker(handle, |tracker| tracker.scroll_to_category(category_id))?
        .map(|req| serde_json::to_string(&req).map_err(|e| JsError::new(&e.to_string())))
        .transpose()
}

#[wasm_bindgen]
pub fn active_category(handle: usize) -> Result<Option<String>, JsError> {
    Ok(with_tracker(handle, |tracker| {
        tracker.active().map(str::to_owned)
    })?)
}

/// The exception the tracker's listener last threw, or `undefined`. Clears it.
#[wasm_bindgen]
pub fn take_listener_error(handle: usize) -> Result<JsValue, JsError> {
    Ok(take_error(handle)?.unwrap_or(JsValue::UNDEFINED))
}

fn take_error(handle: usize) -> Result<Option<JsValue>, BridgeError> {
    Ok(lookup(handle)?.listener_error.take())
}

/// Detach and free a tracker on unmount. Unknown or already destroyed
/// handles are ignored. Safe to call from inside the tracker's own listener.
#[wasm_bindgen]
pub fn destroy_tracker(handle: usize) -> Result<(), JsError> {
    remove_slot(handle)?;
    Ok(())
}

/// The bundled menu as JSON.
#[wasm_bindgen]
pub fn default_menu_json() -> Result<String, JsError> {
    let menu = MenuData::bundled().map_err(|e| JsError::new(&e.to_string()))?;
    serde_json::to_string(&menu).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_metrics(metrics_json: &str) -> Result<PageMetrics, JsError> {
    if metrics_json.trim().is_empty() {
        return Ok(PageMetrics::default());
    }
    serde_json::from_str(metrics_json).map_err(|e| JsError::new(&e.to_string()))
}

/// Measure a menu page laid out with `metrics_json` (empty for defaults),
/// returning `[{ "id", "top", "bottom" }, ...]`.
#[wasm_bindgen]
pub fn layout_menu(menu_json: &str, metrics_json: &str) -> Result<String, JsError> {
    let menu =
        MenuData::from_json(menu_json.as_bytes()).map_err(|e| JsError::new(&e.to_string()))?;
    let metrics = parse_metrics(metrics_json)?;
    let layout = menu_page::layout_menu(&menu, &metrics);
    let bounds: Vec<_> = layout.iter().collect();
    serde_json::to_string(&bounds).map_err(|e| JsError::new(&e.to_string()))
}

/// Render the visible part of the menu page as JSON render commands.
#[wasm_bindgen]
pub fn render_menu(
    menu_json: &str,
    cart_json: &str,
    metrics_json: &str,
    scroll_y: f64,
    width: f64,
    height: f64,
) -> Result<String, JsError> {
    let menu =
        MenuData::from_json(menu_json.as_bytes()).map_err(|e| JsError::new(&e.to_string()))?;
    let cart: Cart = if cart_json.trim().is_empty() {
        Cart::new()
    } else {
        serde_json::from_str(cart_json).map_err(|e| JsError::new(&e.to_string()))?
    };
    let metrics = parse_metrics(metrics_json)?;
    let viewport = Viewport::new(scroll_y, width, height);
    let commands = menu_page::render_menu_page(&menu, &cart, &metrics, &viewport);
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}
