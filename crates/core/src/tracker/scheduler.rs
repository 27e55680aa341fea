/// Host hook for "run me before the next paint".
///
/// The tracker calls [`request_frame`](FrameScheduler::request_frame) at most
/// once per frame; the host answers by calling
/// [`ActiveCategoryTracker::on_frame`](super::ActiveCategoryTracker::on_frame)
/// from its frame callback (e.g. `requestAnimationFrame`, or the next turn of
/// a terminal draw loop).
pub trait FrameScheduler {
    fn request_frame(&mut self);

    /// Drop a previously requested frame. Hosts that cannot cancel may
    /// ignore this; the tracker treats a stale callback as a no-op.
    fn cancel_frame(&mut self) {}
}

/// Scheduler for hosts that drive frames themselves, and for tests.
///
/// It only records what the tracker asked for.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualScheduler {
    requested: usize,
    cancelled: usize,
    pending: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total frames requested since creation.
    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Whether a frame has been requested and not yet taken or cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request. Returns `true` if the host should run a
    /// frame now.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
        self.pending = true;
    }

    fn cancel_frame(&mut self) {
        if self.pending {
            self.cancelled += 1;
        }
        self.pending = false;
    }
}
