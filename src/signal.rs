//! # Signal Module
//!
//! Explicit subscription plumbing between the scroll source and the presentation layer.
//!
//! ## Key Types
//! - `ProgressSignal`: Holds the current `ScrollProgress` and notifies subscribers on change.
//! - `StageDriver`: Tracker, signal and rig wired together; pushes a
//!   `VisualParameterSet` to its frame listeners on every progress change.
//!
//! Everything here is single-threaded; callbacks run synchronously inside `set`/`scroll_to`.

use crate::rig::{CurveRig, VisualParameterSet};
use crate::scroll::{ScrollProgress, ScrollTracker};
use tracing::trace;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(Subscription, Box<dyn FnMut(&T)>)>,
}

impl<T> Listeners<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, callback: Box<dyn FnMut(&T)>) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    fn remove(&mut self, id: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    fn notify(&mut self, value: &T) {
        for (_, callback) in self.entries.iter_mut() {
            callback(value);
        }
    }
}

/// The current scroll progress plus the callbacks observing it.
pub struct ProgressSignal {
    current: ScrollProgress,
    listeners: Listeners<ScrollProgress>,
}

impl ProgressSignal {
    pub fn new(initial: ScrollProgress) -> Self {
        Self {
            current: initial,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self) -> ScrollProgress {
        self.current
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ScrollProgress) + 'static) -> Subscription {
        self.listeners.add(Box::new(callback))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        self.listeners.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.entries.len()
    }

    /// Stores `progress` and notifies subscribers. Returns `false` when the value did not change.
    pub fn set(&mut self, progress: impl Into<ScrollProgress>) -> bool {
        let progress = progress.into();
        if progress == self.current {
            return false;
        }
        self.current = progress;
        trace!(%progress, "progress changed");
        self.listeners.notify(&progress);
        true
    }
}

impl Default for ProgressSignal {
    fn default() -> Self {
        Self::new(ScrollProgress::START)
    }
}

/// Scroll offsets in, parameter sets out.
pub struct StageDriver {
    tracker: ScrollTracker,
    rig: CurveRig,
    progress: ProgressSignal,
    frame: VisualParameterSet,
    frame_listeners: Listeners<VisualParameterSet>,
}

impl StageDriver {
    pub fn new(tracker: ScrollTracker, rig: CurveRig) -> Self {
        let frame = rig.evaluate(ScrollProgress::START);
        Self {
            tracker,
            rig,
            progress: ProgressSignal::default(),
            frame,
            frame_listeners: Listeners::new(),
        }
    }

    /// Registers a frame listener. It is called immediately with the current frame,
    /// then again after every progress change.
    pub fn on_frame(
        &mut self,
        mut callback: impl FnMut(&VisualParameterSet) + 'static,
    ) -> Subscription {
        callback(&self.frame);
        self.frame_listeners.add(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        self.frame_listeners.remove(id)
    }

    /// Raw progress observers, notified before frame listeners.
    pub fn progress_signal(&mut self) -> &mut ProgressSignal {
        &mut self.progress
    }

    pub fn frame(&self) -> &VisualParameterSet {
        &self.frame
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    /// The page layout changed (resize, content reflow).
    pub fn set_tracker(&mut self, tracker: ScrollTracker, scroll_y: f64) -> bool {
        self.tracker = tracker;
        self.scroll_to(scroll_y)
    }

    /// Feeds a new document scroll offset. Returns `true` if a new frame was emitted.
    pub fn scroll_to(&mut self, scroll_y: f64) -> bool {
        let progress = self.tracker.progress(scroll_y);
        self.set_progress(progress)
    }

    /// Feeds progress directly, bypassing the tracker.
    pub fn set_progress(&mut self, progress: impl Into<ScrollProgress>) -> bool {
        if !self.progress.set(progress) {
            return false;
        }
        self.frame = self.rig.evaluate(self.progress.get());
        self.frame_listeners.notify(&self.frame);
        true
    }
}
