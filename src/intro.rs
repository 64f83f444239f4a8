//! # Intro Module
//!
//! The mount-time intro overlay.
//!
//! ## Responsibilities
//! - **State Machine**: `Visible` until the dismissal delay elapses, then `Dismissed`.
//! - **Line Timeline**: Each intro line fades 0 → 1 → 0 over one second, staggered by one second.
//! - **Overlay Exit**: The overlay fades out after dismissal.
//! - **Dismiss Timer**: A one-shot background timer, cancelled when its guard is dropped.

use crate::animation::{Animated, EasingType};
use crate::script::NarrativeScript;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Length of the scripted intro.
pub const INTRO_DURATION: Duration = Duration::from_millis(3000);
/// Extra time the last line gets before the overlay leaves.
pub const DISMISS_GRACE: Duration = Duration::from_millis(400);
/// Time each intro line takes to fade in and back out.
pub const LINE_DURATION: f64 = 1.0;
/// Delay between the starts of consecutive intro lines.
pub const LINE_STAGGER: f64 = 1.0;
/// Duration of the overlay exit fade.
pub const OVERLAY_FADE: f64 = 0.8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntroState {
    Visible,
    Dismissed,
}

/// Drives the intro overlay from elapsed time since mount.
#[derive(Debug)]
pub struct IntroSequencer {
    state: IntroState,
    dismiss_after: Duration,
    dismissed_at: Option<Duration>,
    lines: Vec<Animated<f32>>,
    overlay_exit: Animated<f32>,
}

impl IntroSequencer {
    /// A sequencer for `line_count` intro lines.
    pub fn new(line_count: usize) -> Self {
        let lines = (0..line_count)
            .map(|index| {
                let mut line = Animated::new(0.0f32);
                line.hold(index as f64 * LINE_STAGGER);
                line.add_keyframe(1.0, LINE_DURATION / 2.0, EasingType::EaseInOut);
                line.add_keyframe(0.0, LINE_DURATION / 2.0, EasingType::EaseInOut);
                line
            })
            .collect();

        let mut overlay_exit = Animated::new(1.0f32);
        overlay_exit.add_keyframe(0.0, OVERLAY_FADE, EasingType::EaseOut);

        Self {
            state: IntroState::Visible,
            dismiss_after: INTRO_DURATION + DISMISS_GRACE,
            dismissed_at: None,
            lines,
            overlay_exit,
        }
    }

    pub fn for_script(script: &NarrativeScript) -> Self {
        Self::new(script.intro_sequence.len())
    }

    pub fn state(&self) -> IntroState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == IntroState::Visible
    }

    /// Delay from mount until the overlay is dismissed.
    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Moves the clock to `elapsed` since mount. Returns the new state if it changed.
    pub fn advance(&mut self, elapsed: Duration) -> Option<IntroState> {
        if self.state == IntroState::Visible && elapsed >= self.dismiss_after {
            self.dismiss(self.dismiss_after);
            return Some(IntroState::Dismissed);
        }
        None
    }

    /// Dismisses the intro at `at` (since mount). A second call has no effect.
    pub fn dismiss(&mut self, at: Duration) {
        if self.state == IntroState::Dismissed {
            return;
        }
        self.state = IntroState::Dismissed;
        self.dismissed_at = Some(at);
        debug!(at_ms = at.as_millis() as u64, "intro dismissed");
    }

    /// Opacity of intro line `index` at `elapsed` since mount. Unknown lines are invisible.
    pub fn line_opacity(&self, index: usize, elapsed: Duration) -> f32 {
        self.lines
            .get(index)
            .map(|line| line.sample(elapsed.as_secs_f64()))
            .unwrap_or(0.0)
    }

    /// Opacity of the whole overlay at `elapsed` since mount.
    pub fn overlay_opacity(&self, elapsed: Duration) -> f32 {
        match self.dismissed_at {
            None => 1.0,
            Some(at) if elapsed <= at => 1.0,
            Some(at) => self.overlay_exit.sample((elapsed - at).as_secs_f64()),
        }
    }

    /// Time after which nothing of the overlay remains, once dismissed.
    pub fn fully_gone_at(&self) -> Option<Duration> {
        self.dismissed_at
            .map(|at| at + Duration::from_secs_f64(OVERLAY_FADE))
    }

    /// Starts the background dismissal timer for this sequencer's delay.
    pub fn arm(&self, on_dismiss: impl FnOnce() + Send + 'static) -> DismissTimer {
        DismissTimer::start(self.dismiss_after, on_dismiss)
    }
}

/// A one-shot timer that runs a callback after a delay.
///
/// Dropping the timer cancels it. Once `drop` (or [`DismissTimer::cancel`]) returns the
/// callback is neither running nor going to run.
#[derive(Debug)]
pub struct DismissTimer {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<bool>>,
}

impl DismissTimer {
    pub fn start(delay: Duration, on_fire: impl FnOnce() + Send + 'static) -> Self {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        let handle = thread::spawn(move || match cancel_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {
                on_fire();
                true
            }
            // Cancelled explicitly or the guard was dropped.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        });

        debug!(delay_ms = delay.as_millis() as u64, "dismiss timer armed");
        Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    /// Cancels the timer. Returns `true` if the callback had already fired.
    pub fn cancel(mut self) -> bool {
        self.shutdown()
    }

    /// Blocks until the timer fires. Returns `true` if the callback ran.
    pub fn wait(mut self) -> bool {
        // Keep the sender alive so the thread is not woken early.
        let fired = self
            .handle
            .take()
            .map(|h| h.join().unwrap_or(false))
            .unwrap_or(false);
        self.cancel = None;
        fired
    }

    fn shutdown(&mut self) -> bool {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.try_send(());
        }
        let fired = self
            .handle
            .take()
            .map(|h| h.join().unwrap_or(false))
            .unwrap_or(false);
        if !fired {
            info!("dismiss timer cancelled");
        }
        fired
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}
