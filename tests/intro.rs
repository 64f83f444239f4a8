//! Intro Sequencer Tests
//!
//! Overlay state, line timeline and the cancellable dismissal timer.

use impulse_engine::intro::{DISMISS_GRACE, INTRO_DURATION};
use impulse_engine::{DismissTimer, IntroSequencer, IntroState, NarrativeScript};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn dismisses_after_intro_plus_grace() {
    let mut intro = IntroSequencer::for_script(NarrativeScript::builtin());
    assert_eq!(intro.dismiss_after(), INTRO_DURATION + DISMISS_GRACE);
    assert_eq!(intro.dismiss_after(), ms(3400));

    assert!(intro.is_visible());
    intro.advance(ms(3000));
    assert_eq!(intro.state(), IntroState::Visible);
    intro.advance(ms(3400));
    assert_eq!(intro.state(), IntroState::Dismissed);
}

#[test]
fn lines_fade_in_and_out_in_turn() {
    let intro = IntroSequencer::for_script(NarrativeScript::builtin());
    assert_eq!(intro.line_count(), 3);

    // Each line peaks half a second after it starts.
    for (i, start) in [0u64, 1000, 2000].into_iter().enumerate() {
        assert!(intro.line_opacity(i, ms(start)) < 1e-3, "line {} before start", i);
        assert!(
            (intro.line_opacity(i, ms(start + 500)) - 1.0).abs() < 1e-3,
            "line {} at peak",
            i
        );
        assert!(intro.line_opacity(i, ms(start + 1000)) < 1e-3, "line {} after end", i);
    }

    // Fades are eased in both directions.
    for (i, start) in [0u64, 1000, 2000].into_iter().enumerate() {
        let rising = intro.line_opacity(i, ms(start + 125));
        assert!(rising > 0.0 && rising < 0.25, "line {} eased in: {}", i, rising);
        let falling = intro.line_opacity(i, ms(start + 625));
        assert!(falling > 0.75 && falling < 1.0, "line {} eased out: {}", i, falling);
    }

    // Line 2 has not started while line 1 is at its peak.
    assert!(intro.line_opacity(1, ms(500)) < 1e-3);
}

#[test]
fn overlay_fades_after_dismissal() {
    let mut intro = IntroSequencer::new(3);
    assert_eq!(intro.overlay_opacity(ms(3600)), 1.0);

    intro.advance(ms(3400));
    assert_eq!(intro.overlay_opacity(ms(3400)), 1.0);
    let mid = intro.overlay_opacity(ms(3800));
    assert!(mid > 0.0 && mid < 1.0, "mid fade {}", mid);
    // Ease-out drops faster than linear at the start of the exit.
    let early = intro.overlay_opacity(ms(3600));
    assert!(early < 0.75, "early fade {}", early);
    assert!(intro.overlay_opacity(ms(4200)) < 1e-3);
    assert_eq!(intro.fully_gone_at(), Some(ms(4200)));
}

#[test]
fn timer_fires_after_delay() {
    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    let timer = DismissTimer::start(ms(20), move || flag.store(true, Ordering::SeqCst));
    assert!(timer.wait());
    assert!(fired.load(Ordering::SeqCst));
}

#[test]
fn dropped_timer_never_fires() {
    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    let timer = DismissTimer::start(ms(200), move || flag.store(true, Ordering::SeqCst));
    drop(timer);

    std::thread::sleep(ms(300));
    assert!(!fired.load(Ordering::SeqCst));
}

#[test]
fn cancelled_timer_reports_not_fired() {
    let timer = DismissTimer::start(Duration::from_secs(10), || {});
    assert!(!timer.cancel());
}

#[test]
fn armed_sequencer_uses_its_delay() {
    let intro = IntroSequencer::new(1);
    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    let timer = intro.arm(move || flag.store(true, Ordering::SeqCst));
    // Tear down right away, as an unmount would.
    assert!(!timer.cancel());
    assert!(!fired.load(Ordering::SeqCst));
}
