//! # Impulse Engine
//!
//! `impulse-engine` drives the Blue Impulse landing page: a scripted intro overlay and a
//! sticky "cell" section whose scale, glow and copy follow the reader's scroll position.
//!
//! ## Core Features
//!
//! *   **Curves**: Immutable piecewise-linear curves, validated when defined.
//! *   **Rig**: Named curves evaluated together into a `VisualParameterSet` per frame.
//! *   **Scroll Tracking**: Document scroll offsets mapped to progress through a region.
//! *   **Signals**: Explicit subscribe/notify from progress to the presentation layer.
//! *   **Intro**: A one-shot overlay sequencer with a cancellable dismissal timer.
//! *   **Preview**: Skia raster rendering of the stage to PNG.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use impulse_engine::{CurveRig, Region, ScrollTracker, StageDriver};
//!
//! let rig = CurveRig::landing().expect("landing rig is well-formed");
//! let tracker = ScrollTracker::new(Region { top: 2400.0, height: 3200.0 }, 800.0);
//! let mut driver = StageDriver::new(tracker, rig);
//!
//! driver.on_frame(|frame| println!("scale {:.2}", frame.core_scale));
//! driver.scroll_to(3200.0);
//! ```

/// Curves, breakpoints, easing and keyframed values.
pub mod animation;

pub mod errors;

/// Named visual parameters and the landing rig.
pub mod rig;

/// Scroll offset to progress mapping.
pub mod scroll;

/// Subscription plumbing from progress to frames.
pub mod signal;

/// The intro overlay state machine and dismissal timer.
pub mod intro;

/// The narrative copy of the page.
pub mod script;

/// Colors and palette.
pub mod types;

/// Skia preview of the stage.
pub mod render;

pub use animation::{evaluate, Breakpoint, Curve, EasingType};
pub use errors::{CurveError, RenderError, ScriptError};
pub use intro::{DismissTimer, IntroSequencer, IntroState};
pub use render::StageRenderer;
pub use rig::{CurveRig, ParameterId, VisualParameterSet};
pub use script::NarrativeScript;
pub use scroll::{Edge, Region, ScrollOffset, ScrollProgress, ScrollTracker};
pub use signal::{ProgressSignal, StageDriver, Subscription};
