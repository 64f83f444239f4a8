use crate::errors::CurveError;
use keyframe::{AnimationSequence, CanTween, EasingFunction, Keyframe};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported easing functions for curve segments and timelines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingFunction for EasingType {
    fn y(&self, x: f64) -> f64 {
        match self {
            EasingType::Linear => keyframe::functions::Linear.y(x),
            EasingType::EaseIn => keyframe::functions::EaseIn.y(x),
            EasingType::EaseOut => keyframe::functions::EaseOut.y(x),
            EasingType::EaseInOut => keyframe::functions::EaseInOut.y(x),
        }
    }
}

impl EasingType {
    /// Evaluates the easing curve at a specific point `x` (0.0 to 1.0).
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            // Kept exact so linear curves reproduce the textbook lerp bit for bit.
            EasingType::Linear => x,
            _ => self.y(x),
        }
    }
}

impl std::str::FromStr for EasingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(EasingType::Linear),
            "ease_in" => Ok(EasingType::EaseIn),
            "ease_out" => Ok(EasingType::EaseOut),
            "ease_in_out" => Ok(EasingType::EaseInOut),
            other => Err(format!("unknown easing '{}'", other)),
        }
    }
}

/// One `(input, output)` anchor of a piecewise curve.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub input: f64,
    pub output: f64,
}

impl Breakpoint {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

impl From<(f64, f64)> for Breakpoint {
    fn from((input, output): (f64, f64)) -> Self {
        Self { input, output }
    }
}

/// An immutable piecewise-linear mapping from scroll progress to a value.
///
/// Outside the span of its breakpoint inputs the curve holds the nearest
/// endpoint output. Inputs may repeat; at a repeated input the breakpoint
/// defined last wins, which gives an instant step.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    breakpoints: Vec<Breakpoint>,
    easing: EasingType,
}

impl Curve {
    /// Defines a curve, rejecting anything that could interpolate silently wrong.
    ///
    /// # Errors
    /// * [`CurveError::TooFewBreakpoints`] for fewer than two breakpoints.
    /// * [`CurveError::NonFinite`] for NaN or infinite inputs/outputs.
    /// * [`CurveError::Unsorted`] when an input is below the one before it.
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, CurveError> {
        if breakpoints.len() < 2 {
            return Err(CurveError::TooFewBreakpoints(breakpoints.len()));
        }

        for (index, bp) in breakpoints.iter().enumerate() {
            if !bp.input.is_finite() || !bp.output.is_finite() {
                return Err(CurveError::NonFinite {
                    index,
                    input: bp.input,
                    output: bp.output,
                });
            }
        }

        for (index, pair) in breakpoints.windows(2).enumerate() {
            if pair[1].input < pair[0].input {
                return Err(CurveError::Unsorted {
                    index: index + 1,
                    previous: pair[0].input,
                    input: pair[1].input,
                });
            }
        }

        Ok(Self {
            breakpoints,
            easing: EasingType::Linear,
        })
    }

    /// Shorthand for [`Curve::new`] from `(input, output)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, CurveError> {
        Self::new(pairs.iter().copied().map(Breakpoint::from).collect())
    }

    /// Applies `easing` to the in-segment fraction of every segment.
    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn easing(&self) -> EasingType {
        self.easing
    }

    /// Input span `(first, last)` over which the curve actually varies.
    pub fn domain(&self) -> (f64, f64) {
        let first = self.breakpoints[0].input;
        let last = self.breakpoints[self.breakpoints.len() - 1].input;
        (first, last)
    }

    /// Evaluates the curve at `progress`.
    ///
    /// A NaN `progress` yields the first output.
    pub fn evaluate(&self, progress: f64) -> f64 {
        let bps = &self.breakpoints;

        // First breakpoint strictly past `progress`. Everything before it is at or below.
        let hi = bps.partition_point(|bp| bp.input <= progress);

        if hi == 0 {
            return bps[0].output;
        }
        if hi == bps.len() {
            return bps[bps.len() - 1].output;
        }

        // `lo` is the last breakpoint at or below `progress`, so duplicates resolve to the
        // last-defined one and `hi.input > lo.input` always holds here.
        let lo = &bps[hi - 1];
        let hi = &bps[hi];
        let span = hi.input - lo.input;
        if span <= 0.0 {
            return hi.output;
        }

        let t = self.easing.eval((progress - lo.input) / span);
        lo.output + (hi.output - lo.output) * t
    }
}

/// Free-function form of [`Curve::evaluate`].
pub fn evaluate(curve: &Curve, progress: f64) -> f64 {
    curve.evaluate(progress)
}

/// A time-based animated value built from keyframes.
///
/// Used for the mount-time intro, where values are driven by elapsed seconds
/// rather than scroll progress.
#[derive(Clone)]
pub struct Animated<T>
where
    T: Clone + CanTween + Default,
{
    /// Raw storage of keyframes (value, absolute_time, easing of the segment ending here).
    raw_keyframes: Vec<(T, f64, EasingType)>,
    sequence: AnimationSequence<T>,
    /// The value computed by the last [`Animated::update`].
    pub current_value: T,
}

impl<T> Animated<T>
where
    T: Clone + CanTween + Default,
{
    /// Creates a new animated value with an initial state and no motion.
    pub fn new(initial: T) -> Self {
        let kf = Keyframe::new(initial.clone(), 0.0, EasingType::Linear);

        Self {
            raw_keyframes: vec![(initial.clone(), 0.0, EasingType::Linear)],
            sequence: AnimationSequence::from(vec![kf]),
            current_value: initial,
        }
    }

    /// Appends a keyframe `duration` seconds after the current end.
    pub fn add_keyframe(&mut self, target: T, duration: f64, easing: EasingType) {
        let new_time = self.sequence.duration() + duration;
        self.raw_keyframes.push((target, new_time, easing));
        self.sequence = AnimationSequence::from(self.keyframes());
    }

    /// `keyframe` eases a segment with the function of its starting keyframe,
    /// so each keyframe carries the easing of the segment that follows it.
    fn keyframes(&self) -> Vec<Keyframe<T>> {
        self.raw_keyframes
            .iter()
            .enumerate()
            .map(|(i, (val, time, _))| {
                let ease = self
                    .raw_keyframes
                    .get(i + 1)
                    .map(|(_, _, next)| *next)
                    .unwrap_or(EasingType::Linear);
                Keyframe::new(val.clone(), *time, ease)
            })
            .collect()
    }

    /// Keeps the last value for `duration` seconds.
    pub fn hold(&mut self, duration: f64) {
        if duration <= 0.0 {
            return;
        }
        let last = self
            .raw_keyframes
            .last()
            .map(|(v, _, _)| v.clone())
            .unwrap_or_default();
        self.add_keyframe(last, duration, EasingType::Linear);
    }

    /// Total duration of the sequence in seconds.
    pub fn duration(&self) -> f64 {
        self.sequence.duration()
    }

    /// Updates `current_value` for the absolute time `time`.
    pub fn update(&mut self, time: f64) {
        self.sequence.advance_to(time);
        self.current_value = self.sequence.now();
    }

    /// Samples the value at `time` without touching `current_value`.
    pub fn sample(&self, time: f64) -> T {
        let mut seq = self.sequence.clone();
        seq.advance_to(time);
        seq.now()
    }
}

impl<T> fmt::Debug for Animated<T>
where
    T: Clone + CanTween + Default + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animated")
            .field("keyframes", &self.raw_keyframes.len())
            .field("current_value", &self.current_value)
            .finish()
    }
}
