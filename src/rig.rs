//! # Rig Module
//!
//! Binds named visual parameters to interpolation curves.
//!
//! ## Responsibilities
//! - **Parameter Names**: `ParameterId` enumerates every scroll-driven property.
//! - **Landing Rig**: The hand-tuned breakpoints of the sticky cell stage.
//! - **Frame Evaluation**: One progress value in, one `VisualParameterSet` out.
//!
//! Beat curves overlap on purpose (beat 1 fades out over 0.18..0.3 while beat 2
//! fades in from 0.25) so neighbouring lines crossfade.

use crate::animation::Curve;
use crate::errors::CurveError;
use crate::scroll::ScrollProgress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// A scroll-driven property of the stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterId {
    /// Scale of the cell core.
    CoreScale,
    /// Opacity of the cell core.
    CoreGlow,
    /// Opacity of the cyan bloom behind the core.
    BloomOpacity,
    /// Opacity of the satellite cell cluster.
    ClusterOpacity,
    Beat1,
    Beat2,
    Beat3,
    Beat4,
}

impl ParameterId {
    pub const ALL: [ParameterId; 8] = [
        ParameterId::CoreScale,
        ParameterId::CoreGlow,
        ParameterId::BloomOpacity,
        ParameterId::ClusterOpacity,
        ParameterId::Beat1,
        ParameterId::Beat2,
        ParameterId::Beat3,
        ParameterId::Beat4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterId::CoreScale => "core_scale",
            ParameterId::CoreGlow => "core_glow",
            ParameterId::BloomOpacity => "bloom_opacity",
            ParameterId::ClusterOpacity => "cluster_opacity",
            ParameterId::Beat1 => "beat1",
            ParameterId::Beat2 => "beat2",
            ParameterId::Beat3 => "beat3",
            ParameterId::Beat4 => "beat4",
        }
    }

    /// Value used when a rig has no curve for this parameter.
    pub fn rest_value(self) -> f64 {
        match self {
            ParameterId::CoreScale | ParameterId::CoreGlow => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParameterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown parameter '{}'", s))
    }
}

/// The interpolated outputs for one frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualParameterSet {
    pub progress: ScrollProgress,
    pub core_scale: f64,
    pub core_glow: f64,
    pub bloom_opacity: f64,
    pub cluster_opacity: f64,
    pub beat1: f64,
    pub beat2: f64,
    pub beat3: f64,
    pub beat4: f64,
}

impl VisualParameterSet {
    fn at_rest(progress: ScrollProgress) -> Self {
        Self {
            progress,
            core_scale: ParameterId::CoreScale.rest_value(),
            core_glow: ParameterId::CoreGlow.rest_value(),
            bloom_opacity: 0.0,
            cluster_opacity: 0.0,
            beat1: 0.0,
            beat2: 0.0,
            beat3: 0.0,
            beat4: 0.0,
        }
    }

    pub fn get(&self, id: ParameterId) -> f64 {
        match id {
            ParameterId::CoreScale => self.core_scale,
            ParameterId::CoreGlow => self.core_glow,
            ParameterId::BloomOpacity => self.bloom_opacity,
            ParameterId::ClusterOpacity => self.cluster_opacity,
            ParameterId::Beat1 => self.beat1,
            ParameterId::Beat2 => self.beat2,
            ParameterId::Beat3 => self.beat3,
            ParameterId::Beat4 => self.beat4,
        }
    }

    fn set(&mut self, id: ParameterId, value: f64) {
        let slot = match id {
            ParameterId::CoreScale => &mut self.core_scale,
            ParameterId::CoreGlow => &mut self.core_glow,
            ParameterId::BloomOpacity => &mut self.bloom_opacity,
            ParameterId::ClusterOpacity => &mut self.cluster_opacity,
            ParameterId::Beat1 => &mut self.beat1,
            ParameterId::Beat2 => &mut self.beat2,
            ParameterId::Beat3 => &mut self.beat3,
            ParameterId::Beat4 => &mut self.beat4,
        };
        *slot = value;
    }

    /// Beat opacities in scroll order.
    pub fn beats(&self) -> [f64; 4] {
        [self.beat1, self.beat2, self.beat3, self.beat4]
    }
}

/// A set of curves keyed by parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveRig {
    curves: BTreeMap<ParameterId, Curve>,
}

impl CurveRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `curve` to `id`, returning the curve it replaced.
    pub fn insert(&mut self, id: ParameterId, curve: Curve) -> Option<Curve> {
        self.curves.insert(id, curve)
    }

    pub fn with(mut self, id: ParameterId, curve: Curve) -> Self {
        self.insert(id, curve);
        self
    }

    pub fn curve(&self, id: ParameterId) -> Option<&Curve> {
        self.curves.get(&id)
    }

    pub fn curves(&self) -> impl Iterator<Item = (ParameterId, &Curve)> {
        self.curves.iter().map(|(id, c)| (*id, c))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// The rig of the landing page's sticky "cell" section.
    pub fn landing() -> Result<Self, CurveError> {
        let rig = Self::new()
            .with(
                ParameterId::CoreScale,
                Curve::from_pairs(&[(0.0, 0.65), (0.33, 0.95), (0.66, 1.2), (1.0, 1.3)])?,
            )
            .with(
                ParameterId::CoreGlow,
                Curve::from_pairs(&[(0.0, 0.35), (0.4, 0.6), (0.6, 0.95), (1.0, 0.8)])?,
            )
            .with(
                ParameterId::BloomOpacity,
                Curve::from_pairs(&[(0.25, 0.0), (0.5, 1.0), (0.8, 0.6)])?,
            )
            .with(
                ParameterId::ClusterOpacity,
                Curve::from_pairs(&[(0.6, 0.0), (0.8, 1.0)])?,
            )
            .with(
                ParameterId::Beat1,
                Curve::from_pairs(&[(0.0, 1.0), (0.18, 1.0), (0.3, 0.0)])?,
            )
            .with(
                ParameterId::Beat2,
                Curve::from_pairs(&[(0.25, 0.0), (0.4, 1.0), (0.55, 0.0)])?,
            )
            .with(
                ParameterId::Beat3,
                Curve::from_pairs(&[(0.5, 0.0), (0.65, 1.0), (0.8, 0.0)])?,
            )
            .with(
                ParameterId::Beat4,
                Curve::from_pairs(&[(0.75, 0.0), (0.9, 1.0), (1.0, 1.0)])?,
            );
        debug!(curves = rig.len(), "landing rig built");
        Ok(rig)
    }

    /// Evaluates every curve at `progress`. Parameters without a curve keep their rest value.
    pub fn evaluate(&self, progress: impl Into<ScrollProgress>) -> VisualParameterSet {
        let progress = progress.into();
        let mut set = VisualParameterSet::at_rest(progress);
        for (id, curve) in &self.curves {
            set.set(*id, curve.evaluate(progress.value()));
        }
        set
    }

    /// Evaluates `steps + 1` evenly spaced frames from progress 0 to 1.
    pub fn sample(&self, steps: usize) -> Vec<VisualParameterSet> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| self.evaluate(i as f64 / steps as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_names_round_trip() {
        for id in ParameterId::ALL {
            assert_eq!(id.as_str().parse::<ParameterId>(), Ok(id));
        }
    }

    #[test]
    fn empty_rig_yields_rest_values() {
        let set = CurveRig::new().evaluate(0.5);
        assert_eq!(set.core_scale, 1.0);
        assert_eq!(set.beats(), [0.0; 4]);
    }

    #[test]
    fn sample_covers_both_ends() {
        let rig = CurveRig::landing().unwrap();
        let frames = rig.sample(4);
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0].progress, ScrollProgress::START);
        assert_eq!(frames[4].progress, ScrollProgress::END);
    }
}
