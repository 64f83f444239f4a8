use impulse_engine::rig::{CurveRig, ParameterId};
use impulse_engine::types::Palette;
use impulse_engine::{Curve, CurveError, EasingType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Curve for '{parameter}' is invalid: {source}")]
    Curve {
        parameter: ParameterId,
        #[source]
        source: CurveError,
    },
    #[error("Built-in landing rig is invalid: {0}")]
    Landing(#[source] CurveError),
    #[error("Parameter '{0}' is defined more than once")]
    DuplicateParameter(ParameterId),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One curve of a rig document.
///
/// ```json
/// { "parameter": "beat2", "breakpoints": [[0.25, 0], [0.4, 1], [0.55, 0]] }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CurveSpec {
    pub parameter: ParameterId,
    /// `[input, output]` pairs with non-decreasing inputs.
    pub breakpoints: Vec<[f64; 2]>,
    /// Easing inside each segment (default: linear)
    #[serde(default, skip_serializing_if = "is_linear")]
    pub easing: EasingType,
}

fn is_linear(easing: &EasingType) -> bool {
    *easing == EasingType::Linear
}

/// A full stage configuration: curves plus optional look overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RigDocument {
    pub curves: Vec<CurveSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
}

impl RigDocument {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describes an existing rig.
    pub fn from_rig(rig: &CurveRig) -> Self {
        let curves = rig
            .curves()
            .map(|(parameter, curve)| CurveSpec {
                parameter,
                breakpoints: curve
                    .breakpoints()
                    .iter()
                    .map(|bp| [bp.input, bp.output])
                    .collect(),
                easing: curve.easing(),
            })
            .collect();
        Self {
            curves,
            palette: None,
        }
    }

    /// The document for the built-in landing rig.
    pub fn landing() -> Result<Self, SchemaError> {
        let rig = CurveRig::landing().map_err(SchemaError::Landing)?;
        Ok(Self::from_rig(&rig))
    }

    /// Validates every curve and builds the rig.
    pub fn to_rig(&self) -> Result<CurveRig, SchemaError> {
        let mut seen = BTreeSet::new();
        let mut rig = CurveRig::new();

        for spec in &self.curves {
            if !seen.insert(spec.parameter) {
                return Err(SchemaError::DuplicateParameter(spec.parameter));
            }
            let pairs: Vec<(f64, f64)> = spec.breakpoints.iter().map(|[i, o]| (*i, *o)).collect();
            let curve = Curve::from_pairs(&pairs)
                .map_err(|source| SchemaError::Curve {
                    parameter: spec.parameter,
                    source,
                })?
                .with_easing(spec.easing);
            rig.insert(spec.parameter, curve);
        }

        debug!(curves = rig.len(), "rig document loaded");
        Ok(rig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_document_rebuilds_the_same_rig() {
        let doc = RigDocument::landing().unwrap();
        let json = doc.to_json_pretty().unwrap();
        let parsed = RigDocument::from_json(&json).unwrap();
        assert_eq!(parsed.to_rig().unwrap(), CurveRig::landing().unwrap());
    }

    #[test]
    fn easing_defaults_to_linear() {
        let doc = RigDocument::from_json(
            r#"{ "curves": [ { "parameter": "cluster_opacity", "breakpoints": [[0.6, 0], [0.8, 1]] } ] }"#,
        )
        .unwrap();
        assert_eq!(doc.curves[0].easing, EasingType::Linear);
        let rig = doc.to_rig().unwrap();
        let v = rig.evaluate(0.7).cluster_opacity;
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn eased_curve_is_parsed() {
        let doc = RigDocument::from_json(
            r#"{ "curves": [ { "parameter": "beat1", "breakpoints": [[0, 0], [1, 1]], "easing": "ease_in" } ] }"#,
        )
        .unwrap();
        let rig = doc.to_rig().unwrap();
        assert_eq!(
            rig.curve(ParameterId::Beat1).unwrap().easing(),
            EasingType::EaseIn
        );
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let result = RigDocument::from_json(
            r#"{ "curves": [ { "parameter": "hero_blur", "breakpoints": [[0, 0], [1, 1]] } ] }"#,
        );
        assert!(matches!(result, Err(SchemaError::Json(_))));
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let doc = RigDocument::from_json(
            r#"{ "curves": [
                { "parameter": "beat1", "breakpoints": [[0, 0], [1, 1]] },
                { "parameter": "beat1", "breakpoints": [[0, 1], [1, 0]] }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            doc.to_rig(),
            Err(SchemaError::DuplicateParameter(ParameterId::Beat1))
        ));
    }

    #[test]
    fn unsorted_breakpoints_name_the_parameter() {
        let doc = RigDocument::from_json(
            r#"{ "curves": [ { "parameter": "beat3", "breakpoints": [[0.5, 0], [0.2, 1]] } ] }"#,
        )
        .unwrap();
        match doc.to_rig() {
            Err(SchemaError::Curve { parameter, source }) => {
                assert_eq!(parameter, ParameterId::Beat3);
                assert!(matches!(source, CurveError::Unsorted { index: 1, .. }));
            }
            other => panic!("expected curve error, got {:?}", other),
        }
    }

    #[test]
    fn landing_error_does_not_blame_a_parameter() {
        let err = SchemaError::Landing(CurveError::TooFewBreakpoints(1));
        let message = err.to_string();
        assert!(message.starts_with("Built-in landing rig is invalid"));
        assert!(!message.contains("core_scale"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn landing_document_lists_every_parameter() {
        let doc = RigDocument::landing().unwrap();
        let names: Vec<ParameterId> = doc.curves.iter().map(|c| c.parameter).collect();
        assert_eq!(names, ParameterId::ALL.to_vec());
    }

    #[test]
    fn palette_is_optional() {
        let doc = RigDocument::landing().unwrap();
        let json = doc.to_json_pretty().unwrap();
        assert!(!json.contains("palette"));
    }
}
