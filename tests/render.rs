//! Stage Rendering Tests
//!
//! Raster output of the sticky stage at a few scroll positions.

use impulse_engine::{CurveRig, NarrativeScript, RenderError, StageRenderer};
use skia_safe::{Data, Image};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

#[test]
fn png_has_requested_size() {
    init_logging();
    let rig = CurveRig::landing().unwrap();
    let renderer = StageRenderer::new(320, 180).unwrap().without_copy();

    let bytes = renderer
        .render_png(&rig.evaluate(0.5), NarrativeScript::builtin())
        .expect("render failed");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let image = Image::from_encoded(Data::new_copy(&bytes)).expect("PNG decodes");
    assert_eq!(image.width(), 320);
    assert_eq!(image.height(), 180);
}

#[test]
fn frames_differ_across_scroll() {
    init_logging();
    let rig = CurveRig::landing().unwrap();
    let renderer = StageRenderer::new(160, 90).unwrap().without_copy();
    let script = NarrativeScript::builtin();

    let top = renderer.render_png(&rig.evaluate(0.0), script).unwrap();
    let bottom = renderer.render_png(&rig.evaluate(1.0), script).unwrap();
    assert_ne!(top, bottom);
}

#[test]
fn copy_rendering_does_not_fail_without_fonts() {
    init_logging();
    let rig = CurveRig::landing().unwrap();
    let renderer = StageRenderer::new(200, 120).unwrap();
    assert!(renderer
        .render(&rig.evaluate(0.4), NarrativeScript::builtin())
        .is_ok());
}

#[test]
fn invalid_size_is_rejected() {
    assert!(matches!(
        StageRenderer::new(0, 100),
        Err(RenderError::InvalidSize(0, 100))
    ));
}

#[test]
fn sequence_writes_numbered_frames() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let rig = CurveRig::landing().unwrap();
    let renderer = StageRenderer::new(64, 36).unwrap().without_copy();

    let paths = renderer
        .render_sequence(&rig, NarrativeScript::builtin(), 4, dir.path())
        .unwrap();

    assert_eq!(paths.len(), 5);
    assert!(paths[0].ends_with("frame_0000.png"));
    assert!(paths[4].ends_with("frame_0004.png"));
    for path in paths {
        assert!(path.exists(), "{} missing", path.display());
    }
}
