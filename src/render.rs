//! # Render Module
//!
//! Offline raster preview of the sticky "cell" stage via Skia.
//!
//! ## Responsibilities
//! - **Stage Painting**: Core, bloom, cluster and the beat copy for one `VisualParameterSet`.
//! - **Encoding**: PNG bytes for a single frame.
//! - **Sequences**: Parallel rendering of a progress sweep to a directory.
//!
//! The bloom and the cluster are children of the core, so they inherit its scale and opacity.

use crate::errors::RenderError;
use crate::rig::{CurveRig, VisualParameterSet};
use crate::script::NarrativeScript;
use crate::types::{Color, Palette};
use rayon::prelude::*;
use skia_safe::{
    gradient_shader, Canvas, Data, EncodedImageFormat, Font, FontMgr, FontStyle, Image, Paint,
    Point, TextBlob, TileMode, Typeface,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Environment variable pointing at a TTF/OTF used for the stage copy.
pub const FONT_ENV: &str = "IMPULSE_FONT";

/// Paints stage frames at a fixed size.
#[derive(Clone, Debug)]
pub struct StageRenderer {
    pub width: i32,
    pub height: i32,
    pub palette: Palette,
    /// Draw the chapter heading and beats.
    pub draw_copy: bool,
    font_bytes: Option<Vec<u8>>,
}

impl StageRenderer {
    pub fn new(width: i32, height: i32) -> Result<Self, RenderError> {
        if width <= 0 || height <= 0 {
            return Err(RenderError::InvalidSize(width, height));
        }
        let font_bytes = std::env::var(FONT_ENV)
            .ok()
            .and_then(|path| match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!("Could not read {}={}: {}", FONT_ENV, path, e);
                    None
                }
            });
        Ok(Self {
            width,
            height,
            palette: Palette::default(),
            draw_copy: true,
            font_bytes,
        })
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn without_copy(mut self) -> Self {
        self.draw_copy = false;
        self
    }

    fn typeface(&self) -> Option<Typeface> {
        let font_mgr = FontMgr::new();
        if let Some(bytes) = &self.font_bytes {
            let data = Data::new_copy(bytes);
            if let Some(typeface) = font_mgr.new_from_data(&data, 0) {
                return Some(typeface);
            }
            warn!("{} is not a usable font, falling back to system fonts", FONT_ENV);
        }
        font_mgr
            .match_family_style("Helvetica", FontStyle::normal())
            .or_else(|| font_mgr.match_family_style("Arial", FontStyle::normal()))
            .or_else(|| font_mgr.match_family_style("", FontStyle::normal()))
    }

    /// Renders one frame to an image.
    pub fn render(
        &self,
        params: &VisualParameterSet,
        script: &NarrativeScript,
    ) -> Result<Image, RenderError> {
        let mut surface = skia_safe::surfaces::raster_n32_premul((self.width, self.height))
            .ok_or(RenderError::SurfaceFailure)?;
        let canvas = surface.canvas();
        canvas.clear(self.palette.background.to_color4f());

        self.draw_cell(canvas, params);

        if self.draw_copy {
            match self.typeface() {
                Some(typeface) => self.paint_copy(canvas, &typeface, params, script),
                None => warn!("No typeface available, stage copy skipped"),
            }
        }

        debug!(progress = %params.progress, "stage frame rendered");
        Ok(surface.image_snapshot())
    }

    /// Renders one frame and encodes it as PNG.
    pub fn render_png(
        &self,
        params: &VisualParameterSet,
        script: &NarrativeScript,
    ) -> Result<Vec<u8>, RenderError> {
        let image = self.render(params, script)?;
        let data = image
            .encode(None, EncodedImageFormat::PNG, 100)
            .ok_or(RenderError::EncodeFailure)?;
        Ok(data.as_bytes().to_vec())
    }

    /// Renders `steps + 1` frames sweeping progress 0 → 1 into `out_dir` as
    /// `frame_0000.png`, `frame_0001.png`, ...
    #[instrument(level = "info", skip(self, rig, script))]
    pub fn render_sequence(
        &self,
        rig: &CurveRig,
        script: &NarrativeScript,
        steps: usize,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(out_dir)?;
        let frames = rig.sample(steps);

        let paths = frames
            .par_iter()
            .enumerate()
            .map(|(i, params)| -> Result<PathBuf, RenderError> {
                let bytes = self.render_png(params, script)?;
                let path = out_dir.join(format!("frame_{:04}.png", i));
                std::fs::write(&path, bytes)?;
                Ok(path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Rendered {} frames to {}", paths.len(), out_dir.display());
        Ok(paths)
    }

    fn center(&self) -> Point {
        Point::new(self.width as f32 * 0.5, self.height as f32 * 0.42)
    }

    fn base_radius(&self) -> f32 {
        self.width.min(self.height) as f32 * 0.16
    }

    fn draw_cell(&self, canvas: &Canvas, params: &VisualParameterSet) {
        let center = self.center();
        let scale = params.core_scale.max(0.0) as f32;
        let glow = params.core_glow.clamp(0.0, 1.0) as f32;
        let radius = self.base_radius() * scale;

        // Bloom
        let bloom_alpha = glow * params.bloom_opacity.clamp(0.0, 1.0) as f32;
        if bloom_alpha > 0.0 {
            let colors = [
                self.palette.bloom.with_opacity(bloom_alpha).to_skia(),
                self.palette.bloom.with_opacity(0.0).to_skia(),
            ];
            let positions = [0.35f32, 1.0];
            let mut paint = Paint::default();
            paint.set_anti_alias(true);
            paint.set_shader(gradient_shader::radial(
                center,
                radius * 2.2,
                colors.as_slice(),
                Some(positions.as_slice()),
                TileMode::Clamp,
                None,
                None,
            ));
            canvas.draw_circle(center, radius * 2.2, &paint);
        }

        // Core
        let mut paint = Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(self.palette.core.with_opacity(glow).to_skia());
        canvas.draw_circle(center, radius, &paint);

        // Cluster
        let cluster_alpha = glow * params.cluster_opacity.clamp(0.0, 1.0) as f32;
        if cluster_alpha > 0.0 {
            let mut paint = Paint::default();
            paint.set_anti_alias(true);
            paint.set_color(self.palette.cluster.with_opacity(cluster_alpha).to_skia());
            for angle in [90.0f32, 210.0, 330.0] {
                let rad = angle.to_radians();
                let orbit = radius * 1.45;
                let p = Point::new(center.x + orbit * rad.cos(), center.y - orbit * rad.sin());
                canvas.draw_circle(p, radius * 0.22, &paint);
            }
        }
    }

    fn paint_copy(
        &self,
        canvas: &Canvas,
        typeface: &Typeface,
        params: &VisualParameterSet,
        script: &NarrativeScript,
    ) {
        let unit = self.height as f32 / 30.0;

        let heading_font = Font::new(typeface.clone(), Some(unit * 0.9));
        self.draw_centered(
            canvas,
            &script.chapter2.heading,
            &heading_font,
            unit * 2.0,
            self.palette.text.with_opacity(0.7),
        );

        // Beats share a line and crossfade.
        let beat_font = Font::new(typeface.clone(), Some(unit * 1.2));
        let baseline = self.height as f32 - unit * 3.0;
        for (text, opacity) in script.chapter2.beats().iter().zip(params.beats()) {
            if opacity <= 0.0 {
                continue;
            }
            self.draw_centered(
                canvas,
                text,
                &beat_font,
                baseline,
                self.palette.text.with_opacity(opacity as f32),
            );
        }
    }

    fn draw_centered(&self, canvas: &Canvas, text: &str, font: &Font, baseline: f32, color: Color) {
        let Some(blob) = TextBlob::from_str(text, font) else {
            return;
        };
        let (advance, _) = font.measure_str(text, None);
        let x = (self.width as f32 - advance) * 0.5;
        let mut paint = Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(color.to_skia());
        canvas.draw_text_blob(&blob, (x, baseline), &paint);
    }
}
