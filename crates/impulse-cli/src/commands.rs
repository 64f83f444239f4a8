use crate::OutputFormat;
use anyhow::Context;
use crossbeam_channel::bounded;
use impulse_engine::intro::OVERLAY_FADE;
use impulse_engine::{
    CurveRig, EasingType, IntroSequencer, NarrativeScript, ParameterId, ScrollProgress, StageRenderer,
    VisualParameterSet,
};
use impulse_schema::RigDocument;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

pub fn load_document(path: Option<&Path>) -> anyhow::Result<RigDocument> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading rig document {}", path.display()))?;
            RigDocument::from_json(&json)
                .with_context(|| format!("parsing rig document {}", path.display()))
        }
        None => Ok(RigDocument::landing()?),
    }
}

pub fn load_rig(path: Option<&Path>) -> anyhow::Result<CurveRig> {
    Ok(load_document(path)?.to_rig()?)
}

pub fn load_script(path: Option<&Path>) -> anyhow::Result<NarrativeScript> {
    match path {
        Some(path) => NarrativeScript::load(path)
            .with_context(|| format!("loading script {}", path.display())),
        None => Ok(NarrativeScript::builtin().clone()),
    }
}

/// The same rig with every curve eased by `easing`.
pub fn with_easing(rig: &CurveRig, easing: EasingType) -> CurveRig {
    rig.curves().fold(CurveRig::new(), |eased, (id, curve)| {
        eased.with(id, curve.clone().with_easing(easing))
    })
}

/// Prints frames of `rig`. An empty `params` reports every parameter.
pub fn sample(
    out: &mut impl Write,
    rig: &CurveRig,
    steps: usize,
    at: Option<f64>,
    params: &[ParameterId],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let frames: Vec<VisualParameterSet> = match at {
        Some(progress) => vec![rig.evaluate(ScrollProgress::new(progress))],
        None => rig.sample(steps),
    };
    let columns: &[ParameterId] = if params.is_empty() {
        &ParameterId::ALL
    } else {
        params
    };

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Map<String, serde_json::Value>> = frames
                .iter()
                .map(|frame| {
                    let mut row = serde_json::Map::new();
                    row.insert("progress".into(), frame.progress.value().into());
                    for id in columns {
                        row.insert(id.as_str().into(), frame.get(*id).into());
                    }
                    row
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            write!(out, "{:>8}", "progress")?;
            for id in columns {
                write!(out, " {:>15}", id.as_str())?;
            }
            writeln!(out)?;
            for frame in &frames {
                write!(out, "{:>8}", frame.progress.to_string())?;
                for id in columns {
                    write!(out, " {:>15.4}", frame.get(*id))?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

pub fn print_script(
    out: &mut impl Write,
    script: &NarrativeScript,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", script.to_json_pretty()?)?;
        return Ok(());
    }

    writeln!(out, "# Intro")?;
    for line in &script.intro_sequence {
        writeln!(out, "  {}", line)?;
    }
    writeln!(out, "# {} ({})", script.hero.title, script.hero.subtitle)?;
    writeln!(out, "# {}", script.chapter3.title)?;
    writeln!(out, "  {}: {}", script.labels.agri, script.chapter3.agri)?;
    writeln!(out, "  {}: {}", script.labels.aqua, script.chapter3.aqua)?;
    writeln!(out, "# {}", script.chapter2.heading)?;
    for (i, beat) in script.chapter2.beats().iter().enumerate() {
        writeln!(out, "  beat{}: {}", i + 1, beat)?;
    }
    writeln!(out, "# {}", script.chapter1.title)?;
    writeln!(out, "  {}", script.chapter1.paragraph)?;
    writeln!(out, "# {}", script.footer.call)?;
    writeln!(out, "  {} <{}>", script.labels.partner_button, script.footer.mailto())?;
    Ok(())
}

pub fn print_intro(
    out: &mut impl Write,
    script: &NarrativeScript,
    step_ms: u64,
) -> anyhow::Result<()> {
    let step = Duration::from_millis(step_ms.max(1));
    let mut intro = IntroSequencer::for_script(script);
    let end = intro.dismiss_after() + Duration::from_secs_f64(OVERLAY_FADE);

    write!(out, "{:>7} {:>9} {:>7}", "ms", "state", "overlay")?;
    for i in 0..intro.line_count() {
        write!(out, " {:>6}", format!("line{}", i + 1))?;
    }
    writeln!(out)?;

    let mut t = Duration::ZERO;
    while t <= end {
        intro.advance(t);
        write!(
            out,
            "{:>7} {:>9} {:>7.3}",
            t.as_millis(),
            format!("{:?}", intro.state()),
            intro.overlay_opacity(t)
        )?;
        for i in 0..intro.line_count() {
            write!(out, " {:>6.3}", intro.line_opacity(i, t))?;
        }
        writeln!(out)?;
        t += step;
    }
    Ok(())
}

/// Arms the dismissal timer and blocks until it fires.
pub fn run_live_intro(script: &NarrativeScript) -> anyhow::Result<()> {
    let intro = IntroSequencer::for_script(script);
    let (tx, rx) = bounded(1);
    let started = Instant::now();
    let timer = intro.arm(move || {
        let _ = tx.send(Instant::now());
    });

    for line in &script.intro_sequence {
        info!("{}", line);
    }

    let fired_at = rx
        .recv_timeout(intro.dismiss_after() + Duration::from_secs(5))
        .context("dismiss timer never fired")?;
    timer.wait();
    info!(
        "Intro dismissed after {} ms",
        fired_at.duration_since(started).as_millis()
    );
    Ok(())
}

pub fn print_landing_rig(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", RigDocument::landing()?.to_json_pretty()?)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub output: PathBuf,
    pub steps: usize,
    pub at: Option<f64>,
    pub width: i32,
    pub height: i32,
    pub no_copy: bool,
}

pub fn render(
    request: &RenderRequest,
    rig_path: Option<&Path>,
    script_path: Option<&Path>,
) -> anyhow::Result<()> {
    let document = load_document(rig_path)?;
    let rig = document.to_rig()?;
    let script = load_script(script_path)?;

    let mut renderer = StageRenderer::new(request.width, request.height)?;
    if let Some(palette) = document.palette.clone() {
        renderer = renderer.with_palette(palette);
    }
    if request.no_copy {
        renderer = renderer.without_copy();
    }

    match request.at {
        Some(progress) => {
            let frame = rig.evaluate(ScrollProgress::new(progress));
            let bytes = renderer.render_png(&frame, &script)?;
            if let Some(parent) = request.output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&request.output, bytes)
                .with_context(|| format!("writing {}", request.output.display()))?;
            info!("Wrote {}", request.output.display());
        }
        None => {
            renderer.render_sequence(&rig, &script, request.steps, &request.output)?;
        }
    }
    Ok(())
}
