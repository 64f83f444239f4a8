use clap::{Parser, Subcommand, ValueEnum};
use impulse_engine::{EasingType, ParameterId};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the rig over a progress sweep (or at one progress value)
    Sample {
        /// Number of intervals between progress 0 and 1
        #[arg(long, default_value_t = 20)]
        steps: usize,
        /// Evaluate a single progress value instead of a sweep
        #[arg(long)]
        at: Option<f64>,
        /// Rig document (defaults to the landing rig)
        #[arg(long)]
        rig: Option<PathBuf>,
        /// Only report these parameters (repeatable, e.g. --param core_scale)
        #[arg(long = "param", value_name = "PARAMETER")]
        params: Vec<ParameterId>,
        /// Override the easing of every curve (linear, ease_in, ease_out, ease_in_out)
        #[arg(long)]
        easing: Option<EasingType>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print the narrative script
    Script {
        /// Script document (defaults to the built-in copy)
        #[arg(long)]
        script: Option<PathBuf>,
        /// Print the JSON document instead of the readable outline
        #[arg(long)]
        json: bool,
    },
    /// Print the intro timeline
    Intro {
        /// Sampling interval in milliseconds
        #[arg(long, default_value_t = 250)]
        step_ms: u64,
        /// Arm the real dismissal timer and wait for it
        #[arg(long)]
        live: bool,
    },
    /// Print the landing rig as a JSON document
    Rig,
    /// Render stage frames to PNG
    Render {
        /// Output directory (sweep) or file (with --at)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        #[arg(long, default_value_t = 24)]
        steps: usize,
        /// Render a single frame at this progress
        #[arg(long)]
        at: Option<f64>,
        #[arg(long, default_value_t = 1280)]
        width: i32,
        #[arg(long, default_value_t = 720)]
        height: i32,
        #[arg(long)]
        rig: Option<PathBuf>,
        #[arg(long)]
        script: Option<PathBuf>,
        /// Skip the heading and beat copy
        #[arg(long)]
        no_copy: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

fn init_logging(level: LogLevel, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_string().parse()?)
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
    Ok(())
}

fn run(command: Command) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    match command {
        Command::Sample {
            steps,
            at,
            rig,
            params,
            easing,
            format,
        } => {
            let mut rig = commands::load_rig(rig.as_deref())?;
            if let Some(easing) = easing {
                rig = commands::with_easing(&rig, easing);
            }
            commands::sample(&mut out, &rig, steps, at, &params, format)
        }
        Command::Script { script, json } => {
            let script = commands::load_script(script.as_deref())?;
            commands::print_script(&mut out, &script, json)
        }
        Command::Intro { step_ms, live } => {
            let script = impulse_engine::NarrativeScript::builtin();
            commands::print_intro(&mut out, script, step_ms)?;
            if live {
                commands::run_live_intro(script)?;
            }
            Ok(())
        }
        Command::Rig => commands::print_landing_rig(&mut out),
        Command::Render {
            output,
            steps,
            at,
            width,
            height,
            rig,
            script,
            no_copy,
        } => {
            let request = commands::RenderRequest {
                output,
                steps,
                at,
                width,
                height,
                no_copy,
            };
            commands::render(&request, rig.as_deref(), script.as_deref())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level, cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Impulse {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
