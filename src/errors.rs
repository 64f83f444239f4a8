use thiserror::Error;

/// Rejections raised while defining an interpolation curve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("A curve needs at least 2 breakpoints, got {0}")]
    TooFewBreakpoints(usize),
    #[error("Breakpoint {index} has input {input} which is below the previous input {previous}")]
    Unsorted {
        index: usize,
        previous: f64,
        input: f64,
    },
    #[error("Breakpoint {index} is not finite ({input}, {output})")]
    NonFinite { index: usize, input: f64, output: f64 },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create surface")]
    SurfaceFailure,
    #[error("Failed to encode frame as PNG")]
    EncodeFailure,
    #[error("Invalid frame size {0}x{1}")]
    InvalidSize(i32, i32),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Script must have at least one intro line")]
    EmptyIntro,
    #[error("Invalid footer email: {0}")]
    InvalidEmail(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
