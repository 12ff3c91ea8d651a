//! Rasterise SVG charts, since Slack won't preview SVG uploads.

use async_trait::async_trait;
use std::{
    fmt, io,
    path::{Path, PathBuf},
    process::ExitStatus,
    time::Duration,
};
use tokio::process::Command;
use tracing::debug;

/// The converter we shell out to unless told otherwise. Ships with librsvg.
pub const DEFAULT_PROGRAM: &str = "rsvg-convert";

/// How long a single conversion may take before it's killed.
const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ConvertError {
    SpawnFailed(io::Error),
    TimedOut(Duration),
    Failed(ExitStatus),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            ConvertError::SpawnFailed(e) => format!("could not start converter: {}", e),
            ConvertError::TimedOut(t) => format!("converter took longer than {:?}", t),
            ConvertError::Failed(s) => format!("converter exited with {}", s),
        };

        write!(f, "Failed to convert chart: {}", x)
    }
}

/// Converts an SVG file on disk to a PNG alongside it.
#[async_trait]
pub trait ImageConverter: Send + Sync {
    /// Convert the SVG at `svg`, returning the path of the PNG written.
    async fn convert(&self, svg: &Path) -> Result<PathBuf, ConvertError>;
}

/// Runs `<program> -o <png> <svg>`.
pub struct RsvgConvert {
    program: String,
    timeout: Duration,
}

impl RsvgConvert {
    pub fn new<T: ToString>(program: T) -> Self {
        RsvgConvert {
            program: program.to_string(),
            timeout: TIMEOUT,
        }
    }
}

#[async_trait]
impl ImageConverter for RsvgConvert {
    async fn convert(&self, svg: &Path) -> Result<PathBuf, ConvertError> {
        let png = svg.with_extension("png");

        debug!("Running {} -o {} {}", self.program, png.display(), svg.display());

        let status = Command::new(&self.program)
            .arg("-o")
            .arg(&png)
            .arg(svg)
            .kill_on_drop(true)
            .status();

        let status = tokio::time::timeout(self.timeout, status)
            .await
            .map_err(|_| ConvertError::TimedOut(self.timeout))?
            .map_err(ConvertError::SpawnFailed)?;

        if status.success() {
            Ok(png)
        } else {
            Err(ConvertError::Failed(status))
        }
    }
}
