//! Application settings and command-line arguments.
//!
//! The settings file holds the overlay options (flattened, same keys as
//! `RenderOptions`) plus a few window-level ones:
//!
//! ```json
//! { "trailLength": 40, "color": "#8fd3ff", "backdrop": "#101018", "touch": false }
//! ```

use std::path::PathBuf;

use anyhow::{Context, bail};
use ghostcursor_core::settings::default_settings_path;
use ghostcursor_core::{RenderOptions, Rgb};
use serde::{Deserialize, Serialize};

/// `#0b0b12`
pub const DEFAULT_BACKDROP: Rgb = Rgb::new(11.0 / 255.0, 11.0 / 255.0, 18.0 / 255.0);
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1280, 800);
pub const DEFAULT_TITLE: &str = "Ghostcursor";

pub const USAGE: &str = "\
usage: ghostcursor [--config <path>]

  -c, --config <path>   settings file (default: <config dir>/ghostcursor/config.json)
  -h, --help            print this help

Logging is controlled with RUST_LOG.";

// ════════════════════════════════════════════════════════════════════
// Settings file
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    #[serde(flatten)]
    pub render: RenderOptions,
    /// Color the overlay is blended onto.
    pub backdrop: Option<String>,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub title: Option<String>,
    /// Force touch or pointer defaults. Unset means "touch once a touch
    /// event has been seen".
    pub touch: Option<bool>,
}

impl AppSettings {
    pub fn backdrop(&self) -> Rgb {
        match self.backdrop.as_deref() {
            None => DEFAULT_BACKDROP,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, using default backdrop");
                DEFAULT_BACKDROP
            }),
        }
    }

    /// Initial window size in logical pixels, each side at least 1.
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.window_width.unwrap_or(DEFAULT_WINDOW_SIZE.0).max(1),
            self.window_height.unwrap_or(DEFAULT_WINDOW_SIZE.1).max(1),
        )
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Whether `other` changes anything the pipeline bakes in at build
    /// time outside `RenderOptions`.
    pub fn surface_differs(&self, other: &AppSettings) -> bool {
        self.backdrop() != other.backdrop() || self.touch != other.touch
    }
}

// ════════════════════════════════════════════════════════════════════
// Command line
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub help: bool,
}

/// Parse arguments (without the program name).
pub fn parse_args<I>(args: I) -> anyhow::Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => out.help = true,
            "-c" | "--config" => {
                let path = args.next().with_context(|| format!("{arg} needs a path"))?;
                out.config = Some(PathBuf::from(path));
            }
            other => match other.strip_prefix("--config=") {
                Some(path) if !path.is_empty() => out.config = Some(PathBuf::from(path)),
                _ => bail!("unexpected argument `{other}`\n\n{USAGE}"),
            },
        }
    }
    Ok(out)
}

/// `--config` if given, else the platform default.
pub fn resolve_settings_path(args: &CliArgs) -> anyhow::Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => default_settings_path().context("locating the settings file"),
    }
}
