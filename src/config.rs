//! Runtime settings.
//!
//! Settings come from an optional TOML file, then command-line flags on top.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FPS: u32 = 60;

/// Command-line arguments
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tiranga3d", version)]
#[command(about = "Hoist a waving 3D flag in your terminal", long_about = None)]
pub struct Args {
    /// Frame rate cap
    #[arg(long)]
    pub fps: Option<u32>,

    /// Seed for the cloth jitter and cloud layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Edge length of the key light's shadow map, 0 disables shadows
    #[arg(long)]
    pub shadow_map_size: Option<usize>,

    /// Leave the decorative clouds out
    #[arg(long, default_value_t = false)]
    pub no_clouds: bool,

    /// TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the terminal is busy drawing)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Render this many frames and exit
    #[arg(long)]
    pub frames: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps: u32,
    pub seed: Option<u64>,
    pub shadow_map_size: usize,
    pub clouds: bool,
    pub frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fps: DEFAULT_FPS,
            seed: None,
            shadow_map_size: crate::shadow::DEFAULT_MAP_SIZE,
            clouds: true,
            frames: None,
        }
    }
}

impl Settings {
    /// Loads settings from a `.toml` file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {}
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// File settings (if any) with command-line flags layered on top
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let base = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Settings::default(),
        };
        Ok(base.merge(args))
    }

    fn merge(mut self, args: &Args) -> Self {
        if let Some(fps) = args.fps {
            self.fps = fps;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(size) = args.shadow_map_size {
            self.shadow_map_size = size;
        }
        if args.no_clouds {
            self.clouds = false;
        }
        if args.frames.is_some() {
            self.frames = args.frames;
        }
        self.fps = self.fps.clamp(1, 240);
        self
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::from_args(&Args::default()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.fps, 60);
        assert!(settings.clouds);
    }

    #[test]
    fn flags_override_file() {
        let file = Settings::from_toml("fps = 30\nseed = 9\nclouds = false\n").unwrap();
        assert_eq!(file.fps, 30);
        assert_eq!(file.shadow_map_size, crate::shadow::DEFAULT_MAP_SIZE);
        let args = Args {
            fps: Some(500),
            seed: Some(1),
            ..Default::default()
        };
        let merged = file.merge(&args);
        assert_eq!(merged.fps, 240);
        assert_eq!(merged.seed, Some(1));
        assert!(!merged.clouds);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = Settings::load_from_file(Path::new("settings.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            Settings::from_toml("fps = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn cli_parses() {
        let args = Args::parse_from([
            "tiranga3d",
            "--fps",
            "30",
            "--no-clouds",
            "--seed",
            "4",
        ]);
        assert_eq!(args.fps, Some(30));
        assert!(args.no_clouds);
        assert_eq!(args.seed, Some(4));
    }
}
