//! Startup settings read from a `key:value` text file.
//!
//! ```text
//! resX:1280
//! resY:720
//! antialiasing:8
//! zoom:1
//! zoomRate:0
//! bigG:1
//! massCount:400
//! randDeviation:150
//! velocityRatio:150
//! ```
//!
//! Lines without a `:` are ignored, unknown keys are logged and skipped,
//! and keys missing from the file keep their [`Settings::default`] value.

use std::{fmt, fs, io, path::Path, path::PathBuf, str::FromStr};

use crate::config::Config;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub res_x: u32,
    pub res_y: u32,
    /// Multisampling level requested for the window.
    pub antialiasing: u16,

    /// World units per screen pixel.
    pub zoom: f32,
    /// Added to `zoom` on every simulated frame.
    pub zoom_rate: f32,

    pub big_g: f32,
    pub mass_count: usize,

    /// Standard deviation of the initial position/velocity distribution.
    pub rand_deviation: f32,
    /// Divisor applied to initial velocity samples.
    pub velocity_ratio: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            res_x: 1280,
            res_y: 720,
            antialiasing: 4,
            zoom: 1.0,
            zoom_rate: 0.0,
            big_g: 1.0,
            mass_count: 400,
            rand_deviation: 150.0,
            velocity_ratio: 150.0,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// A recognized key carried a value that does not parse.
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    /// Every value parsed but the combination is unusable.
    Invalid { key: &'static str, reason: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io { path, .. } => {
                write!(f, "cannot read settings file {}", path.display())
            }
            SettingsError::InvalidValue { line, key, value } => {
                write!(f, "line {line}: invalid value {value:?} for `{key}`")
            }
            SettingsError::Invalid { key, reason } => write!(f, "`{key}` {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Settings {
    /// Reads and parses the settings file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses settings text, starting from the defaults.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut s = Self::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let Some((key, value)) = raw.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "resX" => s.res_x = field(line, key, value)?,
                "resY" => s.res_y = field(line, key, value)?,
                "antialiasing" => s.antialiasing = field(line, key, value)?,
                "zoom" => s.zoom = field(line, key, value)?,
                "zoomRate" => s.zoom_rate = field(line, key, value)?,
                "bigG" => s.big_g = field(line, key, value)?,
                "massCount" => s.mass_count = field(line, key, value)?,
                "randDeviation" => s.rand_deviation = field(line, key, value)?,
                "velocityRatio" => s.velocity_ratio = field(line, key, value)?,
                _ => log::warn!("settings line {line}: unrecognized key `{key}`, skipped"),
            }
        }

        s.validate()?;
        Ok(s)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |key, reason| Err(SettingsError::Invalid { key, reason });

        if self.res_x == 0 || self.res_y == 0 {
            return invalid("resX/resY", "must be positive");
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return invalid("zoom", "must be a positive number");
        }
        if !self.zoom_rate.is_finite() {
            return invalid("zoomRate", "must be finite");
        }
        if !self.big_g.is_finite() {
            return invalid("bigG", "must be finite");
        }
        if !(self.rand_deviation.is_finite() && self.rand_deviation >= 0.0) {
            return invalid("randDeviation", "must be a non-negative number");
        }
        if !self.velocity_ratio.is_finite() || self.velocity_ratio == 0.0 {
            return invalid("velocityRatio", "must be a non-zero number");
        }
        Ok(())
    }

    /// Physics constants for the step, with the default close range.
    pub fn physics(&self) -> Config {
        Config::with_big_g(self.big_g)
    }
}

fn field<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidValue {
        line,
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
