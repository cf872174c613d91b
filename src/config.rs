use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    chart::{ChartFrame, ChartTheme, DEFAULT_PADDING},
    controller::Span,
    error::Result,
};

/// Top-level settings. Every field has a default, so a partial JSON file only
/// overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub canvas: CanvasConfig,
    pub theme: ThemeName,
    pub autoplay: AutoplayConfig,
    pub montage: MontageConfig,
}

impl VizConfig {
    /// Read a JSON config file, or fall back to defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let config = Self::from_json_str(&text)?;
                tracing::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Interactive,
    Montage,
}

impl ThemeName {
    pub fn theme(self) -> ChartTheme {
        match self {
            ThemeName::Interactive => ChartTheme::interactive(),
            ThemeName::Montage => ChartTheme::montage(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl CanvasConfig {
    pub fn frame(&self) -> ChartFrame {
        ChartFrame::new(self.width, self.height, self.padding)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding: DEFAULT_PADDING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    /// Period of the random parameter nudge.
    pub nudge_interval_ms: u64,
    /// Period of the family rotation.
    pub cycle_interval_ms: u64,
    pub bounds: AutoplayBounds,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            nudge_interval_ms: 300,
            cycle_interval_ms: 3000,
            bounds: AutoplayBounds::default(),
        }
    }
}

/// Random-walk step sizes and ranges used while autoplaying. The ranges sit
/// inside the interactive slider bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayBounds {
    pub mean_step: f64,
    pub std_dev_step: f64,
    pub std_dev: Span,
    pub trials: Span,
    pub success_prob_step: f64,
    pub success_prob: Span,
    pub rate_step: f64,
    pub rate: Span,
}

impl Default for AutoplayBounds {
    fn default() -> Self {
        Self {
            mean_step: 0.2,
            std_dev_step: 0.1,
            std_dev: Span::new(0.2, 3.0),
            trials: Span::new(5.0, 50.0),
            success_prob_step: 0.05,
            success_prob: Span::new(0.1, 0.9),
            rate_step: 0.25,
            rate: Span::new(0.5, 15.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MontageConfig {
    pub slide_ms: u64,
    pub skip_delay_ms: u64,
    pub canvas: CanvasConfig,
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            slide_ms: 5000,
            skip_delay_ms: 2000,
            canvas: CanvasConfig {
                width: 600.0,
                ..CanvasConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = VizConfig::default();
        assert_eq!(config.canvas.frame(), ChartFrame::new(800.0, 400.0, 40.0));
        assert_eq!(config.autoplay.nudge_interval_ms, 300);
        assert_eq!(config.autoplay.cycle_interval_ms, 3000);
        assert_eq!(config.montage.slide_ms, 5000);
        assert_eq!(config.montage.skip_delay_ms, 2000);
        assert_eq!(config.montage.canvas.width, 600.0);
        assert_eq!(config.theme, ThemeName::Interactive);
    }

    #[test]
    fn test_partial_json() {
        let config = VizConfig::from_json_str(
            r#"{"canvas": {"width": 1024}, "theme": "montage", "autoplay": {"bounds": {"rate": {"min": 1.0, "max": 8.0}}}}"#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 1024.0);
        assert_eq!(config.canvas.height, 400.0);
        assert_eq!(config.theme.theme(), ChartTheme::montage());
        assert_eq!(config.autoplay.bounds.rate, Span::new(1.0, 8.0));
        assert_eq!(config.autoplay.bounds.trials, Span::new(5.0, 50.0));
        assert_eq!(config.autoplay.nudge_interval_ms, 300);
    }

    #[test]
    fn test_load() {
        assert_eq!(VizConfig::load(None).unwrap(), VizConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"montage": {"slide_ms": 1000}}"#).unwrap();
        let config = VizConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.montage.slide_ms, 1000);

        assert!(matches!(
            VizConfig::from_json_str("{\"theme\": \"neon\"}"),
            Err(VizError::Json(_))
        ));
        assert!(matches!(
            VizConfig::load(Some(Path::new("/nonexistent/distviz.json"))),
            Err(VizError::Io(_))
        ));
    }
}
