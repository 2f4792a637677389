use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Algorithm, Result, SortOrder, SortVizError};

/// Top-level configuration structure for the application.
///
/// Every section falls back to its defaults, so a configuration file only
/// needs to mention the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub display: DisplayConfig,
    pub order: SortOrder,
    pub initial_algorithm: Algorithm,
    pub bubble_early_exit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            timing: TimingConfig::default(),
            audio: AudioConfig::default(),
            display: DisplayConfig::default(),
            order: SortOrder::Ascending,
            initial_algorithm: Algorithm::Bubble,
            bubble_early_exit: true,
        }
    }
}

impl AppConfig {
    /// Reads a JSON configuration file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;
        self.timing.validate()?;
        self.display.validate()
    }
}

/// Shape of the randomly generated input array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub len: usize,
    pub min_value: u32,
    pub max_value: u32,
    /// Fixed seed for reproducible shuffles; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            len: 100,
            min_value: 10,
            max_value: 440,
            seed: None,
        }
    }
}

impl DataConfig {
    fn validate(&self) -> Result<()> {
        if self.min_value > self.max_value {
            return Err(SortVizError::invalid_config(format!(
                "data.min_value ({}) exceeds data.max_value ({})",
                self.min_value, self.max_value
            )));
        }
        Ok(())
    }
}

/// Animation pacing, in milliseconds. Lower delays animate faster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub initial_delay_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub delay_step_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 40,
            min_delay_ms: 5,
            max_delay_ms: 200,
            delay_step_ms: 5,
        }
    }
}

impl TimingConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn delay_step(&self) -> Duration {
        Duration::from_millis(self.delay_step_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.min_delay_ms == 0 {
            return Err(SortVizError::invalid_config(
                "timing.min_delay_ms must be positive",
            ));
        }
        if self.delay_step_ms == 0 {
            return Err(SortVizError::invalid_config(
                "timing.delay_step_ms must be positive",
            ));
        }
        if !(self.min_delay_ms..=self.max_delay_ms).contains(&self.initial_delay_ms) {
            return Err(SortVizError::invalid_config(format!(
                "timing.initial_delay_ms ({}) must lie within {}..={}",
                self.initial_delay_ms, self.min_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}

/// Configuration specific to the audio cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Cues closer together than this are dropped.
    pub min_interval_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_ms: 50,
        }
    }
}

impl AudioConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub palette: Palette,
    pub finish_effect_ms: u64,
    pub frame_rate: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Sorting Algorithms Visualizer".to_string(),
            palette: Palette::default(),
            finish_effect_ms: 1200,
            frame_rate: 60,
        }
    }
}

impl DisplayConfig {
    pub fn finish_effect(&self) -> Duration {
        Duration::from_millis(self.finish_effect_ms)
    }

    /// Time budget of one frame of the event loop.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(SortVizError::invalid_config(
                "display.frame_rate must be positive",
            ));
        }
        Ok(())
    }
}

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Brightens every channel by `amount`, saturating at 255.
    pub fn boosted(self, amount: u8) -> Self {
        Self(
            self.0.saturating_add(amount),
            self.1.saturating_add(amount),
            self.2.saturating_add(amount),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub bar: Rgb,
    pub compare: Rgb,
    pub swap: Rgb,
    pub pivot: Rgb,
    pub sorted: Rgb,
    pub text: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(24, 24, 24),
            bar: Rgb(100, 180, 255),
            compare: Rgb(255, 99, 71),
            swap: Rgb(255, 215, 0),
            pivot: Rgb(186, 85, 211),
            sorted: Rgb(80, 220, 120),
            text: Rgb(230, 230, 230),
        }
    }
}
