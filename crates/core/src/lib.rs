//! Core library for the Sort Visualiser application.
//!
//! Sorting algorithms are exposed as lazy sequences of [`SortStep`]
//! snapshots ([`engines`]). The [`PlaybackDriver`] pulls those steps on a
//! timer, applies user [`Command`]s and hands every step to a [`Renderer`].
//! Everything that touches the terminal lives in the application crate.

pub mod audio;
pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod mapping;
pub mod render;
pub mod step;
pub mod timeline;

pub use audio::{AudioBackend, AudioCue, AudioEngine, SilentCue};
pub use config::{AppConfig, AudioConfig, DataConfig, DisplayConfig, Palette, Rgb, TimingConfig};
pub use data::DataGenerator;
pub use engines::{Algorithm, EngineOptions, SortOrder, StepSequence};
pub use error::{Result, SortVizError};
pub use mapping::{Binding, Command, Key, KeyMap};
pub use render::{bar_color, layout_bars, Bar, FinishEffect, Hud, Renderer, CONTROLS};
pub use step::{HighlightRole, Phase, SortStep};
pub use timeline::{Flow, PlaybackClock, PlaybackDriver, PlaybackState, StepInterval};
