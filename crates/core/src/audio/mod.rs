use std::{
    cell::Cell,
    io::{self, IsTerminal, Write},
    time::{Duration, Instant},
};

use crate::AudioConfig;

/// Fire-and-forget sound played when a step carries a swap.
///
/// Implementations must return immediately and swallow their own failures;
/// the playback driver never waits on audio.
pub trait AudioCue {
    fn play(&self);
}

/// Cue that does nothing. Used when audio is disabled or unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self) {}
}

/// Backend selected for the audio engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioBackend {
    /// Rings the terminal bell on stderr.
    Bell,
    Silent,
}

/// High level audio engine façade.
#[derive(Debug)]
pub struct AudioEngine {
    backend: AudioBackend,
    min_interval: Duration,
    last_cue: Cell<Option<Instant>>,
}

impl AudioEngine {
    /// Resolves the backend for the given configuration.
    ///
    /// An unavailable backend is not an error: the engine falls back to
    /// silence and the visualisation carries on.
    pub fn new(config: &AudioConfig) -> Self {
        let backend = if !config.enabled {
            AudioBackend::Silent
        } else if io::stderr().is_terminal() {
            AudioBackend::Bell
        } else {
            tracing::warn!("stderr is not a terminal, continuing without audio cues");
            AudioBackend::Silent
        };

        Self::with_backend(backend, config.min_interval())
    }

    pub fn with_backend(backend: AudioBackend, min_interval: Duration) -> Self {
        Self {
            backend,
            min_interval,
            last_cue: Cell::new(None),
        }
    }

    pub fn silent() -> Self {
        Self::with_backend(AudioBackend::Silent, Duration::ZERO)
    }

    pub fn backend(&self) -> AudioBackend {
        self.backend
    }

    pub fn is_enabled(&self) -> bool {
        self.backend != AudioBackend::Silent
    }

    /// Claims the cue slot at `now`, refusing cues that arrive within the
    /// configured minimum interval of the previous one.
    fn claim(&self, now: Instant) -> bool {
        let ready = self
            .last_cue
            .get()
            .map(|last| now.duration_since(last) >= self.min_interval)
            .unwrap_or(true);
        if ready {
            self.last_cue.set(Some(now));
        }
        ready
    }

    fn ring_bell() -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()
    }
}

impl AudioCue for AudioEngine {
    fn play(&self) {
        if !self.is_enabled() || !self.claim(Instant::now()) {
            return;
        }

        if let Err(error) = Self::ring_bell() {
            tracing::debug!(%error, "dropping audio cue");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_is_silent() {
        let audio = AudioEngine::new(&AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        });
        assert_eq!(audio.backend(), AudioBackend::Silent);
        assert!(!audio.is_enabled());
        audio.play();
    }

    #[test]
    fn throttles_cues_within_min_interval() {
        let audio = AudioEngine::with_backend(AudioBackend::Bell, Duration::from_millis(50));
        let start = Instant::now();

        assert!(audio.claim(start));
        assert!(!audio.claim(start + Duration::from_millis(10)));
        assert!(audio.claim(start + Duration::from_millis(60)));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let audio = AudioEngine::with_backend(AudioBackend::Bell, Duration::ZERO);
        let now = Instant::now();
        assert!(audio.claim(now));
        assert!(audio.claim(now));
    }
}
