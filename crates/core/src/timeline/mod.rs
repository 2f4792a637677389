//! Playback driver: paces step consumption and applies user commands.
//!
//! The driver is a small state machine:
//!
//! ```text
//!            select / reshuffle (any state)
//!                      │
//!                      ▼
//!   Idle ──start──▶ Running ──exhausted──▶ Finished
//!                   ▲     │
//!        pause      │     │ pause
//!                   │     ▼
//!                   Paused
//! ```
//!
//! Time is passed in by the caller through [`PlaybackDriver::tick`], so the
//! driver never reads a clock itself.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    Algorithm, AppConfig, AudioCue, Command, DataGenerator, EngineOptions, HighlightRole, Hud,
    Renderer, Result, SortStep, StepSequence, TimingConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Running => "Running",
            PlaybackState::Paused => "Paused",
            PlaybackState::Finished => "Sorted",
        };
        f.write_str(label)
    }
}

/// Whether the event loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Monotonic time as last reported by the event loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaybackClock {
    now: Duration,
}

impl PlaybackClock {
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward. Readings older than the current time are
    /// ignored.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

/// Animation delay bounded by the configured floor and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInterval {
    current: Duration,
    min: Duration,
    max: Duration,
    step: Duration,
}

impl StepInterval {
    pub fn new(timing: &TimingConfig) -> Self {
        let (min, max) = (timing.min_delay(), timing.max_delay().max(timing.min_delay()));
        Self {
            current: timing.initial_delay().clamp(min, max),
            min,
            max,
            step: timing.delay_step(),
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn faster(&mut self) {
        self.current = self.current.saturating_sub(self.step).max(self.min);
    }

    pub fn slower(&mut self) {
        self.current = (self.current + self.step).min(self.max);
    }
}

/// Pulls steps from the active engine on a timer and forwards them to the
/// renderer.
pub struct PlaybackDriver<R> {
    renderer: R,
    audio: Box<dyn AudioCue>,
    generator: DataGenerator,
    options: EngineOptions,
    algorithm: Algorithm,
    data: Vec<u32>,
    sequence: Option<StepSequence<u32>>,
    current: SortStep<u32>,
    state: PlaybackState,
    interval: StepInterval,
    clock: PlaybackClock,
    last_advance: Duration,
}

impl<R: Renderer> PlaybackDriver<R> {
    /// Creates an idle driver over a freshly generated array.
    pub fn new(config: &AppConfig, renderer: R, audio: Box<dyn AudioCue>) -> Self {
        let mut generator = DataGenerator::new(&config.data);
        let data = generator.generate();
        Self::with_parts(config, generator, data, renderer, audio)
    }

    /// Creates an idle driver over a caller-provided array. Reshuffles still
    /// draw from the configured generator.
    pub fn with_data(
        config: &AppConfig,
        data: Vec<u32>,
        renderer: R,
        audio: Box<dyn AudioCue>,
    ) -> Self {
        let generator = DataGenerator::new(&config.data);
        Self::with_parts(config, generator, data, renderer, audio)
    }

    fn with_parts(
        config: &AppConfig,
        generator: DataGenerator,
        data: Vec<u32>,
        renderer: R,
        audio: Box<dyn AudioCue>,
    ) -> Self {
        Self {
            renderer,
            audio,
            generator,
            options: EngineOptions {
                order: config.order,
                bubble_early_exit: config.bubble_early_exit,
            },
            algorithm: config.initial_algorithm,
            current: SortStep::initial(&data),
            data,
            sequence: None,
            state: PlaybackState::Idle,
            interval: StepInterval::new(&config.timing),
            clock: PlaybackClock::default(),
            last_advance: Duration::ZERO,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn delay(&self) -> Duration {
        self.interval.current()
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Step currently on screen.
    pub fn current_step(&self) -> &SortStep<u32> {
        &self.current
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn hud(&self) -> Hud {
        Hud {
            algorithm: self.algorithm,
            delay: self.interval.current(),
            len: self.data.len(),
            state: self.state,
            steps: self.sequence.as_ref().map_or(0, StepSequence::emitted),
        }
    }

    /// Starts the selected algorithm from its first step over the current
    /// array.
    pub fn start(&mut self) -> Result<()> {
        self.state = PlaybackState::Idle;
        self.sequence = None;
        self.current = SortStep::initial(&self.data);

        match self.algorithm.steps_with(&self.data, self.options) {
            Ok(sequence) => {
                tracing::info!(
                    algorithm = %self.algorithm,
                    len = self.data.len(),
                    "starting sort"
                );
                self.sequence = Some(sequence);
                self.state = PlaybackState::Running;
                self.last_advance = self.clock.now();
            }
            Err(error) => {
                tracing::warn!(%error, algorithm = %self.algorithm, "cannot start sort");
            }
        }

        self.present()
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        tracing::debug!(?command, state = %self.state, "handling command");
        match command {
            Command::SelectAlgorithm(algorithm) => {
                self.algorithm = algorithm;
                self.start()?;
            }
            Command::Reshuffle => {
                self.data = self.generator.generate();
                self.start()?;
            }
            Command::PauseToggle => {
                self.state = match self.state {
                    PlaybackState::Running => PlaybackState::Paused,
                    PlaybackState::Paused => {
                        self.last_advance = self.clock.now();
                        PlaybackState::Running
                    }
                    other => other,
                };
                self.present()?;
            }
            Command::SpeedUp => {
                self.interval.faster();
                self.present()?;
            }
            Command::SpeedDown => {
                self.interval.slower();
                self.present()?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Advances by at most one step once the delay has elapsed since the
    /// previous step. Returns whether a new step was presented.
    pub fn tick(&mut self, now: Duration) -> Result<bool> {
        self.clock.advance_to(now);

        if self.state != PlaybackState::Running {
            return Ok(false);
        }
        if self.clock.now().saturating_sub(self.last_advance) < self.interval.current() {
            return Ok(false);
        }

        self.advance()
    }

    fn advance(&mut self) -> Result<bool> {
        let Some(sequence) = self.sequence.as_mut() else {
            return Ok(false);
        };

        match sequence.next() {
            Some(step) => {
                if step.has_role(HighlightRole::Swap) {
                    self.audio.play();
                }
                self.current = step;
                self.last_advance = self.clock.now();
                self.present()?;
                Ok(true)
            }
            None => {
                tracing::info!(
                    algorithm = %self.algorithm,
                    steps = sequence.emitted(),
                    "sort finished"
                );
                self.state = PlaybackState::Finished;
                self.present()?;
                self.renderer.sorted()?;
                Ok(false)
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        let hud = self.hud();
        self.renderer.present(&self.current, &hud)
    }
}

impl<R: fmt::Debug> fmt::Debug for PlaybackDriver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackDriver")
            .field("renderer", &self.renderer)
            .field("algorithm", &self.algorithm)
            .field("state", &self.state)
            .field("len", &self.data.len())
            .field("interval", &self.interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::SortOrder;

    #[derive(Debug, Default)]
    struct RecordingRenderer {
        presented: Vec<(SortStep<u32>, Hud)>,
        sorted_calls: usize,
    }

    impl RecordingRenderer {
        /// Distinct steps shown, ignoring re-presentations of the same step.
        fn steps(&self) -> Vec<&SortStep<u32>> {
            let mut steps: Vec<&SortStep<u32>> = Vec::new();
            for (step, hud) in &self.presented {
                if hud.steps > 0 && steps.last().map_or(true, |last| *last != step) {
                    steps.push(step);
                }
            }
            steps
        }
    }

    impl Renderer for RecordingRenderer {
        fn present(&mut self, step: &SortStep<u32>, hud: &Hud) -> Result<()> {
            self.presented.push((step.clone(), hud.clone()));
            Ok(())
        }

        fn sorted(&mut self) -> Result<()> {
            self.sorted_calls += 1;
            Ok(())
        }
    }

    struct CountingCue(Rc<Cell<usize>>);

    impl AudioCue for CountingCue {
        fn play(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.data.len = 20;
        config.data.seed = Some(3);
        config
    }

    fn driver(data: Vec<u32>) -> (PlaybackDriver<RecordingRenderer>, Rc<Cell<usize>>) {
        let cues = Rc::new(Cell::new(0));
        let driver = PlaybackDriver::with_data(
            &config(),
            data,
            RecordingRenderer::default(),
            Box::new(CountingCue(cues.clone())),
        );
        (driver, cues)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Ticks once per delay until the driver leaves the running state.
    fn run_to_end(driver: &mut PlaybackDriver<RecordingRenderer>, mut now: Duration) -> Duration {
        while driver.state() == PlaybackState::Running {
            now += driver.delay();
            driver.tick(now).unwrap();
        }
        now
    }

    #[test]
    fn starts_idle_and_runs_on_selection() {
        let (mut driver, _) = driver(vec![3, 1, 2]);
        assert_eq!(driver.state(), PlaybackState::Idle);
        assert!(!driver.tick(ms(1_000)).unwrap());

        driver
            .handle(Command::SelectAlgorithm(Algorithm::Insertion))
            .unwrap();
        assert_eq!(driver.state(), PlaybackState::Running);
        assert_eq!(driver.algorithm(), Algorithm::Insertion);
    }

    #[test]
    fn advances_one_step_per_elapsed_delay() {
        let (mut driver, _) = driver(vec![3, 1, 2]);
        driver.start().unwrap();

        assert!(!driver.tick(ms(10)).unwrap());
        assert!(driver.tick(ms(40)).unwrap());
        assert!(!driver.tick(ms(79)).unwrap());
        assert!(driver.tick(ms(80)).unwrap());
        // a long stall still yields a single step
        assert!(driver.tick(ms(10_000)).unwrap());
        assert_eq!(driver.hud().steps, 3);
    }

    #[test]
    fn paused_driver_ignores_ticks() {
        let (mut driver, _) = driver(vec![5, 4, 3, 2, 1]);
        driver.start().unwrap();
        driver.tick(ms(40)).unwrap();
        driver.handle(Command::PauseToggle).unwrap();
        assert_eq!(driver.state(), PlaybackState::Paused);

        let shown = driver.current_step().clone();
        let before = driver.renderer().steps().len();
        for t in 1..50 {
            assert!(!driver.tick(ms(40 + t * 40)).unwrap());
        }
        assert_eq!(driver.renderer().steps().len(), before);
        assert_eq!(driver.current_step(), &shown);

        driver.handle(Command::PauseToggle).unwrap();
        assert_eq!(driver.state(), PlaybackState::Running);
        assert!(driver.tick(ms(5_000)).unwrap());
        assert_eq!(driver.renderer().steps().len(), before + 1);
    }

    #[test]
    fn speed_up_is_clamped_to_the_floor() {
        let (mut driver, _) = driver(vec![1]);
        let mut previous = driver.delay();
        for _ in 0..20 {
            driver.handle(Command::SpeedUp).unwrap();
            let delay = driver.delay();
            assert!(delay >= ms(5));
            assert!(delay < previous || delay == ms(5));
            previous = delay;
        }
        assert_eq!(driver.delay(), ms(5));
    }

    #[test]
    fn speed_down_is_clamped_to_the_ceiling() {
        let (mut driver, _) = driver(vec![1]);
        for _ in 0..100 {
            driver.handle(Command::SpeedDown).unwrap();
        }
        assert_eq!(driver.delay(), ms(200));
        driver.handle(Command::SpeedUp).unwrap();
        assert_eq!(driver.delay(), ms(195));
    }

    #[test]
    fn finishing_signals_sorted_once() {
        let (mut driver, _) = driver(vec![4, 2, 3, 1]);
        driver
            .handle(Command::SelectAlgorithm(Algorithm::Merge))
            .unwrap();
        let now = run_to_end(&mut driver, Duration::ZERO);

        assert_eq!(driver.state(), PlaybackState::Finished);
        assert_eq!(driver.renderer().sorted_calls, 1);
        assert!(driver.current_step().is_complete());
        assert_eq!(driver.current_step().values, vec![1, 2, 3, 4]);

        // advancing after the end is a no-op
        let presented = driver.renderer().presented.len();
        assert!(!driver.tick(now + ms(1_000)).unwrap());
        driver.handle(Command::PauseToggle).unwrap();
        assert_eq!(driver.state(), PlaybackState::Finished);
        assert_eq!(driver.renderer().sorted_calls, 1);
        assert_eq!(driver.renderer().presented.len(), presented + 1);
    }

    #[test]
    fn forwards_every_step_in_order() {
        let data = vec![9, 3, 7, 1, 5];
        let (mut driver, _) = driver(data.clone());
        driver
            .handle(Command::SelectAlgorithm(Algorithm::Quick))
            .unwrap();
        run_to_end(&mut driver, Duration::ZERO);

        let expected: Vec<SortStep<u32>> = Algorithm::Quick
            .steps(&data, SortOrder::Ascending)
            .unwrap()
            .collect();
        let shown: Vec<SortStep<u32>> = driver.renderer().steps().into_iter().cloned().collect();
        assert_eq!(shown, expected);
    }

    #[test]
    fn switching_keeps_the_array_and_restarts() {
        let data = vec![6, 2, 9, 1];
        let (mut driver, _) = driver(data.clone());
        driver.start().unwrap();
        driver.tick(ms(40)).unwrap();
        driver.tick(ms(80)).unwrap();

        driver
            .handle(Command::SelectAlgorithm(Algorithm::Selection))
            .unwrap();
        assert_eq!(driver.data(), data.as_slice());
        assert_eq!(driver.state(), PlaybackState::Running);
        assert_eq!(driver.hud().steps, 0);
        assert_eq!(driver.current_step(), &SortStep::initial(&data));
    }

    #[test]
    fn reshuffle_draws_a_new_array() {
        let data = vec![1; 20];
        let (mut driver, _) = driver(data.clone());
        driver.start().unwrap();
        run_to_end(&mut driver, Duration::ZERO);

        driver.handle(Command::Reshuffle).unwrap();
        assert_eq!(driver.state(), PlaybackState::Running);
        assert_eq!(driver.data().len(), 20);
        assert_ne!(driver.data(), data.as_slice());
        assert!(driver.data().iter().all(|v| (10..=440).contains(v)));
    }

    #[test]
    fn cues_play_for_swap_steps_only() {
        let (mut driver, cues) = driver(vec![3, 2, 1]);
        driver.start().unwrap();
        run_to_end(&mut driver, Duration::ZERO);

        let swaps = driver
            .renderer()
            .steps()
            .iter()
            .filter(|s| s.has_role(HighlightRole::Swap))
            .count();
        assert!(swaps > 0);
        assert_eq!(cues.get(), swaps);
    }

    #[test]
    fn quit_stops_the_loop() {
        let (mut driver, _) = driver(vec![2, 1]);
        assert_eq!(driver.handle(Command::Quit).unwrap(), Flow::Quit);
        assert_eq!(driver.handle(Command::SpeedUp).unwrap(), Flow::Continue);
    }

    #[test]
    fn hud_reflects_driver_state() {
        let (mut driver, _) = driver(vec![2, 1]);
        driver.start().unwrap();
        driver.handle(Command::PauseToggle).unwrap();
        let (_, hud) = driver.renderer().presented.last().unwrap();
        assert_eq!(hud.state, PlaybackState::Paused);
        assert_eq!(hud.len, 2);
        assert_eq!(hud.delay, ms(40));
    }
}
