use std::{f32::consts::PI, time::Duration};

use crate::{Algorithm, HighlightRole, Palette, PlaybackState, Result, Rgb, SortStep};

/// Help text shown below the bars.
pub const CONTROLS: [&str; 2] = [
    "Controls: 1-Bubble 2-Insertion 3-Selection 4-Quick 5-Merge",
    "R-Restart  +/- Adjust Speed  SPACE Pause/Resume  ESC Quit",
];

const FINISH_GLOW: f32 = 40.0;

/// Rendering backend abstraction.
///
/// The step and the heads-up data are the whole contract: a renderer never
/// sees engine internals.
pub trait Renderer {
    /// Draws a step. Called once per step and again whenever the heads-up
    /// data changes.
    fn present(&mut self, step: &SortStep<u32>, hud: &Hud) -> Result<()>;

    /// Called exactly once when a run reaches the finished state.
    fn sorted(&mut self) -> Result<()>;
}

/// Driver state shown alongside the bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub algorithm: Algorithm,
    pub delay: Duration,
    pub len: usize,
    pub state: PlaybackState,
    /// Steps emitted by the current run.
    pub steps: usize,
}

impl Hud {
    pub fn title(&self) -> String {
        format!("Algorithm: {}", self.algorithm.name())
    }

    pub fn status_line(&self) -> String {
        format!(
            "Delay: {} ms | Size: {} | Steps: {} | {}",
            self.delay.as_millis(),
            self.len,
            self.steps,
            self.state
        )
    }
}

/// One bar ready to be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub value: u32,
    /// Height relative to the tallest value, in `[0, 1]`.
    pub height: f32,
    pub color: Rgb,
}

/// Lays out one bar per value. `finish` overrides every colour while the
/// finish effect is showing.
pub fn layout_bars(step: &SortStep<u32>, palette: &Palette, finish: Option<Rgb>) -> Vec<Bar> {
    let max = step.values.iter().copied().max().unwrap_or(0).max(1) as f32;
    step.values
        .iter()
        .enumerate()
        .map(|(index, &value)| Bar {
            value,
            height: value as f32 / max,
            color: finish.unwrap_or_else(|| bar_color(step, index, palette)),
        })
        .collect()
}

/// Highlight roles take precedence over the sorted set, which takes
/// precedence over the base colour.
pub fn bar_color<T>(step: &SortStep<T>, index: usize, palette: &Palette) -> Rgb {
    match step.role_of(index) {
        Some(HighlightRole::Compare) => palette.compare,
        Some(HighlightRole::Swap) => palette.swap,
        Some(HighlightRole::Pivot) => palette.pivot,
        Some(HighlightRole::Sorted) => palette.sorted,
        None if step.sorted.contains(&index) => palette.sorted,
        None => palette.bar,
    }
}

/// Brief pulse played over the whole array once a run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishEffect {
    duration: Duration,
}

impl FinishEffect {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Colour of every bar `elapsed` after the sorted notification. Holds
    /// the plain sorted colour once the effect has run its course.
    pub fn color(&self, elapsed: Duration, sorted: Rgb) -> Rgb {
        if self.duration.is_zero() || elapsed > self.duration {
            return sorted;
        }
        let phase = elapsed.as_secs_f32() / self.duration.as_secs_f32() * PI;
        let glow = 0.5 * (1.0 + (phase * 4.0).sin());
        sorted.boosted((glow * FINISH_GLOW).round() as u8)
    }
}
