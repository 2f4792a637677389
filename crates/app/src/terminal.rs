//! Terminal front end: draws steps with ratatui and runs the event loop.

use std::{
    io::{self, Stdout},
    time::Instant,
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph, Widget},
    Frame, Terminal,
};
use sort_visualiser_core::{
    layout_bars, AppConfig, AudioEngine, Bar, DisplayConfig, FinishEffect, Flow, Hud, Key,
    KeyMap, Palette, PlaybackDriver, PlaybackState, Renderer, Result, Rgb, SortStep, CONTROLS,
};

const EIGHTHS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Runs the interactive visualiser until the user quits.
pub fn run(config: &AppConfig) -> Result<()> {
    // resolved before the alternate screen so a fallback warning stays readable
    let audio = AudioEngine::new(&config.audio);
    let keymap = KeyMap::default();

    let _guard = TerminalGuard::enter()?;
    let renderer = TerminalRenderer::new(CrosstermBackend::new(io::stdout()), &config.display)?;
    let mut driver = PlaybackDriver::new(config, renderer, Box::new(audio));
    driver.start()?;

    let started = Instant::now();
    let frame_interval = config.display.frame_interval();
    loop {
        let frame_start = Instant::now();
        driver.tick(started.elapsed())?;
        driver.renderer_mut().redraw()?;

        let timeout = frame_interval.saturating_sub(frame_start.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if is_interrupt(&key) {
                break;
            }
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(command) = translate(key.code).and_then(|k| keymap.command_for(k)) else {
                continue;
            };
            if driver.handle(command)? == Flow::Quit {
                break;
            }
        }
    }

    tracing::info!("leaving interactive mode");
    Ok(())
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn translate(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Esc => Some(Key::Esc),
        _ => None,
    }
}

/// Puts the terminal into raw mode on the alternate screen and restores it
/// when dropped, including on early returns.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

/// Renderer that keeps the latest step and draws it on demand.
pub struct TerminalRenderer<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    title: String,
    palette: Palette,
    effect: FinishEffect,
    latest: Option<(SortStep<u32>, Hud)>,
    finished_at: Option<Instant>,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(backend: B, display: &DisplayConfig) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            title: display.title.clone(),
            palette: display.palette.clone(),
            effect: FinishEffect::new(display.finish_effect()),
            latest: None,
            finished_at: None,
        })
    }

    pub fn redraw(&mut self) -> Result<()> {
        let finish = self
            .finished_at
            .map(|at| self.effect.color(at.elapsed(), self.palette.sorted));
        self.draw_with(finish)
    }

    fn draw_with(&mut self, finish: Option<Rgb>) -> Result<()> {
        let Some((step, hud)) = &self.latest else {
            return Ok(());
        };
        let view = FrameView {
            title: &self.title,
            palette: &self.palette,
            step,
            hud,
            finish,
        };
        self.terminal.draw(|frame| view.draw(frame))?;
        Ok(())
    }

    #[cfg(test)]
    fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn present(&mut self, step: &SortStep<u32>, hud: &Hud) -> Result<()> {
        if hud.state != PlaybackState::Finished {
            self.finished_at = None;
        }
        self.latest = Some((step.clone(), hud.clone()));
        Ok(())
    }

    fn sorted(&mut self) -> Result<()> {
        self.finished_at = Some(Instant::now());
        tracing::debug!("playing finish effect");
        Ok(())
    }
}

struct FrameView<'a> {
    title: &'a str,
    palette: &'a Palette,
    step: &'a SortStep<u32>,
    hud: &'a Hud,
    finish: Option<Rgb>,
}

impl FrameView<'_> {
    fn draw(&self, frame: &mut Frame) {
        let text = Style::default()
            .fg(color(self.palette.text))
            .bg(color(self.palette.background));
        frame.render_widget(Block::default().style(text), frame.area());

        let [header, bars, caption, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(format!("{}  |  {}", self.hud.title(), self.title)),
                Line::from(self.hud.status_line()),
            ])
            .style(text),
            header,
        );

        let laid_out = layout_bars(self.step, self.palette, self.finish);
        frame.render_widget(BarsView { bars: &laid_out }, bars);

        frame.render_widget(
            Paragraph::new(self.step.description.as_str()).style(text),
            caption,
        );
        frame.render_widget(
            Paragraph::new(CONTROLS.iter().map(|l| Line::from(*l)).collect::<Vec<_>>()).style(text),
            footer,
        );
    }
}

/// One column group per bar, drawn bottom-up with eighth-block precision.
struct BarsView<'a> {
    bars: &'a [Bar],
}

impl Widget for BarsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.bars.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }

        let count = self.bars.len();
        let width = usize::from(area.width);
        let rows = usize::from(area.height);

        for x in 0..width {
            // wide areas give each bar a run of columns and leave a gap
            // between bars; narrow ones sample every nth bar
            let index = x * count / width;
            let first_column = index * width / count;
            let columns = (index + 1) * width / count - first_column;
            if columns > 2 && x == first_column + columns - 1 {
                continue;
            }

            let bar = self.bars[index];
            let eighths = (bar.height.clamp(0.0, 1.0) * (rows * 8) as f32).round() as usize;
            for row in 0..rows {
                let filled = eighths.saturating_sub(row * 8).min(8);
                if filled == 0 {
                    break;
                }
                let y = area.bottom() - 1 - row as u16;
                if let Some(cell) = buf.cell_mut((area.x + x as u16, y)) {
                    cell.set_symbol(EIGHTHS[filled - 1]).set_fg(color(bar.color));
                }
            }
        }
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}
