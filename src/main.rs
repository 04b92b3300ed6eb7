//! shiftris terminal runner (default binary).
//!
//! crossterm for input, the framebuffer renderer for output, and a fixed 16ms
//! simulation step in between.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use shiftris::core::{Phase, Stage, StageSnapshot};
use shiftris::input::{should_quit, InputHandler};
use shiftris::term::{FrameBuffer, GameView, TermPresenter, TerminalRenderer, Viewport};
use shiftris::types::{Command, TICK_MS};
use shiftris::{AppConfig, EventLog};

struct Summary {
    score: u32,
    games: u32,
    events: u64,
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    let mut log = match &config.log_path {
        Some(path) => Some(EventLog::open(path)?),
        None => None,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, log.as_mut());

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Some(log) = log.as_mut() {
        if let Err(e) = log.flush() {
            eprintln!("[shiftris] event log flush failed: {e}");
        }
    }

    let summary = result?;
    eprintln!(
        "[shiftris] seed {} | games {} | last score {}",
        config.stage.seed, summary.games, summary.score
    );
    if let Some(path) = &config.log_path {
        eprintln!("[shiftris] {} events logged to {}", summary.events, path.display());
    }
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    config: &AppConfig,
    mut log: Option<&mut EventLog>,
) -> Result<Summary> {
    let presenter = TermPresenter::new().with_pace_percent(config.animation_pace);
    let mut stage = Stage::with_presenter(config.stage, presenter);

    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut snap = StageSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut clock_ms: u64 = 0;
    let mut summary = Summary {
        score: 0,
        games: 0,
        events: 0,
    };

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        stage.snapshot_into(&mut snap);
        view.render_into(&snap, stage.presenter().fx(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        summary.score = stage.score();
                        return Ok(summary);
                    }
                    if let Some(command) = input.handle_key_event(key) {
                        let startable = matches!(stage.phase(), Phase::Idle | Phase::GameOver);
                        if command == Command::Launch && startable {
                            input.reset();
                            summary.games += 1;
                        }
                        stage.command(command);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            clock_ms += TICK_MS as u64;

            let frame = input.frame(TICK_MS);
            stage.tick(TICK_MS, &frame);
            stage.presenter_mut().advance(TICK_MS);

            if let Some(log) = log.as_deref_mut() {
                let events = stage.drain_events();
                log.record_all(clock_ms, events.as_slice())?;
                summary.events = log.seq();
            } else {
                stage.drain_events().for_each(drop);
            }
        }
    }
}
