//! Terminal jigsaw runner.
//!
//! Reads configuration from the environment, then runs a fixed-rate loop:
//! draw, poll input until the next frame, advance game time.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use tui_jigsaw::app::{App, AppConfig};
use tui_jigsaw::engine::JsonDirStore;
use tui_jigsaw::input::{map_key, should_quit};
use tui_jigsaw::term::{FrameBuffer, TerminalRenderer, Viewport};
use tui_jigsaw::types::FRAME_MS;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    if let Some(path) = &config.log_path {
        init_tracing(path)?;
    }

    let mut app = App::new(&config, JsonDirStore::new(config.save_dir.clone()));

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

/// Log to a file; the terminal itself is owned by the renderer.
fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, app: &mut App<JsonDirStore>) -> Result<()> {
    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut last_tick = Instant::now();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.render_into(Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;
        if app.take_bell() {
            let mut out = io::stdout();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        // Input with timeout until next frame.
        let timeout = frame.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(intent) = map_key(key) {
                        app.handle_intent(intent);
                    }
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Advance time in whole milliseconds, carrying the remainder.
        let elapsed_ms = last_tick.elapsed().as_millis() as u32;
        if elapsed_ms >= FRAME_MS {
            app.tick(elapsed_ms);
            last_tick += Duration::from_millis(elapsed_ms as u64);
        }
    }
}
