//! Terminal Tetris runner (default binary).
//!
//! Runs the fixed 16 ms tick loop: poll input until the next tick, advance
//! the game, hand its events to storage, render. Logging goes to the file
//! named by `TETRIS_LOG_PATH` because the terminal is in raw mode.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetris_enhanced::core::{CoreEvent, GameSnapshot, GameState};
use tetris_enhanced::input::{handle_key_event, InputCommand, InputContext, KeyBindings, KeybindPanel};
use tetris_enhanced::store::{Autosave, Persistence, RecordKind};
use tetris_enhanced::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetris_enhanced::types::{Overlay, TICK_MS};
use tetris_enhanced::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    if let Some(path) = &config.log_path {
        init_logging(path)?;
    }
    info!(seed = config.seed, "starting");

    let store = Persistence::start(config.store.clone());
    let mut bindings: KeyBindings = store.load(RecordKind::KeyBindings);
    let mut game = GameState::new(config.seed, store.load_progress());

    let mut term = TerminalRenderer::new();
    let result = term
        .enter()
        .and_then(|_| run(&mut term, &mut game, &store, &mut bindings, config.autosave_ms));

    // Always try to restore terminal state.
    let _ = term.exit();

    store.save_progress(game.progress());
    store.shutdown();
    info!("exited");
    result
}

fn init_logging(path: &Path) -> Result<()> {
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
        .init();
    Ok(())
}

fn run(
    term: &mut TerminalRenderer,
    game: &mut GameState,
    store: &Persistence,
    bindings: &mut KeyBindings,
    autosave_ms: u32,
) -> Result<()> {
    let view = GameView::default();
    let mut snapshot = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut autosave = Autosave::new(autosave_ms);
    let mut keybinds = KeybindPanel::new();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        if game.overlay() != Some(Overlay::Settings) {
            keybinds.close();
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        game.snapshot_into(&mut snapshot);
        view.render_into(&snapshot, game.progress(), viewport, &mut fb);
        view.render_keybinds_into(&keybinds, bindings, game.progress(), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    let ctx = input_context(game, &keybinds);
                    match handle_key_event(key, &*bindings, &ctx) {
                        Some(InputCommand::Quit) => {
                            dispatch_events(game, store, bindings);
                            return Ok(());
                        }
                        Some(InputCommand::Game(action)) => {
                            game.apply_action(action);
                        }
                        Some(InputCommand::Keybinds(cmd)) => {
                            if keybinds.apply(cmd, bindings) {
                                store.save(RecordKind::KeyBindings, &*bindings);
                            }
                        }
                        None => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick(TICK_MS);
            if autosave.tick(TICK_MS) && game.phase().in_session() {
                store.save_statistics(&game.progress().statistics);
            }
        }

        dispatch_events(game, store, bindings);
    }
}

fn input_context(game: &GameState, keybinds: &KeybindPanel) -> InputContext {
    let settings = &game.progress().settings;
    InputContext {
        overlay: game.overlay(),
        music_volume: (settings.music_volume * 100.0).round() as u8,
        sfx_volume: (settings.sfx_volume * 100.0).round() as u8,
        keybinds: keybinds.mode(),
    }
}

/// Hand pending core events to storage. A factory reset also drops any
/// custom key bindings.
fn dispatch_events(game: &mut GameState, store: &Persistence, bindings: &mut KeyBindings) {
    for event in game.drain_events() {
        if event == CoreEvent::FactoryReset {
            bindings.reset_to_defaults();
        }
        store.observe(&event, game.progress());
    }
}
