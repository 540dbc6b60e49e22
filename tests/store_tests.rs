//! Storage round-trips driven by real game sessions.

use std::time::Duration;

use tetris_enhanced::core::{AchievementId, GameState, Progress};
use crossterm::event::{KeyCode, KeyEvent};
use tetris_enhanced::input::{
    handle_key_event, BindableAction, InputCommand, InputContext, Key, KeyBindings, KeybindPanel,
};
use tetris_enhanced::store::{Persistence, RecordKind, StoreConfig};
use tetris_enhanced::types::{GameAction, Overlay, Phase, SettingChange, COUNTDOWN_STEP_MS};

fn store(dir: &std::path::Path) -> Persistence {
    let mut config = StoreConfig::in_dir(dir);
    config.shutdown_timeout = Duration::from_secs(5);
    Persistence::start(config)
}

/// Apply an action and forward the resulting events to storage
fn act(state: &mut GameState, store: &Persistence, action: GameAction) {
    state.apply_action(action);
    forward(state, store);
}

fn forward(state: &mut GameState, store: &Persistence) {
    for event in state.drain_events() {
        store.observe(&event, state.progress());
    }
}

#[test]
fn test_finished_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());
    let mut state = GameState::new(77, p.load_progress());

    act(&mut state, &p, GameAction::Start);
    state.tick(3 * COUNTDOWN_STEP_MS);
    forward(&mut state, &p);
    while state.phase() == Phase::Playing {
        state.tick(16);
        act(&mut state, &p, GameAction::HardDrop);
    }
    p.shutdown();

    let before = state.into_progress();
    let loaded = store(dir.path()).load_progress();

    assert_eq!(loaded.statistics, before.statistics.persisted());
    assert_eq!(loaded.statistics.games_played, 1);
    assert!(loaded.statistics.total_game_time > 0);
    assert_eq!(loaded.achievements, before.achievements);
    assert!(loaded.achievements.is_unlocked(AchievementId::FirstPiece));
    assert_eq!(loaded.leaderboard, before.leaderboard);
    assert_eq!(loaded.leaderboard.len(), 1);
}

#[test]
fn test_settings_changes_are_saved() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());
    let mut state = GameState::new(1, p.load_progress());

    act(&mut state, &p, GameAction::ToggleOverlay(Overlay::Settings));
    act(&mut state, &p, GameAction::ChangeSetting(SettingChange::ToggleGhost));
    act(&mut state, &p, GameAction::ChangeSetting(SettingChange::MusicVolume(20)));
    assert!(p.flush());

    let loaded = p.load_progress();
    assert!(!loaded.settings.show_ghost);
    assert_eq!(loaded.settings.music_volume, 0.2);
}

#[test]
fn test_key_bindings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());

    let mut bindings = KeyBindings::default();
    bindings.set_key(BindableAction::Rotate, Key::Char('w')).unwrap();
    assert!(p.save(RecordKind::KeyBindings, &bindings));
    assert!(p.flush());

    let loaded: KeyBindings = p.load(RecordKind::KeyBindings);
    assert_eq!(loaded, bindings);
}

#[test]
fn test_factory_reset_wipes_files() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());

    let mut progress = Progress::default();
    progress.leaderboard.add_score(1500, 2, 14);
    progress.achievements.unlock(AchievementId::NeonMaster);
    p.save_progress(&progress);
    p.save(RecordKind::KeyBindings, &KeyBindings::default());
    assert!(p.flush());

    let mut state = GameState::new(1, p.load_progress());
    assert_eq!(state.progress().leaderboard.len(), 1);

    act(&mut state, &p, GameAction::FactoryReset);
    assert!(p.flush());

    for kind in RecordKind::ALL {
        assert!(!p.config().path_for(kind).exists(), "{} survived", kind.as_str());
    }
    assert_eq!(state.progress(), &Progress::default());
    assert_eq!(p.load_progress(), Progress::default());
}

#[test]
fn test_corrupt_record_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());

    let mut progress = Progress::default();
    progress.leaderboard.add_score(300, 1, 3);
    p.save_progress(&progress);
    assert!(p.flush());

    std::fs::write(p.config().path_for(RecordKind::Statistics), br#"{"games_played": "many"}"#).unwrap();

    let loaded = p.load_progress();
    assert_eq!(loaded.statistics, Default::default());
    assert_eq!(loaded.leaderboard, progress.leaderboard);
}

#[test]
fn test_bindings_sharing_a_key_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(p.config().path_for(RecordKind::KeyBindings), br#"{"rotate": "Space"}"#).unwrap();

    let loaded: KeyBindings = p.load(RecordKind::KeyBindings);
    assert_eq!(loaded, KeyBindings::default());
    assert_eq!(loaded.action_for_key(Key::Space), Some(BindableAction::HardDrop));
}

#[test]
fn test_rebind_in_settings_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let p = store(dir.path());
    let mut state = GameState::new(1, p.load_progress());
    let mut bindings: KeyBindings = p.load(RecordKind::KeyBindings);
    let mut panel = KeybindPanel::new();
    act(&mut state, &p, GameAction::ToggleOverlay(Overlay::Settings));

    for code in [KeyCode::Char('k'), KeyCode::Down, KeyCode::Enter, KeyCode::Char('d')] {
        let ctx = InputContext {
            overlay: state.overlay(),
            keybinds: panel.mode(),
            ..InputContext::default()
        };
        let Some(InputCommand::Keybinds(cmd)) = handle_key_event(KeyEvent::from(code), &bindings, &ctx) else {
            panic!("{code:?} not handled by the panel");
        };
        if panel.apply(cmd, &mut bindings) {
            p.save(RecordKind::KeyBindings, &bindings);
        }
    }
    assert!(p.flush());

    let loaded: KeyBindings = p.load(RecordKind::KeyBindings);
    assert_eq!(loaded.key_for(BindableAction::Right), Key::Char('d'));
    assert_eq!(loaded.action_for_key(Key::Char('d')), Some(BindableAction::Right));
}
