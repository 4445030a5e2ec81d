//! Save slots and highscores through the facade, on a temp directory.

use blockfall::core::{GameSession, SessionConfig};
use blockfall::save::{HighscoreEntry, HighscoreTable, SaveStore, SavedGame};
use blockfall::types::GameInput;
use blockfall::AppConfig;

fn played_session(seed: u32, drops: usize) -> GameSession {
    let mut session = GameSession::new(SessionConfig::with_seed(seed));
    session.start();
    for i in 0..drops {
        if i % 2 == 0 {
            session.press(GameInput::MoveLeft);
            session.release(GameInput::MoveLeft);
        }
        session.hard_drop();
    }
    session
}

#[test]
fn quicksave_then_resume_in_a_new_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::from_lookup(|key| {
        (key == "BLOCKFALL_DATA_DIR").then(|| dir.path().display().to_string())
    });

    let session = played_session(5, 6);
    assert!(!session.game_over());

    {
        let store = SaveStore::open(config.save_dir()).unwrap();
        let game = SavedGame::capture(&session, &config.player).unwrap();
        store.save("quicksave", &game).unwrap();
    }

    let store = SaveStore::open(config.save_dir()).unwrap();
    assert_eq!(store.list().unwrap(), vec!["quicksave"]);
    let mut resumed = store
        .load("quicksave")
        .unwrap()
        .resume(config.session_config(999))
        .unwrap();

    assert_eq!(resumed.seed(), 5);
    assert_eq!(resumed.score(), session.score());
    assert_eq!(resumed.lines(), session.lines());
    assert_eq!(resumed.snapshot().board, session.snapshot().board);
    assert_eq!(resumed.next_piece(), session.next_piece());

    let locked = resumed.pieces_locked();
    assert!(resumed.hard_drop());
    assert_eq!(resumed.pieces_locked(), locked + 1);
}

#[test]
fn edited_save_with_bad_mino_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = SaveStore::open(dir.path()).unwrap();
    let mut game = SavedGame::capture(&played_session(9, 3), "ada").unwrap();
    game.minos[0].x = 10;
    store.save("edited", &game).unwrap();

    let err = store
        .load("edited")
        .unwrap()
        .resume(SessionConfig::default())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("outside the board"));
}

#[test]
fn highscores_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscores.json");

    let mut table = HighscoreTable::load(&path);
    for (name, score) in [("ada", 500), ("bob", 1500), ("cy", 900)] {
        table.insert(HighscoreEntry {
            name: name.to_string(),
            score,
            lines: 0,
            achieved_at: blockfall::save::unix_now(),
        });
    }
    table.save(&path).unwrap();

    let reloaded = HighscoreTable::load(&path);
    let names: Vec<_> = reloaded.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["bob", "cy", "ada"]);
    assert_eq!(reloaded.best(), Some(1500));
}
