//! Terminal blockfall runner (default binary).
//!
//! Crossterm for input, the framebuffer renderer for output, a fixed 16 ms
//! tick for the session. Logs go to a file in the data directory since the
//! terminal owns stdout.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blockfall::core::{GameSession, GameSnapshot};
use blockfall::input::{Command, InputEvent, KeyBindings, KeyTracker};
use blockfall::save::{unix_now, HighscoreEntry, HighscoreTable, SaveStore, SavedGame};
use blockfall::term::{FrameBuffer, GameView, PanelInfo, TerminalRenderer, Viewport};
use blockfall::types::{GameEvent, TICK_MS};
use blockfall::AppConfig;

const QUICKSAVE_SLOT: &str = "quicksave";
const MESSAGE_MS: u32 = 2000;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
    init_logging(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        error!(error = %format!("{:#}", e), "blockfall stopped");
    }
    result
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

/// Front-end state around one session.
struct App<'a> {
    config: &'a AppConfig,
    session: GameSession,
    store: SaveStore,
    highscores: HighscoreTable,
    /// Transient panel message and the milliseconds it has left.
    message: Option<(&'static str, u32)>,
    score_recorded: bool,
}

impl<'a> App<'a> {
    fn new(config: &'a AppConfig) -> Result<Self> {
        let store = SaveStore::open(config.save_dir())?;
        let highscores = HighscoreTable::load(&config.highscore_path());
        let seed = config.seed.unwrap_or_else(|| unix_now() as u32);

        let mut app = Self {
            config,
            session: GameSession::new(config.session_config(seed)),
            store,
            highscores,
            message: None,
            score_recorded: false,
        };

        match config.resume_slot.as_deref() {
            Some(slot) => match app.resume(slot, seed) {
                Ok(session) => {
                    info!(slot, score = session.score(), "resumed saved game");
                    app.session = session;
                    app.show("resumed");
                }
                Err(e) => {
                    warn!(slot, error = %format!("{:#}", e), "failed to resume");
                    app.session.start();
                    app.show("resume failed");
                }
            },
            None => app.session.start(),
        }
        info!(seed = app.session.seed(), player = %config.player, "game started");
        Ok(app)
    }

    fn resume(&self, slot: &str, seed: u32) -> Result<GameSession> {
        let saved = self.store.load(slot)?;
        saved.resume(self.config.session_config(seed))
    }

    fn show(&mut self, message: &'static str) {
        self.message = Some((message, MESSAGE_MS));
    }

    fn quick_save(&mut self) {
        let result = SavedGame::capture(&self.session, &self.config.player)
            .and_then(|game| self.store.save(QUICKSAVE_SLOT, &game));
        match result {
            Ok(()) => self.show("saved"),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "quick save failed");
                self.show("save failed");
            }
        }
    }

    fn restart(&mut self) {
        self.record_score();
        self.session.restart();
        self.score_recorded = false;
        info!(seed = self.session.seed(), "game restarted");
    }

    /// Offer the current score to the highscore table once per game.
    fn record_score(&mut self) {
        if self.score_recorded || !self.session.game_over() {
            return;
        }
        self.score_recorded = true;
        let entry = HighscoreEntry {
            name: self.config.player.clone(),
            score: self.session.score(),
            lines: self.session.lines(),
            achieved_at: unix_now(),
        };
        let Some(rank) = self.highscores.insert(entry) else {
            return;
        };
        info!(rank = rank + 1, score = self.session.score(), "new highscore");
        self.show(if rank == 0 { "new best!" } else { "highscore!" });
        if let Err(e) = self.highscores.save(&self.config.highscore_path()) {
            warn!(error = %format!("{:#}", e), "failed to save highscores");
        }
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(input) => {
                self.session.press(input);
            }
            InputEvent::Release(input) => self.session.release(input),
        }
    }

    fn tick(&mut self, tracker: &mut KeyTracker) {
        for event in tracker.update(TICK_MS) {
            self.apply(event);
        }
        self.session.tick(TICK_MS);

        let game_over = self
            .session
            .drain_events()
            .any(|event| matches!(event, GameEvent::GameOver { .. }));
        if game_over {
            self.record_score();
        }

        if let Some((_, left)) = &mut self.message {
            *left = left.saturating_sub(TICK_MS);
            if *left == 0 {
                self.message = None;
            }
        }
    }

    fn panel(&self) -> PanelInfo<'_> {
        PanelInfo {
            player: &self.config.player,
            best_score: self.highscores.best(),
            message: self.message.map(|(text, _)| text),
        }
    }
}

fn run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    let mut app = App::new(config)?;
    let bindings = KeyBindings::default();
    let mut tracker = KeyTracker::new();

    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        app.session.snapshot_into(&mut snap);
        view.render_into_with_panel(&snap, &app.panel(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("failed to poll terminal events")? {
            match event::read().context("failed to read terminal event")? {
                Event::Key(key) => match bindings.command(key) {
                    Some(Command::Input(input)) => {
                        if let Some(event) = tracker.handle(input, key.kind) {
                            app.apply(event);
                        }
                    }
                    Some(command) if key.kind == KeyEventKind::Press => match command {
                        Command::Quit => {
                            app.record_score();
                            return Ok(());
                        }
                        Command::Pause => {
                            for event in tracker.release_all() {
                                app.apply(event);
                            }
                            app.session.toggle_pause();
                        }
                        Command::Restart => app.restart(),
                        Command::QuickSave => app.quick_save(),
                        Command::Input(_) => {}
                    },
                    _ => {}
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.tick(&mut tracker);
        }
    }
}
