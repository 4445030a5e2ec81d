//! Game session - the spawn, fall, lock, clear, score cycle
//!
//! A [`GameSession`] owns the board, the randomizer and every piece of
//! bookkeeping for one game. Front ends drive it with two kinds of calls:
//!
//! - [`GameSession::press`] / [`GameSession::release`] for player inputs.
//!   Held left/right/soft-drop inputs auto-repeat through [`RepeatTimer`]s.
//! - [`GameSession::tick`] with the elapsed milliseconds since the last call.
//!   Gravity, auto-repeat and the speed bonus all advance from here.
//!
//! Everything that happens is queued as a [`GameEvent`]; drain the queue with
//! [`GameSession::take_events`].
//!
//! The active piece is always recorded on the board under its own
//! [`PieceId`], so every validity check passes that id as "self".

use std::fmt;

use tracing::{debug, info};

use crate::board::{Board, Occupant, PieceId};
use crate::config::SessionConfig;
use crate::ghost;
use crate::pieces::{self, Tetromino};
use crate::repeat::RepeatTimer;
use crate::rng::PieceQueue;
use crate::scoring::{self, SpeedBonus};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    GameEvent, GameInput, LockSummary, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, MAX_LEVEL,
    SPAWN_X, SPAWN_Y,
};

/// Owner id for locked minos restored from a save. Live pieces start at 1.
const RESTORED_ID: PieceId = PieceId(0);

/// Where the session is in its cycle.
///
/// `Locking` and `LineClearing` only last for the duration of the call that
/// locks a piece; between calls a running session is `Falling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    LineClearing,
    GameOver,
}

/// Result of a hold request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The active piece went to the hold slot.
    Swapped,
    /// This piece already used every swap.
    Exhausted,
    /// The incoming piece did not fit; nothing moved.
    Blocked,
    /// Paused, over, or nothing in play.
    Ignored,
}

/// Position of a piece as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceState {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for PieceState {
    fn from(piece: Tetromino) -> Self {
        Self {
            kind: piece.kind,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
        }
    }
}

/// Everything needed to rebuild a session mid-game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    pub score: u32,
    pub lines: u32,
    pub level: u8,
    /// Locked minos as `(kind, x, y)`.
    pub minos: Vec<(PieceKind, i8, i8)>,
    pub active: PieceState,
    pub next: PieceKind,
    pub held: Option<PieceKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeError {
    MinoOutOfBounds { x: i8, y: i8 },
    DuplicateMino { x: i8, y: i8 },
    AnchorOutOfRange { x: i8, y: i8 },
    ActiveBlocked,
}

impl fmt::Display for ResumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeError::MinoOutOfBounds { x, y } => {
                write!(f, "locked mino at ({}, {}) is outside the board", x, y)
            }
            ResumeError::DuplicateMino { x, y } => {
                write!(f, "two locked minos share cell ({}, {})", x, y)
            }
            ResumeError::AnchorOutOfRange { x, y } => {
                write!(f, "active piece anchor ({}, {}) is far outside the board", x, y)
            }
            ResumeError::ActiveBlocked => write!(f, "active piece overlaps the board"),
        }
    }
}

impl std::error::Error for ResumeError {}

/// One game from first spawn to game over.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    queue: PieceQueue,
    active: Option<Tetromino>,
    next: PieceKind,
    held: Option<PieceKind>,
    swaps_used: u8,
    next_id: u32,
    phase: Phase,
    score: u32,
    level: u8,
    lines: u32,
    pieces_locked: u32,
    fall_ms: u32,
    speed_bonus: SpeedBonus,
    horizontal: RepeatTimer,
    vertical: RepeatTimer,
    /// Held horizontal direction; the last pressed one wins.
    horizontal_dir: Option<i8>,
    soft_drop_held: bool,
    paused: bool,
    last_lock: Option<LockSummary>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session drawing pieces from the configured randomizer.
    pub fn new(config: SessionConfig) -> Self {
        let queue = PieceQueue::new(config.randomizer, config.seed);
        Self::with_queue(config, queue)
    }

    /// Create a session drawing pieces from `queue`.
    pub fn with_queue(config: SessionConfig, mut queue: PieceQueue) -> Self {
        let next = queue.draw();
        Self {
            config,
            board: Board::new(),
            queue,
            active: None,
            next,
            held: None,
            swaps_used: 0,
            next_id: 1,
            phase: Phase::Spawning,
            score: 0,
            level: config.starting_level(),
            lines: 0,
            pieces_locked: 0,
            fall_ms: 0,
            speed_bonus: SpeedBonus::new(config.speed_bonus_max),
            horizontal: RepeatTimer::new(config.hold_delay_ms, config.horizontal_repeat_ms),
            vertical: RepeatTimer::new(config.hold_delay_ms, config.vertical_repeat_ms),
            horizontal_dir: None,
            soft_drop_held: false,
            paused: false,
            last_lock: None,
            events: Vec::with_capacity(16),
        }
    }

    /// Rebuild a session from saved data.
    ///
    /// Every locked mino must lie inside the grid with no two on the same cell,
    /// and the active piece must fit.
    pub fn resume(config: SessionConfig, state: ResumeState) -> Result<Self, ResumeError> {
        let (ax, ay) = (state.active.x, state.active.y);
        if !pieces::is_anchor_in_range(ax, ay) {
            return Err(ResumeError::AnchorOutOfRange { x: ax, y: ay });
        }

        let mut session = Self::new(config);

        for &(kind, x, y) in &state.minos {
            if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
                return Err(ResumeError::MinoOutOfBounds { x, y });
            }
            if session.board.occupant_at(x, y).is_some() {
                return Err(ResumeError::DuplicateMino { x, y });
            }
            session.board.set(
                x,
                y,
                Some(Occupant {
                    kind,
                    owner: RESTORED_ID,
                }),
            );
        }

        session.score = state.score;
        session.lines = state.lines;
        session.level = state.level.min(MAX_LEVEL);
        session.next = state.next;
        session.held = state.held;

        let piece = Tetromino {
            id: session.allocate_id(),
            kind: state.active.kind,
            rotation: state.active.rotation,
            x: state.active.x,
            y: state.active.y,
        };
        if !piece.fits(&session.board) {
            return Err(ResumeError::ActiveBlocked);
        }
        session.activate(piece);
        session.events.clear();

        debug!(
            score = session.score,
            lines = session.lines,
            minos = state.minos.len(),
            "session resumed"
        );
        Ok(session)
    }

    /// Spawn the first piece. Does nothing once started.
    pub fn start(&mut self) {
        if self.phase != Phase::Spawning || self.active.is_some() {
            return;
        }
        self.spawn_next();
    }

    /// Throw this game away and start a fresh one with the next seed.
    pub fn restart(&mut self) {
        let config = SessionConfig {
            seed: self.config.seed.wrapping_add(1),
            ..self.config
        };
        *self = Self::new(config);
        self.start();
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.phase != Phase::Spawning || self.active.is_some()
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn swaps_used(&self) -> u8 {
        self.swaps_used
    }

    pub fn swaps_left(&self) -> u8 {
        self.config.max_swaps.saturating_sub(self.swaps_used)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn speed_bonus(&self) -> u32 {
        self.speed_bonus.value()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    /// Bookkeeping for the most recent lock.
    pub fn last_lock(&self) -> Option<LockSummary> {
        self.last_lock
    }

    /// Current gravity interval.
    pub fn fall_interval_ms(&self) -> u32 {
        scoring::fall_interval_ms(self.level)
    }

    /// Anchor row where the active piece would land.
    pub fn ghost_y(&self) -> Option<i8> {
        self.active.map(|piece| ghost::resting_y(&self.board, &piece))
    }

    /// Drain every event queued since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Like [`take_events`](Self::take_events) but keeps the queue's
    /// allocation for the next frame.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Locked minos as `(kind, x, y)`, excluding the active piece.
    pub fn locked_minos(&self) -> impl Iterator<Item = (PieceKind, i8, i8)> + '_ {
        let active = self.active.map(|piece| piece.id);
        self.board
            .occupied()
            .filter(move |(_, _, occupant)| Some(occupant.owner) != active)
            .map(|(x, y, occupant)| (occupant.kind, x, y))
    }

    /// Plain data to rebuild this session later. `None` without an active piece.
    pub fn resume_state(&self) -> Option<ResumeState> {
        let active = self.active?;
        Some(ResumeState {
            score: self.score,
            lines: self.lines,
            level: self.level,
            minos: self.locked_minos().collect(),
            active: active.into(),
            next: self.next,
            held: self.held,
        })
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = Some(self.next);
        out.held = self.held;
        out.swaps_left = self.swaps_left();
        out.seed = self.config.seed;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.speed_bonus = self.speed_bonus.value();
        out.paused = self.paused;
        out.game_over = self.game_over();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Pausing freezes gravity, inputs and the speed bonus.
    pub fn set_paused(&mut self, paused: bool) {
        if self.game_over() || self.paused == paused {
            return;
        }
        self.paused = paused;
        self.events.push(GameEvent::PauseChanged(paused));
    }

    /// An input went down. Returns true if it changed the game.
    ///
    /// Repeating inputs act on the press and then keep acting from
    /// [`tick`](Self::tick) until released.
    pub fn press(&mut self, input: GameInput) -> bool {
        match input {
            GameInput::MoveLeft | GameInput::MoveRight => {
                let dir = if input == GameInput::MoveLeft { -1 } else { 1 };
                if self.horizontal_dir != Some(dir) {
                    self.horizontal_dir = Some(dir);
                    self.horizontal.reset();
                }
                self.accepts_input() && self.horizontal.step(0) && self.try_shift(dir, 0)
            }
            GameInput::SoftDrop => {
                self.soft_drop_held = true;
                if self.accepts_input() && self.vertical.step(0) {
                    self.step_down();
                    true
                } else {
                    false
                }
            }
            GameInput::HardDrop => self.hard_drop(),
            GameInput::Rotate => self.rotate(),
            GameInput::Hold => self.hold() == HoldOutcome::Swapped,
        }
    }

    /// An input went up. Releasing a direction resets its timers.
    pub fn release(&mut self, input: GameInput) {
        match input {
            GameInput::MoveLeft | GameInput::MoveRight => {
                let dir = if input == GameInput::MoveLeft { -1 } else { 1 };
                if self.horizontal_dir == Some(dir) {
                    self.horizontal_dir = None;
                    self.horizontal.reset();
                }
            }
            GameInput::SoftDrop => {
                self.soft_drop_held = false;
                self.vertical.reset();
            }
            GameInput::HardDrop | GameInput::Rotate | GameInput::Hold => {}
        }
    }

    /// Advance the game by `elapsed_ms`. Returns true if the piece moved or
    /// locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.accepts_input() {
            return false;
        }

        self.speed_bonus.tick(elapsed_ms);
        let mut changed = false;

        if let Some(dir) = self.horizontal_dir {
            if self.horizontal.step(elapsed_ms) {
                changed |= self.try_shift(dir, 0);
            }
        }

        let by_key = self.soft_drop_held && self.vertical.step(elapsed_ms);
        self.fall_ms = self.fall_ms.saturating_add(elapsed_ms);
        let by_gravity = self.fall_ms >= self.fall_interval_ms();

        if (by_key || by_gravity) && self.active.is_some() {
            self.step_down();
            changed = true;
        }

        changed
    }

    /// Shift the active piece one column left.
    pub fn move_left(&mut self) -> bool {
        self.accepts_input() && self.try_shift(-1, 0)
    }

    /// Shift the active piece one column right.
    pub fn move_right(&mut self) -> bool {
        self.accepts_input() && self.try_shift(1, 0)
    }

    /// Step the active piece one row down, locking it if it can't move.
    /// Returns true if it moved.
    pub fn soft_drop(&mut self) -> bool {
        self.accepts_input() && self.step_down()
    }

    /// Rotate the active piece to its next state.
    pub fn rotate(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };
        match pieces::try_rotate(&self.board, &active) {
            Some(rotated) => {
                self.place(rotated);
                self.events.push(GameEvent::PieceRotated);
                true
            }
            None => false,
        }
    }

    /// Drop the active piece to its resting row and lock it there.
    ///
    /// A resting row that leaves a mino above the skyline ends the game.
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let target = ghost::project(&self.board, &active);
        if target.is_above_skyline(&self.board) {
            debug!(kind = target.kind.as_str(), x = target.x, y = target.y, "hard drop topped out");
            self.board.remove_piece(active.id);
            self.active = None;
            self.finish();
        } else {
            self.place(target);
            self.lock_active(true);
        }
        true
    }

    /// Swap the active piece with the hold slot.
    ///
    /// With an empty slot the next piece comes into play; otherwise the held
    /// piece does. Either way it enters one row above the current piece (but
    /// never above the spawn row), pushed back inside the walls, and must fit
    /// against everything except the piece it replaces.
    pub fn hold(&mut self) -> HoldOutcome {
        if !self.accepts_input() {
            return HoldOutcome::Ignored;
        }
        let Some(active) = self.active else {
            return HoldOutcome::Ignored;
        };
        if self.swaps_used >= self.config.max_swaps {
            return HoldOutcome::Exhausted;
        }

        let incoming = self.held.unwrap_or(self.next);
        let y = (active.y + 1).min(SPAWN_Y);
        let candidate = Tetromino::new(PieceId(self.next_id), incoming, active.x, y);
        let (dx, dy) = pieces::units_to_move(&candidate.cells());
        let candidate = candidate.shifted(dx, dy);

        if !pieces::is_valid_placement(&self.board, &candidate.cells(), &[active.id]) {
            if self.config.charge_failed_swaps {
                self.swaps_used += 1;
            }
            debug!(
                incoming = incoming.as_str(),
                swaps_used = self.swaps_used,
                "hold blocked"
            );
            return HoldOutcome::Blocked;
        }

        self.allocate_id();
        if self.held.is_none() {
            self.next = self.queue.draw();
        }
        self.held = Some(active.kind);
        self.swaps_used += 1;
        self.board.remove_piece(active.id);
        self.events.push(GameEvent::PieceHeld { held: active.kind });
        debug!(
            held = active.kind.as_str(),
            incoming = incoming.as_str(),
            swaps_used = self.swaps_used,
            "hold"
        );
        self.activate(candidate);
        HoldOutcome::Swapped
    }

    fn accepts_input(&self) -> bool {
        !self.paused && self.phase == Phase::Falling && self.active.is_some()
    }

    fn allocate_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Record `piece` on the board as the active piece.
    fn place(&mut self, piece: Tetromino) {
        self.board.place_piece(piece.id, piece.kind, &piece.cells());
        self.active = Some(piece);
    }

    /// Bring a new piece into play with fresh timers and speed bonus.
    fn activate(&mut self, piece: Tetromino) {
        self.place(piece);
        self.horizontal.reset();
        self.vertical.reset();
        self.speed_bonus.reset();
        self.fall_ms = 0;
        self.phase = Phase::Falling;
        self.events.push(GameEvent::PieceSpawned { kind: piece.kind });
    }

    fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.shifted(dx, dy);
        if !moved.fits(&self.board) {
            return false;
        }
        self.place(moved);
        self.events.push(GameEvent::PieceMoved);
        true
    }

    /// One row down, or lock where it stands.
    fn step_down(&mut self) -> bool {
        self.fall_ms = 0;
        if self.try_shift(0, -1) {
            return true;
        }
        self.lock_active(false);
        false
    }

    fn spawn_next(&mut self) -> bool {
        self.phase = Phase::Spawning;
        let kind = self.next;
        self.next = self.queue.draw();
        self.swaps_used = 0;

        let piece = Tetromino::new(self.allocate_id(), kind, SPAWN_X, SPAWN_Y);
        if !piece.fits(&self.board) {
            debug!(kind = kind.as_str(), "spawn blocked");
            self.finish();
            return false;
        }
        self.activate(piece);
        true
    }

    fn lock_active(&mut self, hard_drop: bool) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.phase = Phase::Locking;
        self.pieces_locked += 1;
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind,
            hard_drop,
        });

        self.phase = Phase::LineClearing;
        let cleared = self.board.clear_full_rows();
        let line_clear_score = scoring::line_clear_score(cleared, self.level);
        if cleared > 0 {
            self.score += line_clear_score;
            self.lines += cleared as u32;
            self.events.push(GameEvent::LinesCleared(cleared as u8));
            self.events.push(GameEvent::ScoreChanged(self.score));

            let level = scoring::next_level(
                self.level,
                self.lines,
                self.config.starting_level(),
                self.config.start_at_level_zero,
            );
            if level != self.level {
                self.level = level;
                self.events.push(GameEvent::LevelChanged(level));
            }
            debug!(
                cleared,
                lines = self.lines,
                level = self.level,
                points = line_clear_score,
                "lines cleared"
            );
        }

        let topped_out = piece.is_above_skyline(&self.board);
        let speed_bonus = if topped_out {
            0
        } else {
            self.speed_bonus.value()
        };
        self.last_lock = Some(LockSummary {
            lines_cleared: cleared as u8,
            line_clear_score,
            speed_bonus,
            topped_out,
        });
        debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            hard_drop,
            speed_bonus,
            "piece locked"
        );

        if topped_out {
            self.finish();
            return;
        }

        if speed_bonus > 0 {
            self.score += speed_bonus;
            self.events.push(GameEvent::ScoreChanged(self.score));
        }
        self.spawn_next();
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.soft_drop_held = false;
        self.horizontal_dir = None;
        info!(
            score = self.score,
            lines = self.lines,
            level = self.level,
            pieces = self.pieces_locked,
            "game over"
        );
        self.events.push(GameEvent::GameOver { score: self.score });
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
