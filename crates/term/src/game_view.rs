//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The board model has `y` growing upwards; the screen grows downwards. Board
//! row 0 is drawn on the last line inside the frame.

use crate::core::{get_shape, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end details shown under the game stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelInfo<'a> {
    pub player: &'a str,
    pub best_score: Option<u32>,
    /// Short transient line, e.g. "saved".
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the board and side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Screen origin of the framed board.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the current game into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_panel(snap, &PanelInfo::default(), viewport, fb);
    }

    pub fn render_into_with_panel(
        &self,
        snap: &GameSnapshot,
        panel: &PanelInfo<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let w = board_px_w + 2;
        let h = board_px_h + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::plain(Rgb::new(80, 80, 90), PLAY_BG),
        );
        fb.draw_box(
            frame.x,
            frame.y,
            frame.w,
            frame.h,
            CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG),
        );

        // Board cells, including the active piece.
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                match PieceKind::from_code(snap.board[y as usize][x as usize]) {
                    Some(kind) => self.draw_block(fb, frame, x, y, kind),
                    None => {
                        let dot = CellStyle::plain(Rgb::new(90, 90, 100), PLAY_BG).dim();
                        self.fill_cell(fb, frame, x, y, '·', dot);
                    }
                }
            }
        }

        // Ghost goes only where the board is empty, so it never hides the piece.
        if let (Some(active), Some(ghost_y)) = (snap.active, snap.ghost_y) {
            if ghost_y != active.y {
                let style = CellStyle::plain(piece_color(active.kind).darken(), PLAY_BG).dim();
                for &(dx, dy) in get_shape(active.kind, active.rotation).iter() {
                    let (x, y) = (active.x + dx, ghost_y + dy);
                    if on_board(x, y) && snap.board[y as usize][x as usize] == 0 {
                        self.fill_cell(fb, frame, x, y, '░', style);
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, panel, viewport, frame);

        if snap.paused {
            self.draw_overlay(fb, frame, "PAUSED", Some("p to resume"));
        } else if snap.game_over {
            self.draw_overlay(fb, frame, "GAME OVER", Some("r to restart"));
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_panel(
        &self,
        snap: &GameSnapshot,
        panel: &PanelInfo<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_panel(snap, panel, viewport, &mut fb);
        fb
    }

    /// Screen position of the top-left terminal cell of board cell `(x, y)`.
    fn cell_origin(&self, frame: Frame, x: i8, y: i8) -> (u16, u16) {
        let row_from_top = (BOARD_HEIGHT as i8 - 1 - y) as u16;
        (
            frame.x + 1 + (x as u16) * self.cell_w,
            frame.y + 1 + row_from_top * self.cell_h,
        )
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, ch: char, style: CellStyle) {
        let (px, py) = self.cell_origin(frame, x, y);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, kind: PieceKind) {
        let style = CellStyle::plain(piece_color(kind), PLAY_BG).bold();
        self.fill_cell(fb, frame, x, y, '█', style);
    }

    /// Spawn-orientation preview, two rows tall, `(x, y)` = top-left.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle::plain(piece_color(kind), SCREEN_BG).bold();
        for &(dx, dy) in get_shape(kind, Rotation::R0).iter() {
            // Spawn shapes span dx -1..=2 and dy 0..=1.
            let px = x + ((dx + 1) as u16) * self.cell_w;
            let py = y + (1 - dy) as u16;
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        panel: &PanelInfo<'_>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level as u32),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        if let Some(next) = snap.next {
            self.draw_preview(fb, panel_x, y + 1, next);
        }
        y = y.saturating_add(4);

        let end = fb.put_str(panel_x, y, "HOLD", label);
        let swaps = value.dim();
        let end = fb.put_str(end + 1, y, "(", swaps);
        let end = fb.put_u32(end, y, snap.swaps_left as u32, swaps);
        fb.put_str(end, y, " left)", swaps);
        match snap.held {
            Some(held) => self.draw_preview(fb, panel_x, y + 1, held),
            None => {
                fb.put_str(panel_x, y + 1, "-", value);
            }
        }
        y = y.saturating_add(4);

        fb.put_str(panel_x, y, "BONUS", label);
        fb.put_u32(panel_x, y + 1, snap.speed_bonus, value);
        y = y.saturating_add(3);

        if !panel.player.is_empty() {
            fb.put_str(panel_x, y, panel.player, label);
            y = y.saturating_add(1);
        }
        if let Some(best) = panel.best_score {
            let end = fb.put_str(panel_x, y, "BEST ", value.dim());
            fb.put_u32(end, y, best, value);
            y = y.saturating_add(1);
        }
        if let Some(message) = panel.message {
            fb.put_str(panel_x, y.saturating_add(1), message, value.bold());
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, title: &str, hint: Option<&str>) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let style = CellStyle::plain(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let centered = |text: &str| {
            let text_w = text.chars().count() as u16;
            frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2)
        };
        fb.put_str(centered(title), mid_y, title, style);
        if let Some(hint) = hint {
            fb.put_str(centered(hint), mid_y + 1, hint, CellStyle::default().dim());
        }
    }
}

fn on_board(x: i8, y: i8) -> bool {
    x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8
}
