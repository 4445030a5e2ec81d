//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previous one and only changed runs of cells
//! are written. Encoding goes into a byte buffer first, so the encoders can be
//! tested without a terminal.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    active: bool,
    key_releases: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            active: false,
            key_releases: false,
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    ///
    /// Where the terminal supports it, key release events are switched on too.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        self.active = true;
        self.key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        if self.key_releases {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf().context("failed to prepare terminal")
    }

    /// Undo everything [`enter`](Self::enter) did. Safe to call twice.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        self.buf.clear();
        if self.key_releases {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf().context("failed to restore terminal")?;
        terminal::disable_raw_mode().context("failed to disable raw mode")
    }

    /// Force the next draw to be a full redraw, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Callers keep one `FrameBuffer` and pass it in every frame. After the
    /// call it holds the previous frame, ready to be drawn over.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            _ => {
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf().context("failed to write frame")?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Tracks the style last sent so runs of equal style skip the escape codes.
struct StyledWriter<'a> {
    out: &'a mut Vec<u8>,
    current: Option<CellStyle>,
}

impl<'a> StyledWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, current: None }
    }

    fn cells(&mut self, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        for dx in 0..len {
            let cell = fb.get(x + dx, y).unwrap_or_default();
            if self.current != Some(cell.style) {
                apply_style_into(self.out, cell.style)?;
                self.current = Some(cell.style);
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut writer = StyledWriter::new(out);
    for y in 0..fb.height() {
        writer.cells(fb, 0, y, fb.width())?;
        if y + 1 < fb.height() {
            writer.out.queue(Print("\r\n"))?;
        }
    }
    writer.finish()
}

/// Encode only the cells that differ from `prev` into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut writer = StyledWriter::new(out);
    for_each_changed_run(prev, next, |x, y, len| {
        writer.out.queue(cursor::MoveTo(x, y))?;
        writer.cells(next, x, y, len)
    })?;
    writer.finish()
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, len)` for every horizontal run of changed cells.
///
/// Mismatched sizes mark every row dirty.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    let changed = |x: u16, y: u16| prev.get(x, y) != next.get(x, y);

    for y in 0..next.height() {
        let mut x = 0;
        while x < w {
            if !changed(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && changed(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::Cell;

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);

        for x in 1..=3 {
            b.set(x, 0, Cell { ch: 'X', style });
        }
        b.set(5, 1, Cell { ch: 'Y', style });

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3), (5, 1, 1)]);
    }

    #[test]
    fn identical_frames_encode_only_a_reset() {
        let a = FrameBuffer::new(4, 4);
        let mut diff = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut diff).unwrap();

        let mut reset_only = Vec::new();
        StyledWriter::new(&mut reset_only).finish().unwrap();
        assert_eq!(diff, reset_only);
    }

    #[test]
    fn full_encode_contains_every_glyph() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "AB", CellStyle::default());
        fb.put_str(0, 1, "CD", CellStyle::default());

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("AB"));
        assert!(text.contains("CD"));
    }
}
