//! GameView: maps a [`StageSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::snapshot::{NextSnapshot, PhaseSnapshot};
use crate::core::StageSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::presenter::Fx;
use crate::types::{Color, TriggerKind, BOARD_HEIGHT, BOARD_WIDTH};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen-space placement of the board frame for one render.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Lays out the board, side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keep blocks roughly square.
        Self::new(2, 1)
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

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &StageSnapshot,
        fx: Fx<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::plain(Rgb::new(220, 220, 220), PANEL_BG).into_cell(' '));

        let frame = self.frame(viewport);
        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            frame.w - 2,
            frame.h - 2,
            ' ',
            CellStyle::plain(BOARD_BG, BOARD_BG),
        );
        draw_border(fb, frame, CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG));

        for (y, row) in snap.board.iter().enumerate() {
            let flicker = snap.flicker_rows[y] && fx.blink;
            for (x, cell) in row.iter().enumerate() {
                let (x, y) = (x as i8, y as i8);
                match cell.color {
                    _ if flicker => self.fill_cell(
                        fb,
                        frame,
                        x,
                        y,
                        '▒',
                        CellStyle::plain(Rgb::new(255, 255, 255), BOARD_BG),
                    ),
                    Some(color) => self.draw_block(fb, frame, x, y, color, cell.trigger),
                    None => self.fill_cell(
                        fb,
                        frame,
                        x,
                        y,
                        '·',
                        CellStyle {
                            dim: true,
                            ..CellStyle::plain(Rgb::new(90, 90, 100), BOARD_BG)
                        },
                    ),
                }
            }
        }

        if let Some(active) = &snap.active {
            for block in active {
                self.draw_block(fb, frame, block.cell.x, block.cell.y, block.color, block.trigger);
            }
        }

        for flash in fx.flashes {
            let style = CellStyle {
                bold: true,
                ..CellStyle::plain(flash.color.mix(BOARD_BG, 1.0 - flash.strength()), BOARD_BG)
            };
            for &cell in &flash.cells {
                self.fill_cell(fb, frame, cell.x, cell.y, flash.glyph, style);
            }
        }

        self.draw_side_panel(fb, snap, fx, viewport, frame);

        match snap.phase {
            PhaseSnapshot::Idle => draw_overlay(fb, frame, &["PRESS ENTER"]),
            PhaseSnapshot::GameOver => draw_overlay(fb, frame, &["GAME OVER", "ENTER: RETRY"]),
            _ => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &StageSnapshot, fx: Fx<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, fx, viewport, &mut fb);
        fb
    }

    /// Terminal position of the top-left character of board cell `(x, y)`.
    ///
    /// Board rows count up from the bottom, screen rows count down from the top.
    /// Cells off the visible board have no position.
    pub fn cell_origin(&self, viewport: Viewport, x: i8, y: i8) -> Option<(u16, u16)> {
        self.cell_px(self.frame(viewport), x, y)
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let h = BOARD_HEIGHT as u16 * self.cell_h + 2;
        Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        }
    }

    fn cell_px(&self, frame: Frame, x: i8, y: i8) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        let row = (BOARD_HEIGHT as i8 - 1 - y) as u16;
        Some((
            frame.x + 1 + x as u16 * self.cell_w,
            frame.y + 1 + row * self.cell_h,
        ))
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, ch: char, style: CellStyle) {
        if let Some((px, py)) = self.cell_px(frame, x, y) {
            fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
        }
    }

    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        x: i8,
        y: i8,
        color: Color,
        trigger: Option<TriggerKind>,
    ) {
        let color = Rgb::from(color);
        match trigger {
            None => self.fill_cell(fb, frame, x, y, '█', CellStyle::plain(color, BOARD_BG)),
            Some(kind) => {
                let style = CellStyle {
                    bold: true,
                    ..CellStyle::plain(Rgb::new(0, 0, 0), color)
                };
                self.fill_cell(fb, frame, x, y, ' ', style);
                if let Some((px, py)) = self.cell_px(frame, x, y) {
                    fb.put_char(px, py, trigger_glyph(kind), style);
                }
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &StageSnapshot,
        fx: Fx<'_>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::new(220, 220, 220), PANEL_BG)
        };
        let value = CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        if let Some(next) = &snap.next {
            y += draw_preview(fb, panel_x, y, next);
        }
        y += 1;

        fb.put_str(panel_x, y, "EFFECT IN", label);
        fb.put_u32(panel_x, y + 1, snap.timer_label, value);
        y += 3;

        fb.put_str(panel_x, y, "SPEED", label);
        fb.put_u32(panel_x, y + 1, snap.gravity_ms, value);
        fb.put_str(panel_x + digits(snap.gravity_ms) + 1, y + 1, "ms", value);
        y += 3;

        fb.put_str(panel_x, y, "VOLUME", label);
        if snap.muted || snap.volume <= 0.0 {
            fb.put_str(panel_x, y + 1, "MUTED", value);
        } else {
            let filled = (snap.volume.clamp(0.0, 1.0) * 10.0).round() as u16;
            for i in 0..10 {
                fb.put_char(panel_x + i, y + 1, if i < filled { '■' } else { '□' }, value);
            }
        }
        y += 3;

        if let Some(text) = fx.banner {
            let style = CellStyle {
                bold: true,
                ..CellStyle::plain(Rgb::new(255, 220, 90), PANEL_BG)
            };
            fb.put_str(panel_x, y, text, style);
        }
    }
}

/// Draw the preview shape; returns the rows used.
fn draw_preview(fb: &mut FrameBuffer, x: u16, y: u16, next: &NextSnapshot) -> u16 {
    let style = CellStyle::plain(Rgb::from(next.color), PANEL_BG);
    let top = next.offsets.iter().map(|o| o.y).max().unwrap_or(0);
    for o in &next.offsets {
        let px = x + o.x as u16 * 2;
        let py = y + (top - o.y) as u16;
        fb.put_str(px, py, "██", style);
    }
    top as u16 + 1
}

fn draw_border(fb: &mut FrameBuffer, f: Frame, style: CellStyle) {
    if f.w < 2 || f.h < 2 {
        return;
    }
    let (right, bottom) = (f.x + f.w - 1, f.y + f.h - 1);
    fb.put_char(f.x, f.y, '┌', style);
    fb.put_char(right, f.y, '┐', style);
    fb.put_char(f.x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for x in f.x + 1..right {
        fb.put_char(x, f.y, '─', style);
        fb.put_char(x, bottom, '─', style);
    }
    for y in f.y + 1..bottom {
        fb.put_char(f.x, y, '│', style);
        fb.put_char(right, y, '│', style);
    }
}

/// Centered lines of text over the board.
fn draw_overlay(fb: &mut FrameBuffer, f: Frame, lines: &[&str]) {
    let style = CellStyle {
        bold: true,
        ..CellStyle::plain(Rgb::new(255, 255, 255), PANEL_BG)
    };
    let mid_y = f.y + f.h / 2;
    for (i, text) in lines.iter().enumerate() {
        let w = text.chars().count() as u16;
        let x = f.x + f.w.saturating_sub(w) / 2;
        fb.put_str(x, mid_y + i as u16, text, style);
    }
}

fn trigger_glyph(kind: TriggerKind) -> char {
    match kind {
        TriggerKind::Bomb => 'B',
        TriggerKind::Magnet => 'M',
    }
}

fn digits(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
