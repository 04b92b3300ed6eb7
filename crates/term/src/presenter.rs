//! Terminal presenter: turns stage callbacks into short-lived visual flashes.
//!
//! The board itself is always drawn from a [`StageSnapshot`](crate::core::StageSnapshot);
//! this presenter only remembers what to highlight on top of it and for how long.

use arrayvec::ArrayVec;

use crate::core::{Animation, Presenter};
use crate::fb::Rgb;
use crate::types::{Cell, BOARD_WIDTH};

const BLINK_MS: u32 = 100;
const BANNER_MIN_MS: u32 = 600;

/// A set of cells highlighted for a while.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub cells: Vec<Cell>,
    pub glyph: char,
    pub color: Rgb,
    pub remaining_ms: u32,
    pub total_ms: u32,
}

impl Flash {
    /// 1.0 when fresh, 0.0 when about to disappear.
    pub fn strength(&self) -> f32 {
        if self.total_ms == 0 {
            return 0.0;
        }
        self.remaining_ms as f32 / self.total_ms as f32
    }
}

/// What the view needs from the presenter for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fx<'a> {
    pub flashes: &'a [Flash],
    /// Phase of the clear flicker.
    pub blink: bool,
    pub banner: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct TermPresenter {
    flashes: Vec<Flash>,
    clock_ms: u32,
    banner: Option<(&'static str, u32)>,
    /// Animation durations are scaled by this percentage.
    pace_percent: u32,
    final_score: Option<u32>,
}

impl Default for TermPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TermPresenter {
    pub fn new() -> Self {
        Self {
            flashes: Vec::new(),
            clock_ms: 0,
            banner: None,
            pace_percent: 100,
            final_score: None,
        }
    }

    pub fn with_pace_percent(mut self, pace_percent: u32) -> Self {
        self.pace_percent = pace_percent;
        self
    }

    /// Age every flash by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.clock_ms = self.clock_ms.wrapping_add(elapsed_ms);
        self.flashes.retain_mut(|flash| {
            flash.remaining_ms = flash.remaining_ms.saturating_sub(elapsed_ms);
            flash.remaining_ms > 0
        });
        if let Some((_, ms)) = self.banner.as_mut() {
            *ms = ms.saturating_sub(elapsed_ms);
        }
        if matches!(self.banner, Some((_, 0))) {
            self.banner = None;
        }
    }

    pub fn fx(&self) -> Fx<'_> {
        Fx {
            flashes: &self.flashes,
            blink: (self.clock_ms / BLINK_MS) % 2 == 0,
            banner: self.banner.map(|(text, _)| text),
        }
    }

    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    fn flash(&mut self, cells: Vec<Cell>, glyph: char, color: Rgb, ms: u32) {
        if ms == 0 || cells.is_empty() {
            return;
        }
        self.flashes.push(Flash {
            cells,
            glyph,
            color,
            remaining_ms: ms,
            total_ms: ms,
        });
    }

    fn announce(&mut self, text: &'static str, ms: u32) {
        self.banner = Some((text, ms.max(BANNER_MIN_MS)));
    }
}

impl Presenter for TermPresenter {
    fn play(&mut self, animation: &Animation) -> u32 {
        let ms = animation.nominal_ms().saturating_mul(self.pace_percent) / 100;
        match animation {
            Animation::RowShift { rows } => {
                let cells = rows
                    .iter()
                    .flat_map(|&(y, _)| (0..BOARD_WIDTH as i8).map(move |x| Cell::new(x, y)))
                    .collect();
                let glyph = match rows.first() {
                    Some(&(_, dir)) if dir < 0 => '<',
                    _ => '>',
                };
                self.flash(cells, glyph, Rgb::new(120, 200, 255), ms);
                self.announce("SHIFT!", ms);
            }
            Animation::ClearFlicker { rows } => {
                self.announce(if rows.len() > 1 { "COMBO!" } else { "CLEAR!" }, ms);
            }
            Animation::BombBurn { origin, cells } => {
                let mut burnt: Vec<Cell> = cells.iter().map(|(c, _)| *c).collect();
                burnt.push(*origin);
                self.flash(burnt, '░', Rgb::new(255, 110, 40), ms);
                self.announce("BOOM!", ms);
            }
            Animation::MagnetSettle { origin, moves } => {
                let mut pulled: ArrayVec<Cell, 13> = ArrayVec::new();
                pulled.push(*origin);
                for m in moves.iter().take(pulled.remaining_capacity()) {
                    pulled.push(m.to);
                }
                self.flash(pulled.to_vec(), '▓', Rgb::new(200, 120, 255), ms);
                self.announce("MAGNET!", ms);
            }
        }
        ms
    }

    fn restart_visible(&mut self, visible: bool) {
        if !visible {
            self.final_score = None;
            self.flashes.clear();
            self.banner = None;
        }
    }

    fn game_over(&mut self, score: u32) {
        self.final_score = Some(score);
        self.banner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Block, BlockMove};
    use crate::types::Color;

    #[test]
    fn test_play_reports_paced_duration() {
        let mut p = TermPresenter::new().with_pace_percent(50);
        let ms = p.play(&Animation::RowShift { rows: vec![(0, -1)] });
        assert_eq!(ms, 150);
        assert_eq!(p.flashes().len(), 1);
        assert_eq!(p.flashes()[0].cells.len(), BOARD_WIDTH as usize);
        assert_eq!(p.flashes()[0].glyph, '<');
        assert_eq!(p.fx().banner, Some("SHIFT!"));
    }

    #[test]
    fn test_flashes_expire() {
        let mut p = TermPresenter::new();
        p.play(&Animation::MagnetSettle {
            origin: Cell::new(3, 3),
            moves: vec![BlockMove {
                from: Cell::new(3, 6),
                to: Cell::new(3, 4),
                block: Block::new(1, Color::WHITE),
            }],
        });
        assert_eq!(p.flashes()[0].cells, vec![Cell::new(3, 3), Cell::new(3, 4)]);
        p.advance(100);
        assert!(p.flashes()[0].strength() < 1.0);
        p.advance(100);
        assert!(p.flashes().is_empty());
        // Banner outlives the short magnet animation.
        assert_eq!(p.fx().banner, Some("MAGNET!"));
        p.advance(BANNER_MIN_MS);
        assert_eq!(p.fx().banner, None);
    }

    #[test]
    fn test_bomb_burn_flashes_blast_and_origin() {
        let mut p = TermPresenter::new();
        let ms = p.play(&Animation::BombBurn {
            origin: Cell::new(5, 0),
            cells: vec![
                (Cell::new(4, 0), Block::new(1, Color::WHITE)),
                (Cell::new(6, 1), Block::new(2, Color::WHITE)),
            ],
        });
        assert_eq!(ms, 500);
        let flash = &p.flashes()[0];
        assert_eq!(flash.glyph, '░');
        assert_eq!(
            flash.cells,
            vec![Cell::new(4, 0), Cell::new(6, 1), Cell::new(5, 0)]
        );
        assert_eq!(p.fx().banner, Some("BOOM!"));
    }

    #[test]
    fn test_huge_pace_saturates() {
        let mut p = TermPresenter::new().with_pace_percent(u32::MAX);
        let ms = p.play(&Animation::ClearFlicker { rows: vec![0] });
        assert_eq!(ms, u32::MAX / 100);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut p = TermPresenter::new();
        p.game_over(40);
        assert_eq!(p.final_score(), Some(40));
        p.restart_visible(false);
        assert_eq!(p.final_score(), None);
    }
}
