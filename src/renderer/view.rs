//! Arena coordinates to terminal cells

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Rows reserved above the arena for the HUD
pub const HUD_ROWS: u16 = 3;
/// Rows reserved below the arena for the round panel and controls
pub const FOOTER_ROWS: u16 = 4;
/// Smallest arena worth drawing
pub const MIN_COLS: u16 = 24;
pub const MIN_ROWS: u16 = 8;

/// Terminal cells are roughly twice as tall as wide
const CELL_ASPECT: f32 = 2.0;

/// Where the arena sits on screen and how big it is, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaView {
    /// First column inside the border
    pub x0: u16,
    /// First row inside the border
    pub y0: u16,
    pub cols: u16,
    pub rows: u16,
}

impl ArenaView {
    /// Largest arena that keeps its shape in a `term_w` x `term_h` terminal
    pub fn fit(term_w: u16, term_h: u16) -> Option<Self> {
        let avail_cols = term_w.checked_sub(2)?;
        let avail_rows = term_h.checked_sub(HUD_ROWS + FOOTER_ROWS + 2)?;

        let aspect = ARENA_WIDTH / ARENA_HEIGHT * CELL_ASPECT;
        let mut cols = avail_cols.min((f32::from(avail_rows) * aspect) as u16);
        let rows = avail_rows.min((f32::from(cols) / aspect).round() as u16);
        if rows < MIN_ROWS {
            return None;
        }
        cols = cols.max(MIN_COLS);
        if cols > avail_cols {
            return None;
        }

        Some(Self {
            x0: (term_w - cols) / 2,
            y0: HUD_ROWS + 1,
            cols,
            rows,
        })
    }

    /// Cell holding arena point `pos`, clamped into the arena
    pub fn to_cell(&self, pos: Vec2) -> (u16, u16) {
        let fx = (pos.x / ARENA_WIDTH).clamp(0.0, 1.0);
        let fy = (pos.y / ARENA_HEIGHT).clamp(0.0, 1.0);
        let col = ((fx * f32::from(self.cols)) as u16).min(self.cols - 1);
        let row = ((fy * f32::from(self.rows)) as u16).min(self.rows - 1);
        (self.x0 + col, self.y0 + row)
    }

    /// Width in cells of something `width` arena units wide
    pub fn span(&self, width: f32) -> u16 {
        let cells = (width / ARENA_WIDTH * f32::from(self.cols)).round() as u16;
        cells.clamp(1, self.cols)
    }

    /// Row just below the arena
    pub fn bottom(&self) -> u16 {
        self.y0 + self.rows
    }
}

/// Horizontal jitter in cells for the current shake strength
pub fn shake_offset(shake: f32, tick: u64) -> i16 {
    if shake < 0.1 {
        return 0;
    }
    let magnitude = (shake * 2.0).ceil() as i16;
    if tick % 2 == 0 { magnitude } else { -magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_too_small() {
        assert_eq!(ArenaView::fit(10, 10), None);
        assert_eq!(ArenaView::fit(80, 12), None);
    }

    #[test]
    fn test_fit_keeps_arena_on_screen() {
        let view = ArenaView::fit(80, 30).unwrap();
        assert!(view.x0 >= 1);
        assert!(view.x0 + view.cols < 80);
        assert!(view.bottom() + FOOTER_ROWS < 30);
        assert!(view.rows >= MIN_ROWS);
    }

    #[test]
    fn test_corners_map_inside() {
        let view = ArenaView::fit(100, 40).unwrap();
        assert_eq!(view.to_cell(Vec2::ZERO), (view.x0, view.y0));
        assert_eq!(
            view.to_cell(Vec2::new(ARENA_WIDTH, ARENA_HEIGHT)),
            (view.x0 + view.cols - 1, view.y0 + view.rows - 1)
        );
        // Off-arena points clamp
        assert_eq!(view.to_cell(Vec2::new(-50.0, -50.0)), (view.x0, view.y0));
    }

    #[test]
    fn test_span_at_least_one() {
        let view = ArenaView::fit(60, 24).unwrap();
        assert!(view.span(0.5) >= 1);
        assert!(view.span(ARENA_WIDTH * 2.0) <= view.cols);
    }

    #[test]
    fn test_shake_alternates() {
        assert_eq!(shake_offset(0.0, 3), 0);
        assert_eq!(shake_offset(1.0, 0), 2);
        assert_eq!(shake_offset(1.0, 1), -2);
    }
}
