//! Double-buffered character grid
//!
//! Drawing writes into `cur`; `flush` sends only the cells that differ from
//! the previous frame.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Black,
    };
}

pub struct Frame {
    w: u16,
    h: u16,
    cur: Vec<Cell>,
    prev: Vec<Cell>,
    /// Redraw everything on the next flush
    dirty: bool,
}

impl Frame {
    pub fn new(w: u16, h: u16) -> Self {
        let mut frame = Self {
            w: 0,
            h: 0,
            cur: Vec::new(),
            prev: Vec::new(),
            dirty: true,
        };
        frame.resize(w, h);
        frame
    }

    pub fn width(&self) -> u16 {
        self.w
    }

    pub fn height(&self) -> u16 {
        self.h
    }

    pub fn resize(&mut self, w: u16, h: u16) {
        self.w = w;
        self.h = h;
        let len = usize::from(w) * usize::from(h);
        self.cur = vec![Cell::BLANK; len];
        self.prev = vec![Cell::BLANK; len];
        self.dirty = true;
    }

    pub fn clear(&mut self, bg: Color) {
        for c in &mut self.cur {
            *c = Cell {
                ch: ' ',
                fg: Color::White,
                bg,
            };
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.w && y < self.h).then(|| usize::from(y) * usize::from(self.w) + usize::from(x))
    }

    pub fn put(&mut self, x: u16, y: u16, ch: char, fg: Color, bg: Color) {
        if let Some(i) = self.index(x, y) {
            self.cur[i] = Cell { ch, fg, bg };
        }
    }

    /// Write `s` from `(x, y)`, clipped at the right edge
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            let Ok(dx) = u16::try_from(i) else { break };
            let xx = x.saturating_add(dx);
            if xx >= self.w {
                break;
            }
            self.put(xx, y, ch, fg, bg);
        }
    }

    /// Write `s` centred on row `y`
    pub fn put_centered(&mut self, y: u16, s: &str, fg: Color, bg: Color) {
        let len = u16::try_from(s.chars().count()).unwrap_or(u16::MAX);
        let x = self.w.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cur[i])
    }

    /// Characters on row `y`, trailing blanks trimmed
    pub fn row_text(&self, y: u16) -> String {
        let text: String = (0..self.w)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_string()
    }

    /// Send changed cells to the terminal
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut cur_fg = None::<Color>;
        let mut cur_bg = None::<Color>;

        for y in 0..self.h {
            let row = usize::from(y) * usize::from(self.w);
            for x in 0..self.w {
                let i = row + usize::from(x);
                let a = self.cur[i];
                if !self.dirty && a == self.prev[i] {
                    continue;
                }
                queue!(out, cursor::MoveTo(x, y))?;
                if cur_fg != Some(a.fg) {
                    queue!(out, SetForegroundColor(a.fg))?;
                    cur_fg = Some(a.fg);
                }
                if cur_bg != Some(a.bg) {
                    queue!(out, SetBackgroundColor(a.bg))?;
                    cur_bg = Some(a.bg);
                }
                queue!(out, Print(a.ch))?;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;
        self.prev.copy_from_slice(&self.cur);
        self.dirty = false;
        Ok(())
    }
}
