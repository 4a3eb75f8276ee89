//! Terminal rendering module
//!
//! Draws a read-only view of the app into a character grid with crossterm.
//! Nothing here mutates game state.

pub mod frame;
pub mod view;

use std::io::{self, Write};

use crossterm::style::Color;

use crate::app::{App, Screen};
use crate::consts::{MAX_WRONG_BITS, PENALTY_SECS};
use crate::settings::Settings;
use crate::sim::{ConversionBase, GamePhase, GameState, PowerUpKind};

pub use frame::{Cell, Frame};
pub use view::{ArenaView, shake_offset};

const BG: Color = Color::Rgb { r: 10, g: 10, b: 20 };
const ARENA_BG: Color = Color::Rgb { r: 5, g: 5, b: 12 };
const TITLE: Color = Color::Cyan;
const TEXT: Color = Color::White;
const DIM: Color = Color::DarkGrey;
const GOOD: Color = Color::Green;
const BAD: Color = Color::Red;
const HINT: Color = Color::Yellow;
const ORANGE: Color = Color::Rgb {
    r: 255,
    g: 165,
    b: 0,
};
const PURPLE: Color = Color::Rgb {
    r: 160,
    g: 32,
    b: 240,
};

/// Presentation sink for the whole app
pub struct TerminalRenderer {
    frame: Frame,
    view: Option<ArenaView>,
    shake: bool,
    show_next_bit: bool,
}

impl TerminalRenderer {
    pub fn new(term_w: u16, term_h: u16, settings: &Settings) -> Self {
        Self {
            frame: Frame::new(term_w, term_h),
            view: ArenaView::fit(term_w, term_h),
            shake: settings.effective_screen_shake(),
            show_next_bit: settings.show_next_bit,
        }
    }

    pub fn resize(&mut self, term_w: u16, term_h: u16) {
        self.frame.resize(term_w, term_h);
        self.view = ArenaView::fit(term_w, term_h);
        log::debug!("Resized to {}x{}, arena {:?}", term_w, term_h, self.view);
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Draw the current screen into the back buffer
    pub fn draw(&mut self, app: &App) {
        self.frame.clear(BG);
        match app.screen() {
            Screen::MainMenu => draw_main_menu(&mut self.frame),
            Screen::Instructions => draw_instructions(&mut self.frame),
            Screen::ConversionSelect => draw_conversion_select(&mut self.frame, app.selected_base()),
            Screen::NumberInput => {
                draw_number_input(&mut self.frame, app.entry().base(), app.entry().as_str())
            }
            Screen::Game => match (app.session(), self.view) {
                (Some(state), Some(view)) => self.draw_game(state, view),
                (Some(_), None) => {
                    let y = self.frame.height() / 2;
                    self.frame
                        .put_centered(y, "Terminal too small, please enlarge", HINT, BG);
                }
                (None, _) => {}
            },
        }
    }

    /// Push the back buffer to the terminal
    pub fn present<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.frame.flush(out)
    }

    fn draw_game(&mut self, state: &GameState, view: ArenaView) {
        let dx = if self.shake {
            shake_offset(state.screen_shake, state.time_ticks)
        } else {
            0
        };
        let f = &mut self.frame;

        draw_hud(f, state);
        draw_arena_border(f, view);

        for bit in &state.falling_bits {
            let (x, y) = view.to_cell(bit.pos);
            let color = if bit.value == 1 { GOOD } else { BAD };
            let glyph = if bit.value == 1 { '1' } else { '0' };
            let w = view.span(bit.rect().size.x);
            for i in 0..w {
                let ch = if i == w / 2 { glyph } else { ' ' };
                f.put(jitter(x + i, dx, view), y, ch, Color::Black, color);
            }
        }

        for p in &state.power_ups {
            let (x, y) = view.to_cell(p.pos);
            f.put(jitter(x, dx, view), y, p.kind.glyph(), Color::Black, power_up_color(p.kind));
        }

        let (cx, cy) = view.to_cell(state.collector.rect().pos);
        let cw = view.span(state.collector.width);
        for i in 0..cw {
            f.put(jitter(cx + i, dx, view), cy, '=', TITLE, TITLE);
        }

        draw_round_panel(f, state, view, self.show_next_bit);

        let mid = view.y0 + view.rows / 2;
        match state.phase {
            GamePhase::Paused => {
                f.put_centered(mid, " PAUSED ", TEXT, ARENA_BG);
                f.put_centered(mid + 1, " Press SPACE to continue ", TEXT, ARENA_BG);
            }
            GamePhase::LevelTransition => {
                f.put_centered(mid, " LEVEL COMPLETE! ", GOOD, ARENA_BG);
                let bonus = format!(" Next: level {} ", state.level() + 1);
                f.put_centered(mid + 1, &bonus, TITLE, ARENA_BG);
            }
            GamePhase::GameOver => draw_game_over(f, state, mid),
            GamePhase::Playing => {}
        }

        if state.penalty_timer > 0.0 && state.phase != GamePhase::GameOver {
            let text = format!(
                " WRONG BIT! -1 life ({} left) ",
                MAX_WRONG_BITS.saturating_sub(state.wrong_count)
            );
            let row = view.y0 + (view.rows / 4).max(1);
            let fade = state.penalty_timer / PENALTY_SECS;
            let fg = if fade > 0.5 { BAD } else { DIM };
            f.put_centered(row, &text, fg, ARENA_BG);
        }
    }
}

fn jitter(x: u16, dx: i16, view: ArenaView) -> u16 {
    let lo = i32::from(view.x0);
    let hi = i32::from(view.x0 + view.cols - 1);
    let shifted = (i32::from(x) + i32::from(dx)).clamp(lo, hi);
    u16::try_from(shifted).unwrap_or(view.x0)
}

fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::SpeedBoost => HINT,
        PowerUpKind::ScoreMultiplier => ORANGE,
        PowerUpKind::SlowTime => PURPLE,
    }
}

fn draw_main_menu(f: &mut Frame) {
    let y = f.height() / 4;
    f.put_centered(y, "BINARY QUEST", TITLE, BG);
    f.put_centered(y + 2, "Catch the falling binary bits!", TEXT, BG);
    f.put_centered(y + 5, "1. Start New Game", TEXT, BG);
    f.put_centered(y + 6, "2. Instructions  ", TEXT, BG);
    f.put_centered(y + 7, "3. Quit          ", TEXT, BG);
    f.put_str(1, f.height().saturating_sub(1), "Press 1/2/3", DIM, BG);
}

fn draw_instructions(f: &mut Frame) {
    const LINES: [(&str, Color); 10] = [
        ("Enter a number to convert to binary", TEXT),
        ("Use A/D or arrow keys to move your collector", TEXT),
        ("Catch the bits of the binary form from left to right", TEXT),
        ("Green bits are 1, red bits are 0", TEXT),
        ("Power-ups:", TEXT),
        ("  S - Speed boost", HINT),
        ("  M - Double points", ORANGE),
        ("  T - Slow time", PURPLE),
        ("Three wrong bits and the game is over", BAD),
        ("SPACE pauses, Q quits", TEXT),
    ];
    f.put_centered(1, "HOW TO PLAY", TITLE, BG);
    for (i, (line, color)) in LINES.iter().enumerate() {
        f.put_str(4, 3 + i as u16, line, *color, BG);
    }
    let y = f.height().saturating_sub(2);
    f.put_centered(y, "Press any key to return to menu", GOOD, BG);
}

fn draw_conversion_select(f: &mut Frame, selected: ConversionBase) {
    let y = f.height() / 4;
    f.put_centered(y, "SELECT CONVERSION TYPE", TITLE, BG);
    f.put_centered(y + 1, "Choose what to convert to binary", TEXT, BG);
    for (i, base) in ConversionBase::ALL.iter().enumerate() {
        let marker = if *base == selected { '>' } else { ' ' };
        let line = format!("{} {}. {} to Binary", marker, base.choice(), base.as_str());
        let color = if *base == selected { HINT } else { TEXT };
        f.put_centered(y + 3 + i as u16, &format!("{:<28}", line), color, BG);
    }
    f.put_centered(y + 8, "1/2/3 to choose, ENTER for highlighted, ESC to go back", DIM, BG);
}

fn draw_number_input(f: &mut Frame, base: ConversionBase, text: &str) {
    let hint = match base {
        ConversionBase::Decimal => "Enter a decimal number (e.g. 42)",
        ConversionBase::Octal => "Enter an octal number (e.g. 52)",
        ConversionBase::Hexadecimal => "Enter a hex number (e.g. 2A)",
    };
    let y = f.height() / 4;
    f.put_centered(y, &format!("{} to Binary", base), TITLE, BG);
    f.put_centered(y + 2, hint, TEXT, BG);
    f.put_centered(y + 4, &format!("[ {:<18} ]", format!("{}_", text)), HINT, BG);
    f.put_centered(y + 7, "Press ENTER to start game", GOOD, BG);
    f.put_centered(y + 8, "Press ESC to go back", HINT, BG);
}

fn draw_hud(f: &mut Frame, state: &GameState) {
    let range = state.round.range();
    let left = format!(
        " Score: {}   Level: {}   Wrong: {}/{}",
        state.score,
        state.level(),
        state.wrong_count,
        MAX_WRONG_BITS
    );
    f.put_str(0, 0, &left, TEXT, BG);
    f.put_str(
        1,
        1,
        &format!("Range: {}-{}", range.min, range.max),
        DIM,
        BG,
    );

    let mut x = f.width().saturating_sub(12);
    for (kind, label) in [
        (PowerUpKind::SpeedBoost, "SPEED"),
        (PowerUpKind::ScoreMultiplier, "2X"),
        (PowerUpKind::SlowTime, "SLOW"),
    ] {
        if state.effects.is_active(kind) {
            let width = label.len() as u16 + 1;
            x = x.saturating_sub(width);
            f.put_str(x, 1, label, power_up_color(kind), BG);
        }
    }
}

fn draw_arena_border(f: &mut Frame, view: ArenaView) {
    let left = view.x0 - 1;
    let right = view.x0 + view.cols;
    let top = view.y0 - 1;
    let bottom = view.bottom();
    for y in view.y0..bottom {
        f.put(left, y, '│', DIM, BG);
        f.put(right, y, '│', DIM, BG);
        for x in view.x0..right {
            f.put(x, y, ' ', TEXT, ARENA_BG);
        }
    }
    for x in view.x0..right {
        f.put(x, top, '─', DIM, BG);
        f.put(x, bottom, '─', DIM, BG);
    }
    f.put(left, top, '┌', DIM, BG);
    f.put(right, top, '┐', DIM, BG);
    f.put(left, bottom, '└', DIM, BG);
    f.put(right, bottom, '┘', DIM, BG);
}

fn draw_round_panel(f: &mut Frame, state: &GameState, view: ArenaView, show_next: bool) {
    let round = &state.round;
    let y = view.bottom() + 1;
    let target = format!(
        " {} {} = {} (binary)",
        round.base(),
        format_source(round.source_number(), round.base()),
        round.target_bits()
    );
    f.put_str(0, y, &target, TITLE, BG);

    let collected: String = round
        .collected_bits()
        .iter()
        .map(|b| if *b == 1 { '1' } else { '0' })
        .collect();
    let placeholders = "_".repeat(round.remaining());
    f.put_str(
        0,
        y + 1,
        &format!(" Collected: {}{}", collected, placeholders),
        GOOD,
        BG,
    );

    if show_next {
        if let Some(next) = round.next_expected() {
            f.put_str(0, y + 2, &format!(" Next bit: {}", next), ORANGE, BG);
        }
    }

    f.put_str(
        0,
        y + 3,
        " A/D or arrows move, SPACE pause, Q quit",
        DIM,
        BG,
    );
}

/// Source number written the way the player typed it
fn format_source(number: u64, base: ConversionBase) -> String {
    match base {
        ConversionBase::Hexadecimal => format!("{:X}", number),
        ConversionBase::Decimal | ConversionBase::Octal => number.to_string(),
    }
}

fn draw_game_over(f: &mut Frame, state: &GameState, mid: u16) {
    let lines = [
        (" GAME OVER ".to_string(), BAD),
        (format!(" Final score: {} ", state.score), TEXT),
        (
            format!(" Wrong bits: {}/{} ", state.wrong_count, MAX_WRONG_BITS),
            BAD,
        ),
        (format!(" Level reached: {} ", state.level()), TITLE),
        (" Press Q to return to menu ".to_string(), TEXT),
    ];
    let top = mid.saturating_sub(2);
    for (i, (line, color)) in lines.iter().enumerate() {
        f.put_centered(top + i as u16, line, *color, ARENA_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;

    fn rows(r: &TerminalRenderer) -> Vec<String> {
        (0..r.frame().height()).map(|y| r.frame().row_text(y)).collect()
    }

    fn contains(r: &TerminalRenderer, needle: &str) -> bool {
        rows(r).iter().any(|row| row.contains(needle))
    }

    fn start_game(app: &mut App, number: &str) {
        app.handle(Action::DigitChoice(1));
        app.handle(Action::DigitChoice(1));
        for c in number.chars() {
            app.handle(Action::TextChar(c));
        }
        app.handle(Action::ConfirmText);
    }

    #[test]
    fn test_menus_render() {
        let settings = Settings::default();
        let mut app = App::new(&settings, 1);
        let mut r = TerminalRenderer::new(80, 30, &settings);
        r.draw(&app);
        assert!(contains(&r, "BINARY QUEST"));

        app.handle(Action::DigitChoice(2));
        r.draw(&app);
        assert!(contains(&r, "HOW TO PLAY"));

        app.handle(Action::ConfirmText);
        app.handle(Action::DigitChoice(1));
        r.draw(&app);
        assert!(contains(&r, "> 1. Decimal to Binary"));

        app.handle(Action::DigitChoice(3));
        app.handle(Action::TextChar('2'));
        app.handle(Action::TextChar('a'));
        r.draw(&app);
        assert!(contains(&r, "[ 2A_"));
    }

    #[test]
    fn test_game_hud_shows_round() {
        let settings = Settings::default();
        let mut app = App::new(&settings, 1);
        start_game(&mut app, "5");
        let mut r = TerminalRenderer::new(80, 30, &settings);
        r.draw(&app);
        assert!(contains(&r, "Score: 0"));
        assert!(contains(&r, "Level: 1"));
        assert!(contains(&r, "Wrong: 0/3"));
        assert!(contains(&r, "Decimal 5 = 101 (binary)"));
        assert!(contains(&r, "Collected: ___"));
        assert!(contains(&r, "Next bit: 1"));
    }

    #[test]
    fn test_next_bit_hint_follows_settings() {
        let settings = Settings {
            show_next_bit: false,
            ..Default::default()
        };
        let mut app = App::new(&settings, 1);
        start_game(&mut app, "5");
        let mut r = TerminalRenderer::new(80, 30, &settings);
        r.draw(&app);
        assert!(!contains(&r, "Next bit"));
    }

    #[test]
    fn test_small_terminal_warns() {
        let settings = Settings::default();
        let mut app = App::new(&settings, 1);
        start_game(&mut app, "5");
        let mut r = TerminalRenderer::new(20, 8, &settings);
        r.draw(&app);
        assert!(contains(&r, "Terminal too small"));

        r.resize(80, 30);
        r.draw(&app);
        assert!(contains(&r, "Score: 0"));
    }

    #[test]
    fn test_hex_source_formatted_as_hex() {
        assert_eq!(format_source(0x2A, ConversionBase::Hexadecimal), "2A");
        assert_eq!(format_source(52, ConversionBase::Octal), "52");
    }
}
