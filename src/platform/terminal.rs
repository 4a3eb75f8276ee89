//! Crossterm key events to game actions

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Screen;
use crate::input::Action;

/// Cap on events drained per frame
const MAX_EVENTS_PER_FRAME: usize = 32;

/// Key presses and terminal resizes seen this frame
#[derive(Debug, Default)]
pub struct FrameEvents {
    pub keys: Vec<KeyEvent>,
    pub resized: Option<(u16, u16)>,
}

/// Drain pending terminal events without blocking
pub fn collect_events() -> io::Result<FrameEvents> {
    let mut out = FrameEvents::default();
    while event::poll(Duration::ZERO)? {
        match event::read()? {
            Event::Key(k) if matches!(k.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                out.keys.push(k);
                if out.keys.len() >= MAX_EVENTS_PER_FRAME {
                    break;
                }
            }
            Event::Resize(w, h) => out.resized = Some((w, h)),
            _ => {}
        }
    }
    Ok(out)
}

/// Ctrl+C leaves the program from any screen
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C'))
}

/// What a key means on the given screen
pub fn map_key(screen: Screen, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match screen {
        Screen::MainMenu => match key.code {
            KeyCode::Char(c @ '1'..='3') => Some(Action::DigitChoice(digit(c))),
            KeyCode::Enter => Some(Action::ConfirmText),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        // Any key leaves
        Screen::Instructions => Some(Action::ConfirmText),
        Screen::ConversionSelect => match key.code {
            KeyCode::Char(c @ '1'..='3') => Some(Action::DigitChoice(digit(c))),
            KeyCode::Enter => Some(Action::ConfirmText),
            KeyCode::Esc => Some(Action::CancelText),
            KeyCode::Char('q' | 'Q') => Some(Action::Quit),
            _ => None,
        },
        Screen::NumberInput => match key.code {
            KeyCode::Enter => Some(Action::ConfirmText),
            KeyCode::Esc => Some(Action::CancelText),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) if c.is_ascii_graphic() => Some(Action::TextChar(c)),
            _ => None,
        },
        Screen::Game => match key.code {
            KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Action::MoveLeft),
            KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Action::MoveRight),
            KeyCode::Char(' ' | 'p' | 'P') => Some(Action::PauseToggle),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => Some(Action::ConfirmText),
            _ => None,
        },
    }
}

fn digit(c: char) -> u8 {
    c.to_digit(10).map_or(0, |d| d as u8)
}
