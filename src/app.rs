//! Menu flow around a game session
//!
//! Main menu -> conversion select -> number entry -> game, plus an
//! instructions page. The app owns at most one session and feeds it the
//! actions collected since the previous tick.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, cue_for};
use crate::input::{Action, NumberEntry};
use crate::settings::Settings;
use crate::sim::{ConversionBase, GameEvent, GameState, TickInput, tick};

/// Which page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Instructions,
    ConversionSelect,
    NumberInput,
    Game,
}

pub struct App {
    screen: Screen,
    selected_base: ConversionBase,
    entry: NumberEntry,
    session: Option<GameState>,
    /// One-shot inputs gathered for the next tick
    pending: TickInput,
    /// Seeds each new session
    seeds: Pcg32,
    should_quit: bool,
}

impl App {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            screen: Screen::MainMenu,
            selected_base: settings.default_base,
            entry: NumberEntry::new(settings.default_base),
            session: None,
            pending: TickInput::default(),
            seeds: Pcg32::seed_from_u64(seed),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_base(&self) -> ConversionBase {
        self.selected_base
    }

    pub fn entry(&self) -> &NumberEntry {
        &self.entry
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply one player action to whichever screen is showing
    pub fn handle(&mut self, action: Action) {
        match self.screen {
            Screen::MainMenu => match action {
                Action::DigitChoice(1) | Action::ConfirmText => {
                    self.screen = Screen::ConversionSelect;
                }
                Action::DigitChoice(2) => self.screen = Screen::Instructions,
                Action::DigitChoice(3) | Action::Quit => self.should_quit = true,
                _ => {}
            },

            // Any key goes back
            Screen::Instructions => self.screen = Screen::MainMenu,

            Screen::ConversionSelect => match action {
                Action::DigitChoice(choice) => {
                    if let Some(base) = ConversionBase::from_choice(choice) {
                        self.open_number_input(base);
                    }
                }
                Action::ConfirmText => self.open_number_input(self.selected_base),
                Action::CancelText | Action::Quit => self.screen = Screen::MainMenu,
                _ => {}
            },

            Screen::NumberInput => match action {
                Action::TextChar(c) => {
                    self.entry.push(c);
                }
                Action::Backspace => self.entry.backspace(),
                Action::ConfirmText if !self.entry.is_empty() => self.start_session(),
                Action::CancelText => {
                    self.entry.clear();
                    self.screen = Screen::MainMenu;
                }
                _ => {}
            },

            Screen::Game => {
                let over = self.session.as_ref().is_none_or(|s| s.is_over());
                if over {
                    if matches!(
                        action,
                        Action::Quit | Action::CancelText | Action::ConfirmText
                    ) {
                        self.return_to_menu();
                    }
                    return;
                }
                match action {
                    Action::MoveLeft => self.pending.move_left = true,
                    Action::MoveRight => self.pending.move_right = true,
                    Action::PauseToggle => self.pending.pause = !self.pending.pause,
                    Action::Quit | Action::CancelText => self.pending.quit = true,
                    _ => {}
                }
            }
        }
    }

    /// Advance the session by one fixed step and forward its cues
    pub fn step(&mut self, dt: f32, audio: &mut dyn AudioSink) -> Vec<GameEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if self.screen != Screen::Game {
            return Vec::new();
        }

        let input = std::mem::take(&mut self.pending);
        tick(session, &input, dt);

        let events = session.drain_events();
        for event in &events {
            if let Some(cue) = cue_for(event) {
                audio.play(cue);
            }
            if let GameEvent::GameOver { .. } = event {
                match serde_json::to_string(&session.snapshot()) {
                    Ok(json) => log::info!("Final state: {}", json),
                    Err(e) => log::warn!("Could not serialize final state: {}", e),
                }
            }
        }
        events
    }

    fn open_number_input(&mut self, base: ConversionBase) {
        self.selected_base = base;
        self.entry = NumberEntry::new(base);
        self.screen = Screen::NumberInput;
    }

    fn start_session(&mut self) {
        let number = self.entry.value();
        let seed = self.seeds.next_u64();
        self.session = Some(GameState::new(number, self.selected_base, seed));
        self.pending = TickInput::default();
        self.screen = Screen::Game;
    }

    fn return_to_menu(&mut self) {
        self.session = None;
        self.entry.clear();
        self.pending = TickInput::default();
        self.screen = Screen::MainMenu;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundCue;
    use crate::consts::SIM_DT;
    use crate::sim::GamePhase;

    #[derive(Default)]
    struct Cues(Vec<SoundCue>);

    impl AudioSink for Cues {
        fn play(&mut self, cue: SoundCue) {
            self.0.push(cue);
        }
    }

    fn app() -> App {
        App::new(&Settings::default(), 1234)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle(Action::TextChar(c));
        }
    }

    #[test]
    fn test_menu_to_game() {
        let mut app = app();
        assert_eq!(app.screen(), Screen::MainMenu);
        app.handle(Action::DigitChoice(1));
        assert_eq!(app.screen(), Screen::ConversionSelect);
        app.handle(Action::DigitChoice(3));
        assert_eq!(app.screen(), Screen::NumberInput);
        assert_eq!(app.selected_base(), ConversionBase::Hexadecimal);

        // Empty entry does not start a game
        app.handle(Action::ConfirmText);
        assert_eq!(app.screen(), Screen::NumberInput);

        type_text(&mut app, "1fz");
        assert_eq!(app.entry().as_str(), "1F");
        app.handle(Action::ConfirmText);
        assert_eq!(app.screen(), Screen::Game);

        let session = app.session().unwrap();
        assert_eq!(session.round.source_number(), 31);
        assert_eq!(session.round.target_bits().as_slice(), &[1, 1, 1, 1, 1]);
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_instructions_and_back() {
        let mut app = app();
        app.handle(Action::DigitChoice(2));
        assert_eq!(app.screen(), Screen::Instructions);
        app.handle(Action::MoveLeft);
        assert_eq!(app.screen(), Screen::MainMenu);

        app.handle(Action::DigitChoice(1));
        app.handle(Action::CancelText);
        assert_eq!(app.screen(), Screen::MainMenu);

        app.handle(Action::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_cancel_clears_entry() {
        let mut app = app();
        app.handle(Action::ConfirmText);
        app.handle(Action::DigitChoice(2));
        type_text(&mut app, "1987");
        assert_eq!(app.entry().as_str(), "17");
        app.handle(Action::CancelText);
        assert_eq!(app.screen(), Screen::MainMenu);
        assert!(app.entry().is_empty());
    }

    #[test]
    fn test_default_base_from_settings() {
        let settings = Settings {
            default_base: ConversionBase::Octal,
            ..Default::default()
        };
        let mut app = App::new(&settings, 1);
        app.handle(Action::ConfirmText);
        app.handle(Action::ConfirmText);
        assert_eq!(app.screen(), Screen::NumberInput);
        assert_eq!(app.entry().base(), ConversionBase::Octal);
    }

    #[test]
    fn test_quit_ends_run_then_returns_to_menu() {
        let mut app = app();
        app.handle(Action::DigitChoice(1));
        app.handle(Action::DigitChoice(1));
        type_text(&mut app, "42");
        app.handle(Action::ConfirmText);

        let mut cues = Cues::default();
        app.handle(Action::Quit);
        let events = app.step(SIM_DT, &mut cues);
        assert!(matches!(events.as_slice(), [GameEvent::GameOver { score: 0 }]));
        assert_eq!(cues.0, vec![SoundCue::GameOver]);
        assert_eq!(app.session().unwrap().phase, GamePhase::GameOver);

        // Game-over screen ignores gameplay keys
        app.handle(Action::MoveLeft);
        assert_eq!(app.screen(), Screen::Game);
        app.handle(Action::Quit);
        assert_eq!(app.screen(), Screen::MainMenu);
        assert!(app.session().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_pause_round_trip_through_app() {
        let mut app = app();
        app.handle(Action::DigitChoice(1));
        app.handle(Action::DigitChoice(1));
        type_text(&mut app, "5");
        app.handle(Action::ConfirmText);

        let mut cues = Cues::default();
        app.handle(Action::PauseToggle);
        app.step(SIM_DT, &mut cues);
        assert_eq!(app.session().unwrap().phase, GamePhase::Paused);
        app.handle(Action::PauseToggle);
        app.step(SIM_DT, &mut cues);
        assert_eq!(app.session().unwrap().phase, GamePhase::Playing);
    }

    #[test]
    fn test_step_without_session_is_noop() {
        let mut app = app();
        let mut cues = Cues::default();
        assert!(app.step(SIM_DT, &mut cues).is_empty());
        assert!(cues.0.is_empty());
    }
}
