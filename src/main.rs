//! Binary Quest entry point
//!
//! Sets up the terminal, then runs the fixed-timestep game loop until the
//! player quits. The terminal is restored on every exit path.

use std::io::{self, Stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};

use binary_quest::audio::{AudioManager, AudioSink};
use binary_quest::consts::SIM_DT;
use binary_quest::platform::terminal::{collect_events, is_interrupt, map_key};
use binary_quest::platform::{FixedStep, SystemClock};
use binary_quest::renderer::TerminalRenderer;
use binary_quest::{App, Screen, Settings};

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Binary Quest starting...");

    let settings = Settings::load_or_default(&Settings::path());
    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!("Session seed: {}", seed);

    let mut app = App::new(&settings, seed);
    let mut audio = AudioManager::from_settings(&settings);

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(
        out,
        EnterAlternateScreen,
        cursor::Hide,
        DisableLineWrap,
        terminal::Clear(terminal::ClearType::All)
    )?;

    let res = run(&mut out, &mut app, &settings, &mut audio);

    // restore
    let _ = execute!(
        out,
        EnableLineWrap,
        cursor::Show,
        LeaveAlternateScreen,
        ResetColor
    );
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &res {
        log::error!("Terminal error: {}", e);
    }
    log::info!("Binary Quest exiting");
    res
}

fn run(
    out: &mut Stdout,
    app: &mut App,
    settings: &Settings,
    audio: &mut dyn AudioSink,
) -> io::Result<()> {
    let (w, h) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(w, h, settings);

    let clock = SystemClock::new();
    let mut stepper = FixedStep::new();
    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(settings.effective_fps()));

    loop {
        let frame_start = Instant::now();

        let events = collect_events()?;
        if let Some((w, h)) = events.resized {
            renderer.resize(w, h);
        }
        for key in events.keys {
            if is_interrupt(&key) {
                return Ok(());
            }
            if let Some(action) = map_key(app.screen(), key) {
                app.handle(action);
            }
        }
        if app.should_quit() {
            return Ok(());
        }

        // Menus don't bank time for the next game
        if app.screen() != Screen::Game {
            stepper.reset();
        }
        for _ in 0..stepper.advance(&clock) {
            app.step(SIM_DT, audio);
        }

        renderer.draw(app);
        renderer.present(out)?;

        // frame cap
        if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

/// Seed from the wall clock when settings don't pin one
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
