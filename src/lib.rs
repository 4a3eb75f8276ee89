//! Binary Quest - catch falling bits in the right order
//!
//! A number written in decimal, octal or hexadecimal is converted to
//! binary, and the player rebuilds it by catching its bits left to right.
//!
//! Core modules:
//! - `sim`: Deterministic game logic (conversion, rounds, matching, tick)
//! - `input`: Abstract input actions and base-aware number entry
//! - `app`: Menu flow around a game session
//! - `audio`: Sound cues and the audio sink
//! - `renderer`: Terminal presentation
//! - `platform`: Clock and terminal input plumbing
//! - `settings`: User configuration

pub mod app;
pub mod audio;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, Screen};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the frame rate the timings assume)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames per second that frame-counted timers are expressed in
    pub const FRAMES_PER_SEC: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (origin top-left, y down)
    pub const ARENA_WIDTH: f32 = 600.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Collector defaults
    pub const COLLECTOR_WIDTH: f32 = 60.0;
    pub const COLLECTOR_HEIGHT: f32 = 20.0;
    pub const COLLECTOR_SPEED: f32 = 300.0;
    /// Travel time covered by one move action
    pub const MOVE_STEP_SECS: f32 = 0.05;
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;

    /// Falling entities
    pub const BIT_SIZE: f32 = 30.0;
    pub const MAX_FALLING_BITS: usize = 5;
    pub const POWER_UP_SIZE: f32 = 25.0;
    pub const POWER_UP_SPEED: f32 = 80.0;
    pub const MAX_POWER_UPS: usize = 3;
    /// Frames between power-up rolls
    pub const POWER_UP_ROLL_FRAMES: f32 = 300.0;
    pub const POWER_UP_DURATION_SECS: f32 = 5.0;
    pub const SLOW_TIME_SCALE: f32 = 0.5;

    /// Scoring
    pub const CORRECT_POINTS: u64 = 10;
    pub const LEVEL_BONUS_PER_LEVEL: u64 = 50;
    pub const POWER_UP_POINTS: u64 = 5;
    pub const MAX_WRONG_BITS: u8 = 3;

    /// Cooldown between a finished round and the next level
    pub const LEVEL_TRANSITION_SECS: f32 = 2.0;
    /// How long the wrong-bit indicator stays up
    pub const PENALTY_SECS: f32 = 1.0;
}
