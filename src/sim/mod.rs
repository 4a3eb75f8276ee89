//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, time is always passed in
//! - One seeded RNG per session
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod convert;
pub mod matching;
pub mod round;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use convert::{BitSequence, ConversionBase, MAX_BITS, convert};
pub use matching::{MatchOutcome, submit};
pub use round::{NumericRange, RoundState, range_for_level};
pub use state::{
    ActiveEffects, Collector, FallingBit, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind,
    SessionSnapshot,
};
pub use tick::{TickInput, tick};
