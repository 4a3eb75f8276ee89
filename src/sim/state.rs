//! Game session state and scoring policy
//!
//! The session owns exactly one active round plus everything that falls
//! through the arena. It is mutated only from the tick loop.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::convert::ConversionBase;
use super::matching::{MatchOutcome, submit};
use super::round::{NumericRange, RoundState};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bits are falling and can be caught
    Playing,
    /// Round complete, waiting out the cooldown before the next level
    LevelTransition,
    /// Game is paused
    Paused,
    /// Run ended (three wrong bits or quit). Absorbing.
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    ScoreMultiplier,
    SlowTime,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::SlowTime,
    ];

    /// Single-letter tag drawn on the falling capsule
    pub fn glyph(&self) -> char {
        match self {
            PowerUpKind::SpeedBoost => 'S',
            PowerUpKind::ScoreMultiplier => 'M',
            PowerUpKind::SlowTime => 'T',
        }
    }
}

/// A bit falling toward the collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingBit {
    pub id: u32,
    pub pos: Vec2,
    pub value: u8,
    /// Fall speed (arena units/s)
    pub speed: f32,
}

impl FallingBit {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, BIT_SIZE)
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub speed: f32,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, POWER_UP_SIZE)
    }
}

/// The player's collector, sliding along the bottom edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Base speed (arena units/s)
    pub speed: f32,
}

impl Default for Collector {
    fn default() -> Self {
        Self {
            x: (ARENA_WIDTH - COLLECTOR_WIDTH) / 2.0,
            width: COLLECTOR_WIDTH,
            speed: COLLECTOR_SPEED,
        }
    }
}

impl Collector {
    pub fn rect(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x, ARENA_HEIGHT - COLLECTOR_HEIGHT),
            Vec2::new(self.width, COLLECTOR_HEIGHT),
        )
    }

    /// Move one step left (`direction < 0`) or right, clamped to the arena
    pub fn nudge(&mut self, direction: f32, boosted: bool) {
        let mut speed = self.speed;
        if boosted {
            speed *= SPEED_BOOST_FACTOR;
        }
        let step = direction.signum() * speed * MOVE_STEP_SECS;
        self.x = (self.x + step).clamp(0.0, ARENA_WIDTH - self.width);
    }
}

/// Remaining time (seconds) on each power-up effect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub speed_boost: f32,
    pub score_multiplier: f32,
    pub slow_time: f32,
}

impl ActiveEffects {
    pub fn activate(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::SpeedBoost => self.speed_boost = POWER_UP_DURATION_SECS,
            PowerUpKind::ScoreMultiplier => self.score_multiplier = POWER_UP_DURATION_SECS,
            PowerUpKind::SlowTime => self.slow_time = POWER_UP_DURATION_SECS,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::SpeedBoost => self.speed_boost > 0.0,
            PowerUpKind::ScoreMultiplier => self.score_multiplier > 0.0,
            PowerUpKind::SlowTime => self.slow_time > 0.0,
        }
    }

    pub fn decay(&mut self, dt: f32) {
        self.speed_boost = (self.speed_boost - dt).max(0.0);
        self.score_multiplier = (self.score_multiplier - dt).max(0.0);
        self.slow_time = (self.slow_time - dt).max(0.0);
    }

    /// Multiplier applied to gameplay time
    pub fn time_scale(&self) -> f32 {
        if self.is_active(PowerUpKind::SlowTime) {
            SLOW_TIME_SCALE
        } else {
            1.0
        }
    }
}

/// Something that happened during a tick, for audio and HUD feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BitCollected { bit: u8, points: u64 },
    WrongBit { expected: u8, caught: u8 },
    LevelComplete { level: u32, bonus: u64 },
    LevelStarted { level: u32, number: u64 },
    PowerUpCollected(PowerUpKind),
    GameOver { score: u64 },
}

/// Read-only view of a session for presentation and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u64,
    pub level: u32,
    pub wrong_count: u8,
    pub phase: GamePhase,
    pub base: ConversionBase,
    pub source_number: u64,
    pub target_bits: String,
    pub collected_bits: String,
    pub range: NumericRange,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Shared generator for every draw in the run
    pub rng: Pcg32,
    /// Notation every round of this run uses
    pub base: ConversionBase,
    /// Active round
    pub round: RoundState,
    /// Score (never decreases)
    pub score: u64,
    /// Wrong bits caught so far, across all rounds
    pub wrong_count: u8,
    /// Current phase
    pub phase: GamePhase,
    /// Player collector
    pub collector: Collector,
    /// Active falling bits (sorted by id)
    pub falling_bits: Vec<FallingBit>,
    /// Active power-up capsules (sorted by id)
    pub power_ups: Vec<PowerUp>,
    /// Active power-up effects
    pub effects: ActiveEffects,
    /// Frames accumulated toward the next bit spawn
    pub spawn_frames: f32,
    /// Frames accumulated toward the next power-up roll
    pub power_up_frames: f32,
    /// Cooldown left before the next level starts (scaled seconds)
    pub transition_timer: f32,
    /// Wrong-bit indicator time left (seconds)
    pub penalty_timer: f32,
    /// Screen shake intensity (0-1)
    pub screen_shake: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a run at level 1 with the player's own number
    pub fn new(number: u64, base: ConversionBase, seed: u64) -> Self {
        Self::with_round(RoundState::with_number(number, base, 1), seed)
    }

    /// Start a run at level 1 with a drawn number
    pub fn random(base: ConversionBase, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let round = RoundState::generate(1, base, &mut rng);
        let mut state = Self::with_round(round, seed);
        state.rng = rng;
        state
    }

    fn with_round(round: RoundState, seed: u64) -> Self {
        log::info!(
            "New run: {} {} -> {} (seed {})",
            round.base(),
            round.source_number(),
            round.target_bits(),
            seed
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            base: round.base(),
            round,
            score: 0,
            wrong_count: 0,
            phase: GamePhase::Playing,
            collector: Collector::default(),
            falling_bits: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            spawn_frames: 0.0,
            power_up_frames: 0.0,
            transition_timer: 0.0,
            penalty_timer: 0.0,
            screen_shake: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level(&self) -> u32 {
        self.round.level()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Current time multiplier: level speed, halved under slow time
    pub fn game_speed(&self) -> f32 {
        super::round::speed_factor(self.level()) * self.effects.time_scale()
    }

    /// Events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand a caught bit to the match engine and apply the scoring policy.
    ///
    /// Returns `None` while paused or after game over.
    pub fn collect_bit(&mut self, bit: u8) -> Option<MatchOutcome> {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::LevelTransition) {
            return None;
        }
        let expected = self.round.next_expected();
        let outcome = submit(&mut self.round, bit);
        match outcome {
            MatchOutcome::Correct => {
                let mut points = CORRECT_POINTS;
                if self.effects.is_active(PowerUpKind::ScoreMultiplier) {
                    points *= 2;
                }
                self.score += points;
                self.events.push(GameEvent::BitCollected { bit, points });

                if self.round.is_complete() {
                    let level = self.level();
                    let bonus = LEVEL_BONUS_PER_LEVEL * u64::from(level);
                    self.score += bonus;
                    self.phase = GamePhase::LevelTransition;
                    self.transition_timer = LEVEL_TRANSITION_SECS;
                    self.events.push(GameEvent::LevelComplete { level, bonus });
                    log::info!("Level {} complete, bonus {}", level, bonus);
                }
            }
            MatchOutcome::Incorrect => {
                self.wrong_count = self.wrong_count.saturating_add(1);
                self.penalty_timer = PENALTY_SECS;
                self.screen_shake = 1.0;
                self.events.push(GameEvent::WrongBit {
                    expected: expected.unwrap_or_default(),
                    caught: bit,
                });
                log::debug!("Wrong bit {} ({}/{})", bit, self.wrong_count, MAX_WRONG_BITS);
                if self.wrong_count >= MAX_WRONG_BITS {
                    self.end_game();
                }
            }
            MatchOutcome::RoundAlreadyComplete => {}
        }
        Some(outcome)
    }

    /// Apply a caught power-up. Ignored unless playing.
    pub fn collect_power_up(&mut self, kind: PowerUpKind) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.effects.activate(kind);
        self.score += POWER_UP_POINTS;
        self.events.push(GameEvent::PowerUpCollected(kind));
    }

    /// Replace the finished round with a fresh one at the next level
    pub fn start_next_level(&mut self) {
        if self.is_over() {
            return;
        }
        let level = self.level() + 1;
        self.round = RoundState::generate(level, self.base, &mut self.rng);
        self.falling_bits.clear();
        self.spawn_frames = 0.0;
        self.transition_timer = 0.0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::LevelStarted {
            level,
            number: self.round.source_number(),
        });
        log::info!(
            "Level {}: {} {} -> {} (range {}-{})",
            level,
            self.base,
            self.round.source_number(),
            self.round.target_bits(),
            self.round.range().min,
            self.round.range().max
        );
    }

    /// Pause or resume
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing | GamePhase::LevelTransition => GamePhase::Paused,
            GamePhase::Paused if self.round.is_complete() => GamePhase::LevelTransition,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }

    /// Player asked to stop
    pub fn quit(&mut self) {
        if !self.is_over() {
            log::info!("Run quit at level {}", self.level());
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.screen_shake = 0.0;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over: score {} at level {}", self.score, self.level());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.score,
            level: self.level(),
            wrong_count: self.wrong_count,
            phase: self.phase,
            base: self.base,
            source_number: self.round.source_number(),
            target_bits: self.round.target_bits().to_string(),
            collected_bits: self.round.collected_bits().iter().map(|b| b.to_string()).collect(),
            range: self.round.range(),
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.falling_bits.sort_by_key(|b| b.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scoring_through_a_round() {
        // 5 = 101
        let mut state = GameState::new(5, ConversionBase::Decimal, 1);
        assert_eq!(state.collect_bit(1), Some(MatchOutcome::Correct));
        assert_eq!(state.score, 10);
        assert_eq!(state.collect_bit(1), Some(MatchOutcome::Incorrect));
        assert_eq!(state.score, 10);
        assert_eq!(state.wrong_count, 1);
        assert_eq!(state.collect_bit(0), Some(MatchOutcome::Correct));
        assert_eq!(state.collect_bit(1), Some(MatchOutcome::Correct));
        // 3 bits + level 1 bonus
        assert_eq!(state.score, 30 + 50);
        assert_eq!(state.phase, GamePhase::LevelTransition);

        // Late catches neither score nor count as wrong
        assert_eq!(state.collect_bit(0), Some(MatchOutcome::RoundAlreadyComplete));
        assert_eq!(state.score, 80);
        assert_eq!(state.wrong_count, 1);
    }

    #[test]
    fn test_score_multiplier_doubles_bit_points_only() {
        let mut state = GameState::new(1, ConversionBase::Decimal, 1);
        state.effects.activate(PowerUpKind::ScoreMultiplier);
        state.collect_bit(1);
        assert_eq!(state.score, 20 + 50);
    }

    #[test]
    fn test_three_wrong_bits_end_the_game() {
        // 7 = 111, so 0 is always wrong
        let mut state = GameState::new(7, ConversionBase::Decimal, 1);
        state.collect_bit(0);
        state.collect_bit(0);
        assert_eq!(state.phase, GamePhase::Playing);
        state.collect_bit(0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.screen_shake, 0.0);

        // Absorbing: nothing scores any more
        assert_eq!(state.collect_bit(1), None);
        state.collect_power_up(PowerUpKind::SpeedBoost);
        state.start_next_level();
        state.toggle_pause();
        assert_eq!(state.score, 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.phase, GamePhase::GameOver);

        let events = state.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_wrong_bits_carry_across_rounds() {
        let mut state = GameState::new(1, ConversionBase::Decimal, 9);
        state.collect_bit(0);
        state.collect_bit(1);
        state.start_next_level();
        assert_eq!(state.level(), 2);
        assert_eq!(state.wrong_count, 1);
        assert_eq!(state.round.expected_index(), 0);
        assert!(state.round.collected_bits().is_empty());

        // Two more misses in the new round finish the run
        for _ in 0..2 {
            assert_eq!(state.phase, GamePhase::Playing);
            let wrong = 1 - state.round.next_expected().unwrap();
            assert_eq!(state.collect_bit(wrong), Some(MatchOutcome::Incorrect));
        }
        assert_eq!(state.wrong_count, MAX_WRONG_BITS);
        assert_eq!(state.phase, GamePhase::GameOver);

        let score = state.score;
        assert_eq!(state.collect_bit(0), None);
        assert_eq!(state.collect_bit(1), None);
        assert_eq!(state.score, score);
        assert_eq!(state.round.expected_index(), 0);
    }

    #[test]
    fn test_next_level_replaces_round() {
        let mut state = GameState::new(1, ConversionBase::Octal, 3);
        state.collect_bit(1);
        state.falling_bits.push(FallingBit {
            id: 99,
            pos: Vec2::ZERO,
            value: 1,
            speed: 80.0,
        });
        state.start_next_level();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.falling_bits.is_empty());
        assert_eq!(state.round.base(), ConversionBase::Octal);
        assert!(crate::sim::convert::is_octal_digits(state.round.source_number()));
        assert!(matches!(
            state.drain_events().last(),
            Some(GameEvent::LevelStarted { level: 2, .. })
        ));
    }

    #[test]
    fn test_pause_rejects_bits_and_resumes_phase() {
        let mut state = GameState::new(3, ConversionBase::Decimal, 1);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.collect_bit(1), None);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);

        state.collect_bit(1);
        state.collect_bit(1);
        assert_eq!(state.phase, GamePhase::LevelTransition);
        state.toggle_pause();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::LevelTransition);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut state = GameState::new(3, ConversionBase::Decimal, 1);
        state.quit();
        assert!(state.is_over());
        state.quit();
        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(42, ConversionBase::Decimal, 1);
        state.collect_bit(1);
        let snap = state.snapshot();
        assert_eq!(snap.target_bits, "101010");
        assert_eq!(snap.collected_bits, "1");
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"score\":10"));
    }

    #[test]
    fn test_same_seed_same_rounds() {
        let mut a = GameState::random(ConversionBase::Hexadecimal, 4242);
        let mut b = GameState::random(ConversionBase::Hexadecimal, 4242);
        for _ in 0..5 {
            assert_eq!(a.round, b.round);
            a.start_next_level();
            b.start_next_level();
        }
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(
            number in 0u64..2000,
            bits in proptest::collection::vec(0u8..=1, 0..64),
        ) {
            let mut state = GameState::new(number, ConversionBase::Decimal, 5);
            let mut last = state.score;
            for bit in bits {
                let outcome = state.collect_bit(bit);
                prop_assert!(state.score >= last);
                prop_assert!(state.wrong_count <= MAX_WRONG_BITS);
                if state.is_over() {
                    prop_assert!(state.collect_bit(bit).is_none());
                }
                if outcome == Some(MatchOutcome::RoundAlreadyComplete) {
                    prop_assert_eq!(state.score, last);
                }
                last = state.score;
            }
        }
    }
}
