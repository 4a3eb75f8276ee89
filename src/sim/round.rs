//! Level tiers and per-round state
//!
//! A round owns one target number and its bits. Rounds are never edited
//! across levels: a level-up builds a fresh `RoundState` and drops the old.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::convert::{BitSequence, ConversionBase, MAX_BITS, convert, is_octal_digits};

/// Smallest number ever drawn for a round
pub const MIN_NUMBER: u64 = 1;
/// Largest octal digit string drawn for octal rounds
pub const MAX_OCTAL_DRAW: u64 = 777;
/// Draws attempted before giving up on finding a valid octal number
pub const MAX_OCTAL_ATTEMPTS: u32 = 64;

/// Frames between bit spawns at level 0, before the floor applies
const BASE_SPAWN_FRAMES: u32 = 30;
/// Fastest spawn cadence, in frames
pub const MIN_SPAWN_FRAMES: u32 = 10;

/// Inclusive range numbers are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: u64,
    pub max: u64,
}

impl NumericRange {
    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Number range for a level tier (max 1000)
pub fn range_for_level(level: u32) -> NumericRange {
    let max = match level {
        0..=3 => 100,
        4..=6 => 250,
        7..=10 => 500,
        _ => 1000,
    };
    NumericRange {
        min: MIN_NUMBER,
        max,
    }
}

/// Game speed multiplier for a level
pub fn speed_factor(level: u32) -> f32 {
    1.0 + 0.1 * level.saturating_sub(1) as f32
}

/// Frames (at 60 fps) between falling-bit spawns
pub fn spawn_interval_frames(level: u32) -> u32 {
    BASE_SPAWN_FRAMES
        .saturating_sub(level.saturating_mul(2))
        .max(MIN_SPAWN_FRAMES)
}

/// Fall speed of bits spawned at a level (arena units/s)
pub fn fall_speed(level: u32) -> f32 {
    80.0 + level as f32 * 15.0
}

/// Draw a source number for `level`.
///
/// Octal rounds resample until every decimal digit is 0-7, bounded by
/// `MAX_OCTAL_ATTEMPTS`.
pub fn draw_number<R: Rng + ?Sized>(level: u32, base: ConversionBase, rng: &mut R) -> u64 {
    let range = range_for_level(level);
    match base {
        ConversionBase::Octal => {
            let max = range.max.min(MAX_OCTAL_DRAW);
            draw_octal(range, || rng.random_range(range.min..=max))
        }
        ConversionBase::Decimal | ConversionBase::Hexadecimal => {
            rng.random_range(range.min..=range.max)
        }
    }
}

/// Take the first octal-valid value from `draw`, giving up after
/// `MAX_OCTAL_ATTEMPTS` tries. The fallback is `range.min` when its digits
/// are octal, else 0.
fn draw_octal(range: NumericRange, mut draw: impl FnMut() -> u64) -> u64 {
    for _ in 0..MAX_OCTAL_ATTEMPTS {
        let candidate = draw();
        if candidate == 0 || is_octal_digits(candidate) {
            return candidate;
        }
    }
    let fallback = if is_octal_digits(range.min) { range.min } else { 0 };
    log::warn!(
        "No octal number found in {} draws, using {}",
        MAX_OCTAL_ATTEMPTS,
        fallback
    );
    fallback
}

/// State of the round in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    source_number: u64,
    base: ConversionBase,
    target_bits: BitSequence,
    expected_index: usize,
    collected_bits: Vec<u8>,
    level: u32,
    range: NumericRange,
}

impl RoundState {
    /// Start a round for a specific number (the player's own entry)
    pub fn with_number(number: u64, base: ConversionBase, level: u32) -> Self {
        let level = level.max(1);
        let target_bits = convert(number, base, MAX_BITS);
        log::debug!(
            "Round: level {} {} {} -> {}",
            level,
            base,
            number,
            target_bits
        );
        Self {
            source_number: number,
            base,
            target_bits,
            expected_index: 0,
            collected_bits: Vec::with_capacity(MAX_BITS),
            level,
            range: range_for_level(level),
        }
    }

    /// Start a round with a number drawn for `level`
    pub fn generate<R: Rng + ?Sized>(level: u32, base: ConversionBase, rng: &mut R) -> Self {
        let level = level.max(1);
        let number = draw_number(level, base, rng);
        Self::with_number(number, base, level)
    }

    pub fn source_number(&self) -> u64 {
        self.source_number
    }

    pub fn base(&self) -> ConversionBase {
        self.base
    }

    pub fn target_bits(&self) -> &BitSequence {
        &self.target_bits
    }

    pub fn expected_index(&self) -> usize {
        self.expected_index
    }

    pub fn collected_bits(&self) -> &[u8] {
        &self.collected_bits
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn range(&self) -> NumericRange {
        self.range
    }

    /// Bit that must be caught next, if any remain
    pub fn next_expected(&self) -> Option<u8> {
        self.target_bits.get(self.expected_index)
    }

    pub fn is_complete(&self) -> bool {
        self.expected_index >= self.target_bits.len()
    }

    pub fn remaining(&self) -> usize {
        self.target_bits.len().saturating_sub(self.expected_index)
    }

    /// Record the expected bit as caught. Only the match engine calls this.
    pub(super) fn advance(&mut self, bit: u8) {
        self.collected_bits.push(bit);
        self.expected_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_tiers() {
        let tiers = [
            (1, 100),
            (3, 100),
            (4, 250),
            (6, 250),
            (7, 500),
            (10, 500),
            (11, 1000),
            (50, 1000),
        ];
        for (level, max) in tiers {
            let range = range_for_level(level);
            assert_eq!(range.min, 1, "level {level}");
            assert_eq!(range.max, max, "level {level}");
        }
    }

    #[test]
    fn test_difficulty_grows_with_level() {
        assert_eq!(speed_factor(1), 1.0);
        assert!((speed_factor(3) - 1.2).abs() < 1e-6);
        assert_eq!(spawn_interval_frames(1), 28);
        assert_eq!(spawn_interval_frames(10), MIN_SPAWN_FRAMES);
        assert_eq!(spawn_interval_frames(40), MIN_SPAWN_FRAMES);
        assert!(fall_speed(2) > fall_speed(1));
    }

    #[test]
    fn test_new_round_starts_empty() {
        let mut rng = Pcg32::seed_from_u64(7);
        let round = RoundState::generate(4, ConversionBase::Decimal, &mut rng);
        assert_eq!(round.level(), 4);
        assert_eq!(round.expected_index(), 0);
        assert!(round.collected_bits().is_empty());
        assert!(round.range().contains(round.source_number()));
        assert_eq!(round.target_bits().to_value(), round.source_number());
    }

    #[test]
    fn test_with_number_uses_converter() {
        let round = RoundState::with_number(17, ConversionBase::Octal, 1);
        assert_eq!(round.target_bits().as_slice(), &[1, 1, 1, 1]);
        assert_eq!(round.next_expected(), Some(1));
        assert_eq!(round.remaining(), 4);
        assert!(!round.is_complete());
    }

    #[test]
    fn test_level_zero_promoted_to_one() {
        let round = RoundState::with_number(5, ConversionBase::Decimal, 0);
        assert_eq!(round.level(), 1);
    }

    #[test]
    fn test_octal_draw_gives_up_after_bounded_attempts() {
        let mut calls = 0;
        let n = draw_octal(range_for_level(1), || {
            calls += 1;
            89
        });
        assert_eq!(n, MIN_NUMBER);
        assert_eq!(calls, MAX_OCTAL_ATTEMPTS);

        // Minimum with an 8 in it falls back to zero
        let range = NumericRange { min: 18, max: 99 };
        let mut calls = 0;
        let n = draw_octal(range, || {
            calls += 1;
            98
        });
        assert_eq!(n, 0);
        assert_eq!(calls, MAX_OCTAL_ATTEMPTS);
    }

    #[test]
    fn test_octal_draw_stops_at_first_valid() {
        let mut draws = [9, 58, 17, 80].into_iter();
        let mut calls = 0;
        let n = draw_octal(range_for_level(1), || {
            calls += 1;
            draws.next().unwrap_or(0)
        });
        assert_eq!(n, 17);
        assert_eq!(calls, 3);
    }

    proptest! {
        #[test]
        fn prop_draws_stay_in_tier(seed in any::<u64>(), level in 1u32..30) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let range = range_for_level(level);
            for base in ConversionBase::ALL {
                let n = draw_number(level, base, &mut rng);
                prop_assert!(range.contains(n));
            }
        }

        #[test]
        fn prop_octal_draws_are_octal(seed in any::<u64>(), level in 1u32..30) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let n = draw_number(level, ConversionBase::Octal, &mut rng);
            prop_assert!(is_octal_digits(n));
            prop_assert!(n <= MAX_OCTAL_DRAW);
        }
    }
}
