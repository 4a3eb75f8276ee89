//! Sequential bit matching
//!
//! Bits must be caught in order, most significant first. The engine only
//! judges a candidate and advances the round; scoring and the wrong-bit
//! counter belong to the session.

use serde::{Deserialize, Serialize};

use super::round::RoundState;

/// Result of checking one caught bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Bit was the expected one and has been collected
    Correct,
    /// Bit was not the expected one; round unchanged
    Incorrect,
    /// Every bit is already collected; round unchanged
    RoundAlreadyComplete,
}

/// Check `candidate` against the next expected bit of `round`.
///
/// A `Correct` result that collects the last bit leaves the round complete;
/// the caller awards the level bonus.
pub fn submit(round: &mut RoundState, candidate: u8) -> MatchOutcome {
    let Some(expected) = round.next_expected() else {
        return MatchOutcome::RoundAlreadyComplete;
    };
    if expected == candidate {
        round.advance(candidate);
        MatchOutcome::Correct
    } else {
        MatchOutcome::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::convert::ConversionBase;

    /// Round whose target is 101 (decimal 5)
    fn round_101() -> RoundState {
        let round = RoundState::with_number(5, ConversionBase::Decimal, 1);
        assert_eq!(round.target_bits().as_slice(), &[1, 0, 1]);
        round
    }

    #[test]
    fn test_sequence_101() {
        let mut round = round_101();

        assert_eq!(submit(&mut round, 1), MatchOutcome::Correct);
        assert_eq!(round.expected_index(), 1);

        assert_eq!(submit(&mut round, 1), MatchOutcome::Incorrect);
        assert_eq!(round.expected_index(), 1);
        assert_eq!(round.collected_bits(), &[1]);

        assert_eq!(submit(&mut round, 0), MatchOutcome::Correct);
        assert_eq!(round.expected_index(), 2);

        assert_eq!(submit(&mut round, 1), MatchOutcome::Correct);
        assert_eq!(round.expected_index(), 3);
        assert!(round.is_complete());
        assert_eq!(round.collected_bits(), round.target_bits().as_slice());
    }

    #[test]
    fn test_complete_round_is_never_mutated() {
        let mut round = RoundState::with_number(0, ConversionBase::Hexadecimal, 1);
        assert_eq!(submit(&mut round, 0), MatchOutcome::Correct);
        let done = round.clone();

        for bit in [0, 1, 0, 1] {
            assert_eq!(submit(&mut round, bit), MatchOutcome::RoundAlreadyComplete);
            assert_eq!(round, done);
        }
    }

    #[test]
    fn test_collected_tracks_expected_index() {
        let mut round = RoundState::with_number(42, ConversionBase::Decimal, 2);
        for bit in [0, 1, 1, 0, 0, 1, 0, 1, 0, 1, 1] {
            submit(&mut round, bit);
            assert_eq!(round.collected_bits().len(), round.expected_index());
        }
        assert!(round.is_complete());
    }
}
