//! Number-base to binary conversion
//!
//! The source number is first interpreted under its base notation, then
//! expanded into bits most-significant first. Malformed input never fails:
//! an octal number with a digit 8 or 9 is read as zero, and values wider
//! than the bit budget keep only their low bits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound on bits per round (32-bit integer width)
pub const MAX_BITS: usize = 32;

/// Widest expansion `to_binary` will ever produce
const MAX_EXPANSION: usize = u64::BITS as usize;

/// Notation the source number is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversionBase {
    #[default]
    Decimal,
    Octal,
    Hexadecimal,
}

impl ConversionBase {
    pub const ALL: [ConversionBase; 3] = [
        ConversionBase::Decimal,
        ConversionBase::Octal,
        ConversionBase::Hexadecimal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionBase::Decimal => "Decimal",
            ConversionBase::Octal => "Octal",
            ConversionBase::Hexadecimal => "Hexadecimal",
        }
    }

    /// Radix of the digits a player types for this base
    pub fn radix(&self) -> u32 {
        match self {
            ConversionBase::Decimal => 10,
            ConversionBase::Octal => 8,
            ConversionBase::Hexadecimal => 16,
        }
    }

    /// Menu digit choice (1 = decimal, 2 = octal, 3 = hex)
    pub fn from_choice(choice: u8) -> Option<Self> {
        match choice {
            1 => Some(ConversionBase::Decimal),
            2 => Some(ConversionBase::Octal),
            3 => Some(ConversionBase::Hexadecimal),
            _ => None,
        }
    }

    pub fn choice(&self) -> u8 {
        match self {
            ConversionBase::Decimal => 1,
            ConversionBase::Octal => 2,
            ConversionBase::Hexadecimal => 3,
        }
    }
}

impl fmt::Display for ConversionBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dec" | "decimal" => Ok(ConversionBase::Decimal),
            "oct" | "octal" => Ok(ConversionBase::Octal),
            "hex" | "hexadecimal" => Ok(ConversionBase::Hexadecimal),
            other => Err(format!("unknown conversion base: {other}")),
        }
    }
}

/// Ordered bits, most significant first. Every element is 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BitSequence(Vec<u8>);

impl BitSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Read the bits back as an unsigned value
    pub fn to_value(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Whether every decimal digit of `number` is a valid octal digit
pub fn is_octal_digits(mut number: u64) -> bool {
    while number > 0 {
        if number % 10 >= 8 {
            return false;
        }
        number /= 10;
    }
    true
}

/// Read the decimal digits of `number` as octal digits.
///
/// `17` becomes 15. Any digit of 8 or 9 makes the whole value 0.
pub fn octal_value(number: u64) -> u64 {
    if !is_octal_digits(number) {
        return 0;
    }
    let mut remaining = number;
    let mut value = 0u64;
    let mut place = 1u64;
    while remaining > 0 {
        value = value.saturating_add((remaining % 10).saturating_mul(place));
        place = place.saturating_mul(8);
        remaining /= 10;
    }
    value
}

/// The plain value a source number stands for under `base`.
///
/// Hexadecimal numbers arrive already parsed, so only octal is reinterpreted.
pub fn interpret(number: u64, base: ConversionBase) -> u64 {
    match base {
        ConversionBase::Decimal | ConversionBase::Hexadecimal => number,
        ConversionBase::Octal => octal_value(number),
    }
}

/// Expand `value` into at most `max_bits` bits, most significant first.
///
/// Zero is the single bit `[0]`. Wider values keep their `max_bits` lowest
/// bits. `max_bits` is clamped to `1..=64`.
pub fn to_binary(value: u64, max_bits: usize) -> BitSequence {
    if value == 0 {
        return BitSequence(vec![0]);
    }
    let max_bits = max_bits.clamp(1, MAX_EXPANSION);
    let mut bits = Vec::with_capacity(max_bits);
    let mut remaining = value;
    while remaining > 0 && bits.len() < max_bits {
        bits.push((remaining % 2) as u8);
        remaining /= 2;
    }
    bits.reverse();
    BitSequence(bits)
}

/// Convert a source number written in `base` to its bit sequence
pub fn convert(number: u64, base: ConversionBase, max_bits: usize) -> BitSequence {
    to_binary(interpret(number, base), max_bits)
}
