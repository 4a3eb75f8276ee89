//! Abstract input actions and number entry
//!
//! Platform code turns key presses into `Action`s; nothing below this layer
//! knows about keyboards.

use crate::sim::ConversionBase;

/// One discrete player action for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    PauseToggle,
    Quit,
    /// A typed character while entering a number
    TextChar(char),
    Backspace,
    ConfirmText,
    CancelText,
    /// Menu choice 1, 2 or 3
    DigitChoice(u8),
}

/// Longest hex entry that still fits a `u64`
pub const MAX_HEX_DIGITS: usize = 16;
/// Longest decimal/octal entry that still fits a `u64`
pub const MAX_DECIMAL_DIGITS: usize = 18;

/// Text buffer for the number the player types, filtered by base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberEntry {
    base: ConversionBase,
    buffer: String,
}

impl NumberEntry {
    pub fn new(base: ConversionBase) -> Self {
        Self {
            base,
            buffer: String::new(),
        }
    }

    pub fn base(&self) -> ConversionBase {
        self.base
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn max_len(&self) -> usize {
        match self.base {
            ConversionBase::Hexadecimal => MAX_HEX_DIGITS,
            ConversionBase::Decimal | ConversionBase::Octal => MAX_DECIMAL_DIGITS,
        }
    }

    /// Append `c` if the base allows it. Hex digits are stored upper-case.
    pub fn push(&mut self, c: char) -> bool {
        let Some(c) = accept_char(self.base, c) else {
            return false;
        };
        if self.buffer.len() >= self.max_len() {
            return false;
        }
        self.buffer.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// The number to hand to the converter
    pub fn value(&self) -> u64 {
        parse_number(&self.buffer, self.base)
    }
}

/// Normalised form of `c` if it may be typed for `base`
pub fn accept_char(base: ConversionBase, c: char) -> Option<char> {
    match base {
        ConversionBase::Decimal => c.is_ascii_digit().then_some(c),
        ConversionBase::Octal => ('0'..='7').contains(&c).then_some(c),
        ConversionBase::Hexadecimal => c.is_ascii_hexdigit().then(|| c.to_ascii_uppercase()),
    }
}

/// Parse typed text into the source number for `base`.
///
/// Decimal and octal text is read as decimal digits (octal reinterpretation
/// happens in the converter); hex text is read as hex. Characters that are
/// not valid digits are skipped, so empty or garbage text gives 0. Values
/// that overflow saturate at `u64::MAX`.
pub fn parse_number(text: &str, base: ConversionBase) -> u64 {
    let radix = match base {
        ConversionBase::Hexadecimal => 16,
        ConversionBase::Decimal | ConversionBase::Octal => 10,
    };
    text.chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(u64::from(radix))
                .saturating_add(u64::from(digit))
        })
}
