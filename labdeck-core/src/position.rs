//! Position label codec
//!
//! Deck slots and microplate wells share one addressing scheme: a row letter
//! followed by a 1-based column number ("A1", "h12"). Internally every label
//! is normalized to a zero-indexed (row, column) pair.

use core::fmt;

use alloc::string::ToString;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// Number of addressable rows (A through Z)
pub const MAX_ROWS: u16 = 26;

/// Highest 1-based column label
///
/// Columns are stored zero-indexed in a `u16`, and one value is held back so
/// every stored column still has a label.
pub const MAX_COLUMNS: u16 = u16::MAX - 1;

/// Zero-indexed (row, column) address
///
/// Only obtainable from [`normalize`] or [`Position::from_indices`], so a
/// `Position` always renders back to a valid label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    row: u16,
    col: u16,
}

impl Position {
    /// Build a position from zero-indexed row and column
    ///
    /// Returns `None` if the row has no letter or the column lies past
    /// [`MAX_COLUMNS`].
    pub const fn from_indices(row: u16, col: u16) -> Option<Self> {
        if row >= MAX_ROWS || col >= MAX_COLUMNS {
            return None;
        }
        Some(Self { row, col })
    }

    /// Zero-indexed row (A = 0)
    pub const fn row(&self) -> u16 {
        self.row
    }

    /// Zero-indexed column (1 = 0)
    pub const fn col(&self) -> u16 {
        self.col
    }

    /// Row letter in upper case
    pub const fn row_letter(&self) -> char {
        (b'A' + self.row as u8) as char
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col + 1)
    }
}

/// Normalize a position label into a zero-indexed [`Position`]
///
/// The label must be exactly one ASCII letter (either case) followed by a
/// decimal integer from 1 to [`MAX_COLUMNS`] (65534). Leading zeros in the
/// column are accepted; `A65535` and larger fail with
/// [`DeckError::InvalidPosition`].
pub fn normalize(label: &str) -> Result<Position, DeckError> {
    let invalid = || DeckError::InvalidPosition(label.to_string());

    let mut chars = label.chars();
    let letter = chars.next().ok_or_else(invalid)?;
    if !letter.is_ascii_alphabetic() {
        return Err(invalid());
    }

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let column: u16 = digits.parse().map_err(|_| invalid())?;
    if column == 0 || column > MAX_COLUMNS {
        return Err(invalid());
    }

    let row = (letter.to_ascii_uppercase() as u8 - b'A') as u16;
    let position = Position {
        row,
        col: column - 1,
    };
    trace!("normalized {=str} -> {}", label, position);
    Ok(position)
}
