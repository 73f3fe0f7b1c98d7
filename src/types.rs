//! Newtype wrappers for board positions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A move position in numeric-keypad layout.
///
/// ```text
/// 7 | 8 | 9
/// 4 | 5 | 6
/// 1 | 2 | 3
/// ```
///
/// Internally the board is stored row-major from the top-left corner, so
/// position 7 is cell index 0 and position 3 is cell index 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(usize);

impl Position {
    /// Create a new position, validating it's within 1..=9.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] otherwise.
    pub fn new(value: usize) -> Result<Self, crate::Error> {
        if (1..=9).contains(&value) {
            Ok(Position(value))
        } else {
            Err(crate::Error::InvalidPosition { position: value })
        }
    }

    /// Position for a row-major cell index (0 = top-left), `None` past the last cell.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < 9).then(|| {
            let (row, col) = (index / 3, index % 3);
            Position(1 + 3 * (2 - row) + col)
        })
    }

    /// Row-major cell index (0 = top-left).
    pub fn index(self) -> usize {
        let row = 2 - (self.0 - 1) / 3;
        let col = (self.0 - 1) % 3;
        row * 3 + col
    }

    /// Get the inner value.
    pub fn value(self) -> usize {
        self.0
    }

    /// All nine positions in ascending order.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=9).map(Position)
    }
}

impl From<Position> for usize {
    fn from(pos: Position) -> Self {
        pos.0
    }
}

impl TryFrom<usize> for Position {
    type Error = crate::Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Position::new(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
