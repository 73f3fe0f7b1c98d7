//! Board state representation and basic operations

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;
use crate::{Error, Result, types::Position};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '-' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Base-3 digit used by the canonical encoding.
    pub fn digit(self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game. X is player 1 (maximizer), O is player 2 (minimizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Resolve a numeric player id (1 = X, 2 = O).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlayerId`] for any other id.
    pub fn from_id(id: u8) -> Result<Player> {
        match id {
            1 => Ok(Player::X),
            2 => Ok(Player::O),
            _ => Err(Error::InvalidPlayerId { id }),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Player::X => 1,
            Player::O => 2,
        }
    }

    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// X maximizes the shared value function, O minimizes it.
    pub fn is_maximizer(self) -> bool {
        self == Player::X
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Terminal classification of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Draw,
    Win(Player),
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Running
    }

    /// Reward of a finished game from X's point of view: draw 0, X win +1, O win -1.
    pub fn reward(self) -> Option<f64> {
        match self {
            GameStatus::Running => None,
            GameStatus::Draw => Some(0.0),
            GameStatus::Win(Player::X) => Some(1.0),
            GameStatus::Win(Player::O) => Some(-1.0),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Running => write!(f, "running"),
            GameStatus::Draw => write!(f, "draw"),
            GameStatus::Win(player) => write!(f, "{player} win"),
        }
    }
}

/// A 3x3 Tic-Tac-Toe grid.
///
/// Equality and hashing go through [`GameState::canonical_code`], so two
/// grids related by a rotation or reflection are the same key in any
/// `HashMap`. Compare [`GameState::cells`] for raw grid equality.
#[derive(Debug, Clone, Copy)]
pub struct GameState {
    cells: [Cell; 9],
}

impl GameState {
    /// Create a new empty board
    pub fn new() -> Self {
        Self::from_cells([Cell::Empty; 9])
    }

    /// Board from row-major cells (index 0 = top-left).
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        GameState { cells }
    }

    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Cell at a keypad position
    pub fn cell(&self, position: Position) -> Cell {
        self.cells[position.index()]
    }

    /// Number of marks on the board.
    pub fn ply(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Player to move under strict alternation with X opening.
    pub fn to_move(&self) -> Player {
        if self.ply().is_multiple_of(2) {
            Player::X
        } else {
            Player::O
        }
    }

    /// Place `player`'s mark at keypad `position` and classify the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if the position is outside 1..=9
    /// and [`Error::OccupiedCell`] if it is already taken.
    pub fn apply(&mut self, position: usize, player: Player) -> Result<GameStatus> {
        let pos = Position::new(position)?;
        let idx = pos.index();
        if self.cells[idx] != Cell::Empty {
            return Err(Error::OccupiedCell { position });
        }
        self.cells[idx] = player.to_cell();
        Ok(self.terminal_status())
    }

    /// Like [`GameState::apply`] but with a numeric player id (1 or 2).
    pub fn apply_by_id(&mut self, position: usize, player_id: u8) -> Result<GameStatus> {
        let player = Player::from_id(player_id)?;
        self.apply(position, player)
    }

    /// Return the board after the move without touching `self`.
    #[must_use = "simulate returns a new board state; the original is unchanged"]
    pub fn simulate(&self, position: usize, player: Player) -> Result<GameState> {
        let mut next = *self;
        next.apply(position, player)?;
        Ok(next)
    }

    /// Empty keypad positions in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        Position::all()
            .filter(|&pos| self.cells[pos.index()] == Cell::Empty)
            .map(Position::value)
            .collect()
    }

    /// Classify the board: first complete line wins, else full board draws.
    pub fn terminal_status(&self) -> GameStatus {
        if let Some(winner) = LineAnalyzer::first_winner(&self.cells) {
            return GameStatus::Win(winner);
        }
        if self.cells.contains(&Cell::Empty) {
            GameStatus::Running
        } else {
            GameStatus::Draw
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal_status().is_terminal()
    }

    /// Raw base-3 code of this exact grid, top-left cell most significant.
    pub fn encode(&self) -> u32 {
        Self::code_of(&self.cells)
    }

    fn code_of(cells: &[Cell; 9]) -> u32 {
        cells.iter().fold(0, |acc, cell| acc * 3 + cell.digit())
    }

    /// Minimal code over the 8 symmetric renderings.
    pub fn canonical_code(&self) -> u32 {
        self.symmetries()
            .iter()
            .map(GameState::encode)
            .min()
            .unwrap_or_else(|| self.encode())
    }

    /// The symmetric rendering with the minimal code.
    pub fn canonical_form(&self) -> GameState {
        self.symmetries()
            .into_iter()
            .min_by_key(GameState::encode)
            .unwrap_or(*self)
    }

    /// Textual key: rows top to bottom separated by `/`, e.g. `X.O/.X./..O`.
    pub fn label(&self) -> String {
        let mut label = String::with_capacity(11);
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % 3 == 0 {
                label.push('/');
            }
            label.push(cell.to_char());
        }
        label
    }

    /// Parse a board label. Row separators (`/`, `|`) and whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if there are not exactly 9 cells or a character is
    /// not a cell.
    pub fn from_label(label: &str) -> Result<Self> {
        let chars: Vec<char> = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .collect();
        if chars.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: label.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: label.to_string(),
            })?;
        }
        Ok(GameState { cells })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_code() == other.canonical_code()
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_code().hash(state);
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
