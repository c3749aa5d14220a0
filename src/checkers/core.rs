//! Checkers primitives commonly used within [`crate::checkers`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::{bail, Context};
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A request to move a piece from one square to another. Both simple moves
/// (one diagonal step) and captures (a two-square jump over an opponent's
/// piece) are expressed as a pair of squares: the kind of the move is
/// determined by the [`crate::checkers::position::Position`] it is applied in.
///
/// A move only lives between parsing user input and being applied: it is not
/// stored anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub(super) from: Square,
    pub(super) to: Square,
}

impl Move {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Square the moving piece starts on.
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Destination square.
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Vertical and horizontal distance covered by the move.
    #[must_use]
    pub(super) const fn delta(self) -> (i8, i8) {
        (
            self.to.row() as i8 - self.from.row() as i8,
            self.to.column() as i8 - self.from.column() as i8,
        )
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    /// Parses two whitespace-separated squares, each in any format accepted
    /// by [`Square::try_from`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let (from, to) = match input.split_whitespace().collect_tuple() {
            Some((from, to)) => (from, to),
            None => bail!("move should consist of two squares, got '{input}'"),
        };
        Ok(Self::new(from.try_into()?, to.try_into()?))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

bitflags::bitflags! {
    /// Describes what happened when a [`Move`] was made.
    ///
    /// | Index | Promotion | Capture | Move Kind |
    /// | ----- | --------- | ------- | --------- |
    /// | 0 | 0 | 0 | Quiet move |
    /// | 1 | 0 | 1 | Capture |
    /// | 2 | 1 | 0 | Promotion |
    /// | 3 | 1 | 1 | Capture and promotion |
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct MoveKind: u8 {
        /// A man or a king stepped to an adjacent diagonal square.
        const QUIET = 0;
        /// An opponent's piece was jumped over and removed.
        const CAPTURE = 0b01;
        /// A man reached the opponent's home row and was crowned.
        const PROMOTION = 0b10;
    }
}

/// Board squares: from left to right, from top to the bottom. The top row is
/// the home row of [`Player::Two`], the bottom row is the home row of
/// [`Player::One`].
///
/// ```
/// use bitcheckers::checkers::core::Square;
///
/// assert_eq!(Square::A8 as u8, 0);
/// assert_eq!(Square::H8 as u8, 7);
/// assert_eq!(Square::B3 as u8, 8 * 5 + 1);
/// assert_eq!(Square::H1 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use bitcheckers::checkers::core::Square;
/// use std::mem;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8, // Row 0
    A7, B7, C7, D7, E7, F7, G7, H7, // Row 1
    A6, B6, C6, D6, E6, F6, G6, H6, // Row 2
    A5, B5, C5, D5, E5, F5, G5, H5, // Row 3
    A4, B4, C4, D4, E4, F4, G4, H4, // Row 4
    A3, B3, C3, D3, E3, F3, G3, H3, // Row 5
    A2, B2, C2, D2, E2, F2, G2, H2, // Row 6
    A1, B1, C1, D1, E1, F1, G1, H1, // Row 7
}

impl Square {
    /// Connects file (column) and rank to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        let row = BOARD_WIDTH - 1 - rank as u8;
        unsafe { mem::transmute(row * BOARD_WIDTH + file as u8) }
    }

    /// Returns the square at given zero-based row (counting from the top) and
    /// column (counting from the left), if both are on the board.
    #[must_use]
    pub const fn from_row_column(row: i8, column: i8) -> Option<Self> {
        const WIDTH: i8 = BOARD_WIDTH as i8;
        if row < 0 || row >= WIDTH || column < 0 || column >= WIDTH {
            return None;
        }
        Some(unsafe { mem::transmute((row * WIDTH + column) as u8) })
    }

    /// Zero-based row, 0 being the top one (rank 8).
    #[must_use]
    pub const fn row(self) -> u8 {
        self as u8 / BOARD_WIDTH
    }

    /// Zero-based column, 0 being the leftmost one (file a).
    #[must_use]
    pub const fn column(self) -> u8 {
        self as u8 % BOARD_WIDTH
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self.column()) }
    }

    /// Returns rank on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(BOARD_WIDTH - 1 - self.row()) }
    }

    /// Dark squares are the only ones pieces can ever occupy.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        (self.row() + self.column()) % 2 == 1
    }

    /// Moves `distance` squares diagonally towards `direction`. Returns
    /// [`None`] when the target falls off the board.
    #[must_use]
    pub const fn shift(self, direction: Direction, distance: i8) -> Option<Self> {
        let (row_delta, column_delta) = direction.delta();
        Self::from_row_column(
            self.row() as i8 + row_delta * distance,
            self.column() as i8 + column_delta * distance,
        )
    }

    /// The square halfway between `self` and `other`, if such a square
    /// exists (i.e. both row and column distance are even).
    #[must_use]
    pub const fn midpoint(self, other: Self) -> Option<Self> {
        let (row_sum, column_sum) = (
            self.row() + other.row(),
            self.column() + other.column(),
        );
        if row_sum % 2 != 0 || column_sum % 2 != 0 {
            return None;
        }
        Self::from_row_column((row_sum / 2) as i8, (column_sum / 2) as i8)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Decodes a square from user input. Two formats are accepted:
    ///
    /// - Bare index in 0..[`BOARD_SIZE`] range (e.g. "41").
    /// - File letter (case-insensitive) followed by the rank digit (e.g. "b3"
    ///   or "B3").
    ///
    /// ```
    /// use bitcheckers::checkers::core::Square;
    ///
    /// assert_eq!(Square::try_from("b3").unwrap(), Square::B3);
    /// assert_eq!(Square::try_from("H1").unwrap(), Square::H1);
    /// assert_eq!(Square::try_from("41").unwrap(), Square::B3);
    /// assert!(Square::try_from("a9").is_err());
    /// assert!(Square::try_from("64").is_err());
    /// ```
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let square = input.trim();
        if square.is_empty() {
            bail!("square can not be empty");
        }
        if square.bytes().all(|c| c.is_ascii_digit()) {
            let index = square
                .parse::<u8>()
                .with_context(|| format!("square index should be in 0..BOARD_SIZE, got {square}"))?;
            return Self::try_from(index);
        }
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column of the board. In notation, it is normally represented
/// with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file.to_ascii_lowercase() {
            lowercase @ 'a'..='h' => Ok(unsafe { mem::transmute(lowercase as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

/// Represents a horizontal row of the board. In notation, it is represented
/// with a number. The implementation assumes zero-based values (i.e. rank 1
/// would be 0). Rank 1 is the bottom row, closest to [`Player::One`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A game of checkers is played between two players. [`Player::One`] starts
/// at the bottom of the board and makes the first move.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// "Flips" the player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Row delta of a single step towards the opponent's home row.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::One => -1,
            Self::Two => 1,
        }
    }

    /// Row in which men of this player are crowned.
    #[must_use]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Self::One => 0,
            Self::Two => BOARD_WIDTH - 1,
        }
    }

    /// Symbols used by the board rendering: man and king.
    #[must_use]
    pub const fn symbols(self) -> (char, char) {
        match self {
            Self::One => ('r', 'R'),
            Self::Two => ('b', 'B'),
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = anyhow::Error;

    fn try_from(player: u8) -> anyhow::Result<Self> {
        match player {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => bail!("player should be 1 or 2, got {player}"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::One => '1',
            Self::Two => '2',
        })
    }
}

/// Men can only move forward, kings were crowned and can move both ways.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    Man,
    King,
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    /// Lowercase for men, uppercase for kings.
    #[must_use]
    pub const fn symbol(self) -> char {
        let (man, king) = self.owner.symbols();
        match self.kind {
            PieceKind::Man => man,
            PieceKind::King => king,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Diagonal directions on the board from the perspective of an observer
/// looking at the rendered board (row 0 on top).
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Towards row 0 and file a.
    UpLeft,
    /// Towards row 0 and file h.
    UpRight,
    /// Towards row 7 and file a.
    DownLeft,
    /// Towards row 7 and file h.
    DownRight,
}

impl Direction {
    /// Row and column delta of a single step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::UpRight => (-1, 1),
            Self::DownLeft => (1, -1),
            Self::DownRight => (1, 1),
        }
    }
}
