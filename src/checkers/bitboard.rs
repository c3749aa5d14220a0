//! [`Bitboard`]-based representation for
//! [`crate::checkers::position::Position`]. Bitboard utilizes the fact that
//! modern processors operate on 64 bit integers, and the bit operations can be
//! performed simultaneously. Each side only needs two sets (all pieces and
//! kings) to describe its material, and membership, union and difference of
//! these sets are single instructions.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::{self, Write};
use std::mem;
use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor, Not, Shl, Shr, Sub};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::checkers::core::{Piece, PieceKind, Player, Square, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the
/// board.
///
/// Mirroring [`Square`] semantics, the least significant bit corresponds to
/// A8 (top left corner), and the most significant bit - to H1.
///
/// Bitboard is a thin wrapper around [u64].
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Squares pieces can stand on: (row + column) is odd.
    #[must_use]
    pub const fn dark_squares() -> Self {
        Self::from_bits(0x55AA_55AA_55AA_55AA)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn from_squares(squares: &[Square]) -> Self {
        let mut result = Self::empty();
        for square in squares {
            result |= Self::from(*square);
        }
        result
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn has_any(self) -> bool {
        !self.is_empty()
    }

    /// Adds the square to the set.
    pub fn extend(&mut self, square: Square) {
        *self |= Self::from(square);
    }

    /// Removes the square from the set if it was there.
    pub fn clear(&mut self, square: Square) {
        *self = *self - Self::from(square);
    }

    /// Flips the membership of the square.
    pub fn toggle(&mut self, square: Square) {
        *self = *self ^ Self::from(square);
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }
}

impl fmt::Debug for Bitboard {
    /// Dumps the set as an 8x8 grid, top row first: '1' for set squares and
    /// '.' for the rest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            (0..BOARD_SIZE)
                .map(|index| if (self.bits >> index) & 1 == 1 { '1' } else { '.' })
                .chunks(BOARD_WIDTH as usize)
                .into_iter()
                .map(|mut row| row.join(SQUARE_SEPARATOR))
                .join(LINE_SEPARATOR)
        )
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitor(rhs.bits))
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits.bitor_assign(rhs.bits);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitand(rhs.bits))
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitxor(rhs.bits))
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl Shl<u32> for Bitboard {
    type Output = Self;

    /// Shifts the bits to the left and ignores overflow.
    fn shl(self, rhs: u32) -> Self::Output {
        Self::from_bits(self.bits.checked_shl(rhs).unwrap_or(0))
    }
}

impl Shr<u32> for Bitboard {
    type Output = Self;

    /// Shifts the bits to the right and ignores overflow.
    fn shr(self, rhs: u32) -> Self::Output {
        Self::from_bits(self.bits.checked_shr(rhs).unwrap_or(0))
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits ^= 1 << next_index;
        // trailing_zeros() of a non-zero u64 is always in 0..64 range.
        Some(unsafe { mem::transmute(next_index as u8) })
    }
}

/// All material owned by one player. Kings are a subset of all pieces, the
/// rest are men.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pieces {
    pub(super) all: Bitboard,
    pub(super) kings: Bitboard,
}

impl Pieces {
    #[cfg(test)]
    pub(super) const fn empty() -> Self {
        Self {
            all: Bitboard::empty(),
            kings: Bitboard::empty(),
        }
    }

    /// Men fill the dark squares of the three rows closest to the player.
    pub(super) const fn starting(player: Player) -> Self {
        let home_rows = match player {
            Player::One => 0xFFFF_FF00_0000_0000,
            Player::Two => 0x0000_0000_00FF_FFFF,
        };
        Self {
            all: Bitboard::from_bits(home_rows & Bitboard::dark_squares().bits()),
            kings: Bitboard::empty(),
        }
    }

    /// Every square holding a piece of this player.
    #[must_use]
    pub const fn all(&self) -> Bitboard {
        self.all
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn kings(&self) -> Bitboard {
        self.kings
    }

    pub(super) fn at(&self, square: Square) -> Option<PieceKind> {
        if !self.all.contains(square) {
            return None;
        }
        if self.kings.contains(square) {
            Some(PieceKind::King)
        } else {
            Some(PieceKind::Man)
        }
    }

    pub(super) fn remove(&mut self, square: Square) {
        self.all.clear(square);
        self.kings.clear(square);
    }

    pub(super) fn place(&mut self, square: Square, kind: PieceKind) {
        self.all.extend(square);
        match kind {
            PieceKind::Man => self.kings.clear(square),
            PieceKind::King => self.kings.extend(square),
        }
    }
}

/// Piece-centric implementation of the checkers board: two [`Pieces`] sets,
/// one per player.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(super) struct Board {
    pub(super) player_one: Pieces,
    pub(super) player_two: Pieces,
}

impl Board {
    #[must_use]
    pub(super) const fn starting() -> Self {
        Self {
            player_one: Pieces::starting(Player::One),
            player_two: Pieces::starting(Player::Two),
        }
    }

    #[cfg(test)]
    pub(super) const fn empty() -> Self {
        Self {
            player_one: Pieces::empty(),
            player_two: Pieces::empty(),
        }
    }

    #[must_use]
    pub(super) const fn pieces(&self, player: Player) -> &Pieces {
        match player {
            Player::One => &self.player_one,
            Player::Two => &self.player_two,
        }
    }

    pub(super) fn pieces_mut(&mut self, player: Player) -> &mut Pieces {
        match player {
            Player::One => &mut self.player_one,
            Player::Two => &mut self.player_two,
        }
    }

    #[must_use]
    pub(super) fn occupied(&self) -> Bitboard {
        self.player_one.all | self.player_two.all
    }

    #[must_use]
    pub(super) fn at(&self, square: Square) -> Option<Piece> {
        if let Some(kind) = self.player_one.at(square) {
            return Some(Piece {
                owner: Player::One,
                kind,
            });
        }
        self.player_two.at(square).map(|kind| Piece {
            owner: Player::Two,
            kind,
        })
    }
}

impl fmt::Display for Board {
    /// Draws the board for humans: rank numbers on the left, file letters at
    /// the bottom, '.' for empty dark squares. Light squares are always
    /// blank, even if a permissively loaded game put a piece there.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const BORDER: &str = "  +-------------------------------+";
        writeln!(f, "{BORDER}")?;
        for (row, squares) in Square::iter().chunks(BOARD_WIDTH as usize).into_iter().enumerate() {
            write!(f, "{} |", usize::from(BOARD_WIDTH) - row)?;
            for square in squares {
                f.write_char(' ')?;
                match self.at(square) {
                    _ if !square.is_dark() => f.write_char(' ')?,
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_char('.')?,
                }
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "{BORDER}")?;
        write!(f, "    a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a compact format: '.' for empty square, piece
    /// symbol otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            Square::iter()
                .map(|square| self.at(square).map_or('.', Piece::symbol))
                .chunks(BOARD_WIDTH as usize)
                .into_iter()
                .map(|mut row| row.join(SQUARE_SEPARATOR))
                .join(LINE_SEPARATOR)
        )
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
