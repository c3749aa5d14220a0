//! Provides fully-specified checkers [`Position`]: stores the material of both
//! players and tracks whose turn it is.
//!
//! Move making is implemented here as the only way of mutating [`Position`].
//! The legality checks it relies on live in [`crate::checkers::rules`].

use std::fmt;

use anyhow::bail;
use itertools::Itertools;
use tracing::debug;

use crate::checkers::bitboard::{Bitboard, Board, Pieces};
use crate::checkers::core::{Move, MoveKind, Piece, PieceKind, Player, Square};
use crate::checkers::rules::{self, MoveError};

/// State of the game: the board and the side to move.
///
/// The material of each player is stored in two [`Bitboard`]s (all pieces and
/// kings), so the whole state is four 64-bit words and a turn indicator. That
/// is also exactly what [`crate::checkers::persistence`] writes to disk.
///
/// A well-formed position satisfies the following:
///
/// - No square is occupied by both players.
/// - Kings of each player are a subset of that player's pieces.
/// - Pieces only stand on dark squares.
///
/// Positions reached through [`Position::starting`] and move making are
/// always well-formed. Positions assembled with [`Position::from_parts`] are
/// not checked, [`Position::validate`] can be used for that.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Player,
}

impl Position {
    /// Creates the starting position: men of both players on the dark squares
    /// of their three home rows, [`Player::One`] to move.
    ///
    /// ```
    /// use bitcheckers::checkers::core::{Player, Square};
    /// use bitcheckers::checkers::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(starting_position.side_to_move(), Player::One);
    /// assert!(starting_position.is_owned_by(Player::One, Square::A3));
    /// assert!(starting_position.is_owned_by(Player::Two, Square::B8));
    /// assert_eq!(starting_position.pieces(Player::One).all().count(), 12);
    /// ```
    #[must_use]
    pub const fn starting() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Player::One,
        }
    }

    #[cfg(test)]
    const fn empty() -> Self {
        Self {
            board: Board::empty(),
            side_to_move: Player::One,
        }
    }

    /// Assembles a position from raw sets. The result is not validated.
    #[must_use]
    pub const fn from_parts(
        player_one: Bitboard,
        player_one_kings: Bitboard,
        player_two: Bitboard,
        player_two_kings: Bitboard,
        side_to_move: Player,
    ) -> Self {
        Self {
            board: Board {
                player_one: Pieces {
                    all: player_one,
                    kings: player_one_kings,
                },
                player_two: Pieces {
                    all: player_two,
                    kings: player_two_kings,
                },
            },
            side_to_move,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn they(&self) -> Player {
        self.us().opponent()
    }

    /// Material of the given player.
    #[must_use]
    pub const fn pieces(&self, player: Player) -> &Pieces {
        self.board.pieces(player)
    }

    /// Squares occupied by either player.
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.board.occupied()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.occupied().contains(square)
    }

    /// Returns true if `square` holds a piece (man or king) of `player`.
    #[must_use]
    pub const fn is_owned_by(&self, player: Player, square: Square) -> bool {
        self.pieces(player).all().contains(square)
    }

    /// Returns true if `square` holds a king of `player`.
    #[must_use]
    pub const fn is_king(&self, player: Player, square: Square) -> bool {
        self.pieces(player).kings().contains(square)
    }

    /// Returns the piece standing on `square`, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    /// Checks that the position is well-formed and reports the first
    /// violation along with the offending squares.
    ///
    /// # Errors
    ///
    /// Returns an error if some square is occupied by both players, a king is
    /// recorded on a square without a piece of the same player or a piece
    /// stands on a light square.
    pub fn validate(&self) -> anyhow::Result<()> {
        let shared = self.pieces(Player::One).all() & self.pieces(Player::Two).all();
        if shared.has_any() {
            bail!(
                "squares occupied by both players: {}",
                shared.iter().join(", ")
            );
        }
        for player in [Player::One, Player::Two] {
            let pieces = self.pieces(player);
            let orphan_kings = pieces.kings() - pieces.all();
            if orphan_kings.has_any() {
                bail!(
                    "kings of player {player} without pieces: {}",
                    orphan_kings.iter().join(", ")
                );
            }
        }
        let light = (self.occupied()
            | self.pieces(Player::One).kings()
            | self.pieces(Player::Two).kings())
            - Bitboard::dark_squares();
        if light.has_any() {
            bail!("pieces on light squares: {}", light.iter().join(", "));
        }
        Ok(())
    }

    /// Returns the winner once one of the players has no pieces left.
    ///
    /// [`Player::One`] running out of pieces is checked first: if both players
    /// have no pieces (only possible in a crafted position), [`Player::Two`]
    /// is the winner.
    #[must_use]
    pub const fn winner(&self) -> Option<Player> {
        if self.pieces(Player::One).all().is_empty() {
            Some(Player::Two)
        } else if self.pieces(Player::Two).all().is_empty() {
            Some(Player::One)
        } else {
            None
        }
    }

    /// Applies the move for the side to move without enforcing the
    /// forced-capture rule.
    ///
    /// A capture is tried first, then a simple move. On success the moving
    /// piece keeps its king status, men reaching the far row are crowned and
    /// the turn passes to the opponent.
    ///
    /// # Errors
    ///
    /// The position is left intact and [`MoveError`] describes the reason if
    /// the origin square does not hold a piece of the side to move, the
    /// destination is occupied or the move is neither a legal capture nor a
    /// legal simple move.
    pub fn apply_move(&mut self, next_move: Move) -> Result<MoveKind, MoveError> {
        let (us, they) = (self.us(), self.they());
        let (from, to) = (next_move.from(), next_move.to());
        if !self.is_owned_by(us, from) {
            return Err(MoveError::NotOwned {
                player: us,
                square: from,
            });
        }
        if self.is_occupied(to) {
            return Err(MoveError::Occupied(to));
        }
        let mut kind = MoveKind::QUIET;
        if let Some(captured) = rules::capture(self, us, from, to) {
            self.board.pieces_mut(they).remove(captured);
            kind |= MoveKind::CAPTURE;
        } else if !rules::is_simple_move_legal(self, us, from, to) {
            return Err(MoveError::Illegal(next_move));
        }
        let was_king = self.is_king(us, from);
        let crowned = !was_king && to.row() == us.promotion_row();
        let pieces = self.board.pieces_mut(us);
        pieces.remove(from);
        pieces.place(
            to,
            if was_king || crowned {
                PieceKind::King
            } else {
                PieceKind::Man
            },
        );
        if crowned {
            kind |= MoveKind::PROMOTION;
        }
        self.side_to_move = they;
        debug!(player = %us, %next_move, ?kind, "applied move");
        Ok(kind)
    }

    /// Checked version of [`Position::apply_move`]: refuses to move once the
    /// game is decided and enforces the forced-capture rule.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] if there is a winner already,
    /// [`MoveError::CaptureRequired`] if the move is not a capture while the
    /// side to move has one available and any error of
    /// [`Position::apply_move`] otherwise.
    pub fn make_move(&mut self, next_move: Move) -> Result<MoveKind, MoveError> {
        if let Some(winner) = self.winner() {
            return Err(MoveError::GameOver { winner });
        }
        let us = self.us();
        if !rules::is_capture_legal(self, us, next_move.from(), next_move.to())
            && rules::any_capture_available(self, us)
        {
            return Err(MoveError::CaptureRequired(next_move));
        }
        self.apply_move(next_move)
    }
}

impl fmt::Display for Position {
    /// Draws the board followed by the turn line, e.g. "Turn: Player 1 (r/R)".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", &self.board)?;
        let (man, king) = self.side_to_move.symbols();
        write!(f, "Turn: Player {} ({man}/{king})", &self.side_to_move)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        for player in [Player::One, Player::Two] {
            let pieces = self.pieces(player);
            writeln!(
                f,
                "Player {player}: {:016x} kings: {:016x}",
                pieces.all().bits(),
                pieces.kings().bits()
            )?;
        }
        Ok(())
    }
}
