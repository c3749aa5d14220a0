//! Move legality checks: simple diagonal steps, single captures and the
//! forced-capture rule.
//!
//! All checks are pure and take the player explicitly, so they can be asked
//! about either side regardless of whose turn it is.

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::checkers::core::{Direction, Move, Player, Square};
use crate::checkers::position::Position;

/// Reasons for rejecting a move. The position is never modified when a move
/// is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The origin square does not hold a piece of the side to move.
    #[error("player {player} has no piece on {square}")]
    NotOwned {
        #[allow(missing_docs)]
        player: Player,
        #[allow(missing_docs)]
        square: Square,
    },
    /// The destination square is taken.
    #[error("square {0} is occupied")]
    Occupied(Square),
    /// Neither a capture nor a simple move.
    #[error("move {0} is illegal")]
    Illegal(Move),
    /// The move is not a capture but the side to move has one available.
    #[error("a capture is available: move {0} does not capture")]
    CaptureRequired(Move),
    /// The game is already decided.
    #[error("the game is over: player {winner} won")]
    GameOver {
        #[allow(missing_docs)]
        winner: Player,
    },
}

/// Checks that `player` may step from `from` to `to` without capturing:
/// the destination is an empty dark square exactly one diagonal step away,
/// and men only step forward.
#[must_use]
pub fn is_simple_move_legal(position: &Position, player: Player, from: Square, to: Square) -> bool {
    if position.is_occupied(to) || !position.is_owned_by(player, from) || !to.is_dark() {
        return false;
    }
    let (row_delta, column_delta) = Move::new(from, to).delta();
    if column_delta.abs() != 1 {
        return false;
    }
    if position.is_king(player, from) {
        row_delta.abs() == 1
    } else {
        row_delta == player.forward()
    }
}

/// Checks whether `player` can jump from `from` to `to` and returns the
/// square of the captured opponent's piece if so.
///
/// A capture is exactly two diagonal steps long, lands on an empty square and
/// jumps over an opponent's piece. Men only capture forward.
#[must_use]
pub fn capture(position: &Position, player: Player, from: Square, to: Square) -> Option<Square> {
    if position.is_occupied(to) || !position.is_owned_by(player, from) || !to.is_dark() {
        return None;
    }
    let (row_delta, column_delta) = Move::new(from, to).delta();
    if row_delta.abs() != 2 || column_delta.abs() != 2 {
        return None;
    }
    let captured = from.midpoint(to)?;
    if !position.is_owned_by(player.opponent(), captured) {
        return None;
    }
    if !position.is_king(player, from) && row_delta != 2 * player.forward() {
        return None;
    }
    Some(captured)
}

/// Convenience wrapper around [`capture`] for callers that only need the
/// verdict.
#[must_use]
pub fn is_capture_legal(position: &Position, player: Player, from: Square, to: Square) -> bool {
    capture(position, player, from, to).is_some()
}

/// Returns true if any piece of `player` can capture. When this holds for the
/// side to move, non-capturing moves are illegal.
#[must_use]
pub fn any_capture_available(position: &Position, player: Player) -> bool {
    position.pieces(player).all().iter().any(|from| {
        Direction::iter()
            .filter_map(|direction| from.shift(direction, 2))
            .any(|to| is_capture_legal(position, player, from, to))
    })
}
