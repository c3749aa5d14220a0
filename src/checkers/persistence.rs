//! Saving and restoring games in a compact text format: the four bitboards
//! describing the material followed by the side to move, one value per line.
//!
//! ```text
//! 55aa550000000000
//! 0000000000000000
//! 0000000000aa55aa
//! 0000000000000000
//! 1
//! ```
//!
//! The lines are: pieces of [`Player::One`], kings of [`Player::One`], pieces
//! of [`Player::Two`], kings of [`Player::Two`] (16 lowercase hexadecimal
//! digits each) and the player to move (`1` or `2`).

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::checkers::bitboard::Bitboard;
use crate::checkers::core::Player;
use crate::checkers::position::Position;

/// Controls how much the loader trusts the input.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Accepts any five well-formed values, even if they describe a position
    /// that can not be reached in a game.
    #[default]
    Permissive,
    /// Additionally requires the position to pass [`Position::validate`].
    Strict,
}

/// Produces the saved representation of the position.
///
/// ```
/// use bitcheckers::checkers::persistence;
/// use bitcheckers::checkers::position::Position;
///
/// assert_eq!(
///     persistence::serialize(&Position::starting()),
///     "55aa550000000000\n0000000000000000\n0000000000aa55aa\n0000000000000000\n1\n"
/// );
/// ```
#[must_use]
pub fn serialize(position: &Position) -> String {
    let (one, two) = (
        position.pieces(Player::One),
        position.pieces(Player::Two),
    );
    [one.all(), one.kings(), two.all(), two.kings()]
        .iter()
        .map(|bitboard| format!("{:016x}\n", bitboard.bits()))
        .chain(std::iter::once(format!("{}\n", position.side_to_move())))
        .collect()
}

/// Writes the saved representation of the position to `output`.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn write<W: Write>(position: &Position, output: &mut W) -> anyhow::Result<()> {
    output
        .write_all(serialize(position).as_bytes())
        .context("writing saved game")?;
    output.flush().context("flushing saved game")
}

/// Saves the position to a file, replacing its contents.
///
/// # Errors
///
/// Returns an error if the file can not be created or written.
pub fn save(position: &Position, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut file = fs::File::create(path)
        .with_context(|| format!("creating save file {}", path.display()))?;
    write(position, &mut file).with_context(|| format!("saving to {}", path.display()))?;
    info!(path = %path.display(), "saved game");
    Ok(())
}

/// Parses the saved representation of a position: four hexadecimal values and
/// the player to move, separated by any whitespace. Hexadecimal values may
/// carry a `0x` prefix. Anything after the fifth value is ignored.
///
/// The position is only produced if every value is well-formed, so a failed
/// load never leaves a half-restored game behind.
///
/// # Errors
///
/// Returns an error if fewer than five values are present, any of them is
/// malformed or, in [`LoadMode::Strict`], the position is not well-formed.
pub fn parse(input: &str, mode: LoadMode) -> anyhow::Result<Position> {
    const NAMES: [&str; 4] = [
        "player 1 pieces",
        "player 1 kings",
        "player 2 pieces",
        "player 2 kings",
    ];
    let mut tokens = input.split_whitespace();
    let mut bitboards = [Bitboard::empty(); 4];
    for (bitboard, name) in bitboards.iter_mut().zip(NAMES) {
        let token = match tokens.next() {
            Some(token) => token,
            None => bail!("saved game is truncated: missing {name}"),
        };
        *bitboard = parse_bitboard(token).with_context(|| format!("parsing {name}"))?;
    }
    let side_to_move = match tokens.next() {
        Some(token) => parse_player(token).context("parsing player to move")?,
        None => bail!("saved game is truncated: missing player to move"),
    };
    let [player_one, player_one_kings, player_two, player_two_kings] = bitboards;
    let position = Position::from_parts(
        player_one,
        player_one_kings,
        player_two,
        player_two_kings,
        side_to_move,
    );
    if mode == LoadMode::Strict {
        position.validate().context("saved game is not a valid position")?;
    }
    debug!(?mode, ?position, "parsed saved game");
    Ok(position)
}

/// Reads and parses a saved game from `input`.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8 or [`parse`]
/// rejects it.
pub fn read<R: Read>(input: &mut R, mode: LoadMode) -> anyhow::Result<Position> {
    let mut contents = String::new();
    let _ = input
        .read_to_string(&mut contents)
        .context("reading saved game")?;
    parse(&contents, mode)
}

/// Restores a game saved with [`save`].
///
/// # Errors
///
/// Returns an error if the file can not be read or its contents are rejected
/// by [`parse`].
pub fn load(path: impl AsRef<Path>, mode: LoadMode) -> anyhow::Result<Position> {
    let path = path.as_ref();
    let result = fs::File::open(path)
        .with_context(|| format!("opening save file {}", path.display()))
        .and_then(|mut file| read(&mut file, mode))
        .with_context(|| format!("loading {}", path.display()));
    match &result {
        Ok(_) => info!(path = %path.display(), "loaded game"),
        Err(e) => warn!(path = %path.display(), "{e:#}"),
    }
    result
}

fn parse_bitboard(token: &str) -> anyhow::Result<Bitboard> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || digits.len() > 16 {
        bail!("bitboard should have 1 to 16 hexadecimal digits, got '{token}'");
    }
    // from_str_radix accepts a leading sign, only digits are allowed here.
    if let Some((index, invalid)) = digits
        .chars()
        .find_position(|digit| !digit.is_ascii_hexdigit())
    {
        bail!("bitboard has non-hexadecimal digit '{invalid}' at {index}, got '{token}'");
    }
    let bits = u64::from_str_radix(digits, 16)
        .with_context(|| format!("bitboard should be a 64-bit value, got '{token}'"))?;
    Ok(Bitboard::from_bits(bits))
}

fn parse_player(token: &str) -> anyhow::Result<Player> {
    let player = token
        .parse::<u8>()
        .with_context(|| format!("player should be a number, got '{token}'"))?;
    Player::try_from(player)
}
