//! The session puts all pieces together: it renders the board, reads moves and
//! commands from the input stream and applies them to the game until one of
//! the players wins or the input ends.
//!
//! [`Session::run`] is the "main loop" of the game. It is generic over the
//! I/O, so it can be driven by a terminal as well as by scripted input.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::checkers::core::{Move, Square};
use crate::checkers::persistence::{self, LoadMode};
use crate::checkers::position::Position;
use crate::checkers::rules::MoveError;
use crate::session::command::Command;

mod command;

const PROMPT: &str = "Enter move (from to). Use a3 b4 or numeric 0-63.\n  Commands: save <file>  load <file>  quit\n> ";

const HELP: &str = "Squares are given either as a file letter and a rank digit (e.g. a3) or
as an index from 0 (a8) to 63 (h1). The destination can be entered on
the next line. Captures are mandatory: if any piece can capture, a
non-capturing move is rejected.
  save <file>  writes the game to <file>
  load <file>  replaces the game with the one stored in <file>
  quit         ends the session";

/// Settings of the interactive session.
///
/// Unlike the library loader, whose [`LoadMode::default`] is
/// [`LoadMode::Permissive`], the session validates loaded games by default:
/// see [`SessionConfig::DEFAULT`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// How saved games are checked when loaded.
    pub load_mode: LoadMode,
}

impl SessionConfig {
    /// Players load files by hand, so only reachable positions are accepted.
    pub const DEFAULT: Self = Self {
        load_mode: LoadMode::Strict,
    };
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Interactive game between two players sharing the same input stream.
pub struct Session<'a, R: BufRead, W: Write> {
    position: Position,
    config: SessionConfig,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a new session with the starting position and provided I/O.
    #[must_use]
    pub fn new(config: SessionConfig, input: &'a mut R, output: &'a mut W) -> Self {
        Self::with_position(Position::starting(), config, input, output)
    }

    /// Creates a session resuming the game from `position`.
    #[must_use]
    pub fn with_position(
        position: Position,
        config: SessionConfig,
        input: &'a mut R,
        output: &'a mut W,
    ) -> Self {
        Self {
            position,
            config,
            input,
            output,
        }
    }

    /// Current state of the game.
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Plays the game until a player wins, "quit" is entered or the input
    /// ends.
    ///
    /// Rejected moves and failed saves or loads are reported to the output
    /// and the game goes on.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the input or writing the output
    /// fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "{}\n", &self.position)?;
            if let Some(winner) = self.position.winner() {
                writeln!(self.output, "Player {winner} wins.")?;
                break;
            }
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match Command::parse(&line) {
                Command::Quit => break,
                Command::Save(path) => self.handle_save(&path)?,
                Command::Load(path) => self.handle_load(&path)?,
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Empty => {},
                Command::Move { from, to } => self.handle_move(&from, &to)?,
                Command::Partial(from) => {
                    let Some(line) = self.read_line()? else {
                        break;
                    };
                    if let Some(to) = line.split_whitespace().next() {
                        self.handle_move(&from, to)?;
                    }
                },
            }
        }
        writeln!(self.output, "Exiting game.")?;
        self.output.flush()?;
        Ok(())
    }

    /// Returns the next line or [`None`] at the end of the input.
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    /// Decodes both squares and makes the move, reporting why it was
    /// rejected if it was.
    fn handle_move(&mut self, from: &str, to: &str) -> anyhow::Result<()> {
        let (from, to) = match (Square::try_from(from), Square::try_from(to)) {
            (Ok(from), Ok(to)) => (from, to),
            (from, to) => {
                debug!(?from, ?to, "can not decode squares");
                writeln!(self.output, "Invalid coordinates.")?;
                return Ok(());
            },
        };
        match self.position.make_move(Move::new(from, to)) {
            Ok(_) => {},
            Err(MoveError::CaptureRequired(_)) => {
                writeln!(self.output, "A capture is available. You must capture.")?;
            },
            Err(e) => {
                debug!("{e}");
                writeln!(self.output, "Illegal move.")?;
            },
        }
        Ok(())
    }

    fn handle_save(&mut self, path: &Path) -> anyhow::Result<()> {
        match persistence::save(&self.position, path) {
            Ok(()) => writeln!(self.output, "Saved to {}", path.display())?,
            Err(e) => writeln!(self.output, "Save failed: {e:#}")?,
        }
        Ok(())
    }

    /// Replaces the game with the saved one. The current game is kept if the
    /// load fails.
    fn handle_load(&mut self, path: &Path) -> anyhow::Result<()> {
        match persistence::load(path, self.config.load_mode) {
            Ok(position) => {
                self.position = position;
                writeln!(self.output, "Loaded {}", path.display())?;
            },
            Err(e) => writeln!(self.output, "Load failed: {e:#}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::checkers::bitboard::Bitboard;
    use crate::checkers::core::Player;

    fn play(position: Position, input: &str) -> (Position, String) {
        let mut input = input.as_bytes();
        let mut output = Vec::new();
        let mut session =
            Session::with_position(position, SessionConfig::default(), &mut input, &mut output);
        assert!(session.run().is_ok());
        let position = *session.position();
        (position, String::from_utf8(output).unwrap())
    }

    fn messages(output: &str) -> Vec<&str> {
        // Responses follow the prompt on the same line.
        output
            .lines()
            .map(|line| line.trim_start_matches("> "))
            .filter(|line| line.ends_with('.') && !line.starts_with("Enter move"))
            .collect()
    }

    #[test]
    fn quit_immediately() {
        let (position, output) = play(Position::starting(), "quit\n");
        assert_eq!(position, Position::starting());
        assert!(output.starts_with(&Position::starting().to_string()));
        assert!(output.contains(PROMPT));
        assert!(output.ends_with("> Exiting game.\n"));
    }

    #[test]
    fn end_of_input() {
        let (_, output) = play(Position::starting(), "");
        assert!(output.ends_with("> Exiting game.\n"));
    }

    #[test]
    fn moves() {
        let (position, output) = play(Position::starting(), "a3 b4\nb6\na5\n\nquit\n");
        assert!(position.is_owned_by(Player::One, Square::B4));
        assert!(position.is_owned_by(Player::Two, Square::A5));
        assert_eq!(position.side_to_move(), Player::One);
        assert_eq!(messages(&output), vec!["Exiting game."]);
        assert!(output.contains("Turn: Player 2 (b/B)"));
    }

    #[test]
    fn rejected_moves() {
        let (position, output) = play(
            Position::starting(),
            "a3 a9\nj9 b4\n64 33\na3 a4\nb6 a5\na1 b2\nquit\n",
        );
        assert_eq!(position, Position::starting());
        assert_eq!(
            messages(&output),
            vec![
                "Invalid coordinates.",
                "Invalid coordinates.",
                "Invalid coordinates.",
                "Illegal move.",
                "Illegal move.",
                "Illegal move.",
                "Exiting game.",
            ]
        );
    }

    #[test]
    fn forced_capture() {
        let position = Position::from_parts(
            Bitboard::from_squares(&[Square::D4, Square::A3]),
            Bitboard::empty(),
            Bitboard::from_squares(&[Square::E5, Square::H8]),
            Bitboard::empty(),
            Player::One,
        );
        let (position, output) = play(position, "a3 b4\nd4 f6\n");
        assert_eq!(
            messages(&output),
            vec![
                "A capture is available. You must capture.",
                "Exiting game."
            ]
        );
        assert!(!position.is_occupied(Square::E5));
        assert!(position.is_owned_by(Player::One, Square::F6));
    }

    #[test]
    fn win() {
        let position = Position::from_parts(
            Bitboard::from(Square::D4),
            Bitboard::empty(),
            Bitboard::from(Square::E5),
            Bitboard::empty(),
            Player::One,
        );
        let (position, output) = play(position, "d4 f6\nthis is never read\n");
        assert_eq!(position.winner(), Some(Player::One));
        assert!(output.ends_with("Player 1 wins.\nExiting game.\n"));
        assert_eq!(output.matches(PROMPT).count(), 1);
    }

    #[test]
    fn help() {
        let (_, output) = play(Position::starting(), "help\nquit\n");
        assert!(output.contains(HELP));
    }

    #[test]
    fn save_and_load() {
        let directory = std::env::temp_dir().join(format!(
            "bitcheckers-session-{}",
            std::process::id()
        ));
        assert!(std::fs::create_dir_all(&directory).is_ok());
        let path = directory.join("game.txt");
        let input = format!(
            "a3 b4\nsave {path}\nb6 a5\nload {path}\nquit\n",
            path = path.display()
        );
        let (position, output) = play(Position::starting(), &input);
        assert!(output.contains(&format!("Saved to {}\n", path.display())));
        assert!(output.contains(&format!("Loaded {}\n", path.display())));
        // The game is back to the saved state: player 2 to move.
        assert!(position.is_owned_by(Player::One, Square::B4));
        assert!(position.is_owned_by(Player::Two, Square::B6));
        assert_eq!(position.side_to_move(), Player::Two);
        assert!(std::fs::remove_dir_all(&directory).is_ok());
    }

    #[test]
    fn loads_are_validated_by_default() {
        assert_eq!(SessionConfig::default().load_mode, LoadMode::Strict);
        assert_eq!(LoadMode::default(), LoadMode::Permissive);

        // Both players on d4.
        let overlapping = Position::from_parts(
            Bitboard::from(Square::D4),
            Bitboard::empty(),
            Bitboard::from(Square::D4),
            Bitboard::empty(),
            Player::One,
        );
        let path = std::env::temp_dir().join(format!(
            "bitcheckers-session-overlap-{}.txt",
            std::process::id()
        ));
        assert!(persistence::save(&overlapping, &path).is_ok());
        let (position, output) = play(
            Position::starting(),
            &format!("load {}\nquit\n", path.display()),
        );
        assert!(output.contains("Load failed: "));
        assert_eq!(position, Position::starting());

        let script = format!("load {}\nquit\n", path.display());
        let mut input = script.as_bytes();
        let mut output = Vec::new();
        let config = SessionConfig {
            load_mode: LoadMode::Permissive,
        };
        let mut session = Session::new(config, &mut input, &mut output);
        assert!(session.run().is_ok());
        assert_eq!(*session.position(), overlapping);
        assert!(std::fs::remove_file(&path).is_ok());
    }

    #[test]
    fn failed_load_keeps_game() {
        let path = std::env::temp_dir().join("bitcheckers-session-missing-file.txt");
        let (position, output) = play(
            Position::starting(),
            &format!("a3 b4\nload {}\nquit\n", path.display()),
        );
        assert!(output.contains("Load failed: "));
        assert!(position.is_owned_by(Player::One, Square::B4));
    }
}
