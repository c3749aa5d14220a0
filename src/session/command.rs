use std::path::PathBuf;

/// A single line of user input.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Two squares: the first two tokens of the line. Anything after them is
    /// ignored.
    Move { from: String, to: String },
    /// Only the origin square was entered, the destination comes on the next
    /// line.
    Partial(String),
    Save(PathBuf),
    Load(PathBuf),
    Help,
    Quit,
    Empty,
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim_end_matches(&['\n', '\r'][..]);
        // "quit" is recognized as a prefix, e.g. "quit now" or "quitting".
        if input.starts_with("quit") {
            return Self::Quit;
        }
        if let Some(path) = input.strip_prefix("save ") {
            return Self::Save(PathBuf::from(path.trim()));
        }
        if let Some(path) = input.strip_prefix("load ") {
            return Self::Load(PathBuf::from(path.trim()));
        }
        if input.trim() == "help" {
            return Self::Help;
        }
        let mut parts = input.split_whitespace();
        match (parts.next(), parts.next()) {
            (None, _) => Self::Empty,
            (Some(from), None) => Self::Partial(from.to_string()),
            (Some(from), Some(to)) => Self::Move {
                from: from.to_string(),
                to: to.to_string(),
            },
        }
    }
}
