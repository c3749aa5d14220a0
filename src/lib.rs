//! Checkers rules engine built on top of bitboards. For more information, see
//! [README].
//!
//! [README]: https://github.com/kirillbobyrev/bitcheckers/blob/main/README.md

pub mod checkers;
pub mod session;

pub use session::{Session, SessionConfig};
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version, author and GitHub repository
/// on startup.
pub fn print_engine_info() {
    println!("Bitcheckers {}", engine_version());
    println!("<https://github.com/kirillbobyrev/bitcheckers>");
}

/// Prints the build type and whether the build is clean on startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
