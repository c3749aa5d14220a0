use std::fs;

use bitcheckers::checkers::bitboard::Bitboard;
use bitcheckers::checkers::core::{Move, Player, Square};
use bitcheckers::checkers::persistence::{self, LoadMode};
use bitcheckers::checkers::position::Position;
use pretty_assertions::assert_eq;

fn temporary_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("bitcheckers-{}-{name}", std::process::id()))
}

#[test]
fn save_then_load() {
    let mut position = Position::starting();
    let path = temporary_file("save_then_load.txt");
    for next_move in ["c3 d4", "f6 e5", "d4 f6", "g7 e5", "b2 c3"] {
        assert!(
            position.make_move(Move::try_from(next_move).unwrap()).is_ok(),
            "{next_move}"
        );
        persistence::save(&position, &path).expect("saving should succeed");
        for mode in [LoadMode::Permissive, LoadMode::Strict] {
            assert_eq!(persistence::load(&path, mode).unwrap(), position);
        }
    }
    fs::remove_file(&path).unwrap();
}

#[test]
fn file_format() {
    let position = Position::from_parts(
        Bitboard::from(Square::B8),
        Bitboard::from(Square::B8),
        Bitboard::from(Square::H2),
        Bitboard::empty(),
        Player::Two,
    );
    let path = temporary_file("file_format.txt");
    persistence::save(&position, &path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0000000000000002\n\
         0000000000000002\n\
         0080000000000000\n\
         0000000000000000\n\
         2\n"
    );
    fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file() {
    let path = temporary_file("does_not_exist.txt");
    let error = persistence::load(&path, LoadMode::Permissive).unwrap_err();
    assert!(
        format!("{error:#}").starts_with(&format!("loading {}", path.display())),
        "{error:#}"
    );
}

#[test]
fn truncated_file() {
    let path = temporary_file("truncated.txt");
    fs::write(&path, "55aa550000000000\n0000000000000000\n").unwrap();
    assert!(persistence::load(&path, LoadMode::Permissive).is_err());
    fs::remove_file(&path).unwrap();
}

#[test]
fn unwritable_destination() {
    let path = temporary_file("no/such/directory/game.txt");
    assert!(persistence::save(&Position::starting(), &path).is_err());
}
