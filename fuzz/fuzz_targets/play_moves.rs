#![no_main]
use bitcheckers::checkers::core::Move;
use bitcheckers::checkers::position::Position;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut position = Position::starting();
        for line in s.lines() {
            if let Ok(next_move) = Move::try_from(line) {
                let _ = position.make_move(next_move);
                // Move making never breaks the board invariants.
                assert!(position.validate().is_ok(), "{position:?}");
            }
        }
    }
});
