#![no_main]
use bitcheckers::checkers::persistence::{self, LoadMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(position) = persistence::parse(s, LoadMode::Permissive) {
            // Whatever is accepted is saved back losslessly.
            let saved = persistence::serialize(&position);
            assert_eq!(
                persistence::parse(&saved, LoadMode::Permissive).ok(),
                Some(position)
            );
            let _ = position.to_string();
        }
    }
});
