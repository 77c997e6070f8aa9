//! Fuzz test for the language tokenizers and matcher
//!
//! Feeds arbitrary text to every built-in language to find panics, slicing
//! errors on multi-byte input and infinite loops in segmentation.
//!
//! Run with: cargo +nightly fuzz run tokenizer_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use polyscript_semantic::default_translator;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let translator = default_translator();
    for code in translator.supported_languages() {
        let Ok(stream) = translator.tokenize(input, &code) else {
            continue;
        };

        // Exactly one trailing Eof.
        let tokens = stream.tokens();
        assert!(tokens.last().map(|t| t.is_eof()).unwrap_or(false));
        assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);

        // Positions never run past the input and never decrease.
        let mut last = 0;
        for token in tokens {
            assert!(token.position <= input.len());
            assert!(token.position >= last, "positions must not decrease");
            last = token.position;
        }

        // Parsing is total: Ok or Err, never a panic.
        let _ = translator.parse(input, &code);
    }
});
