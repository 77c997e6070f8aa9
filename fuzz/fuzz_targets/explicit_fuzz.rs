//! Fuzz test for the explicit notation parser
//!
//! Arbitrary input must produce a node or diagnostics, and every parsed node
//! must survive a serialize/parse round trip.
//!
//! Run with: cargo +nightly fuzz run explicit_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use polyscript_core::{parse_explicit, to_explicit, validate_explicit};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    match parse_explicit(input) {
        Ok(node) => {
            let printed = to_explicit(&node);
            let reparsed = parse_explicit(&printed).expect("printed notation must parse");
            assert_eq!(reparsed, node, "round trip changed the node: {}", printed);
        }
        Err(e) => {
            assert!(!e.diagnostics.is_empty(), "errors must carry diagnostics");
            assert!(!validate_explicit(input).is_empty());
        }
    }
});
