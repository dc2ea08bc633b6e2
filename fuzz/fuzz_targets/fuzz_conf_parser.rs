//! Fuzz target for gitolite.conf parsing.
//!
//! Tests that the parser handles arbitrary input without panicking, and that
//! anything it accepts renders to text that parses back to the same document.

#![no_main]

use gitube_gitolite::Conf;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Errors are expected for malformed input
    let Ok(conf) = text.parse::<Conf>() else {
        return;
    };

    let rendered = conf.to_string();
    let reparsed: Conf = rendered
        .parse()
        .expect("rendered configuration must parse");
    assert_eq!(reparsed, conf);
    assert_eq!(reparsed.to_string(), rendered);
});
