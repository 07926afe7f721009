#![no_main]

use bestdori_epub_markdown::{escape_markdown, sanitize_file_name};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let escaped = escape_markdown(input);
    assert!(escaped.len() >= input.len());

    let name = sanitize_file_name(input);
    assert!(!name.contains(['<', '>', ':', '"', '/', '\\', '|', '?', '*']));
});
