#![no_main]

use bestdori_epub_core::ScenarioAsset;
use bestdori_epub_markdown::{Renderer, SeparatorPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parse errors are fine, panics are not
    let Ok(asset) = ScenarioAsset::from_json(text) else {
        return;
    };

    let dedup = Renderer::new().render(&asset.base);
    let legacy = Renderer::new()
        .with_separator_policy(SeparatorPolicy::Legacy)
        .render(&asset.base);

    // Both policies reject exactly the same scenarios
    assert_eq!(dedup.is_ok(), legacy.is_ok());
});
