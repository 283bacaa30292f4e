#![no_main]

use dpvcal::label::{split_numeric_prefix, ConcentrationLabel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(identifier) = std::str::from_utf8(data) else {
        return;
    };

    let (prefix, rest) = split_numeric_prefix(identifier);
    assert_eq!(prefix.len() + rest.len(), identifier.len());
    assert!(prefix.chars().filter(|c| *c == '.').count() <= 1);

    // Parsing never panics and a magnitude always comes with a unit
    let label = ConcentrationLabel::parse(identifier);
    if label.micromolar.is_some() {
        assert!(label.unit.is_some());
    }
});
