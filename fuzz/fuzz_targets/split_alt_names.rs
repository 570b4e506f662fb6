#![no_main]

use libfuzzer_sys::fuzz_target;
use tlsident_lib::split_alt_names;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    // The splitter must never panic; malformed quoting is an error, not a crash.
    let result = split_alt_names(raw);

    // Without quotes the entry count is fixed by the number of separators.
    if !raw.contains('"') {
        let entries = result.expect("unquoted input never fails");
        assert_eq!(entries.len(), raw.matches(", ").count() + 1);
        assert_eq!(entries.join(", "), raw);
    }
});
