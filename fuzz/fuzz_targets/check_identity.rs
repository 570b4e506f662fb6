#![no_main]

use libfuzzer_sys::fuzz_target;
use tlsident_lib::{check, check_server_identity, split_host, PeerCertificate};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the hostname, second the subjectAltName, third the CN.
    let mut lines = text.splitn(3, '\n');
    let hostname = lines.next().unwrap_or_default();
    let alt_names = lines.next().unwrap_or_default();
    let cn = lines.next().unwrap_or_default();

    let cert = PeerCertificate::new()
        .with_subjectaltname(alt_names)
        .with_common_name(cn);
    let _ = check_server_identity(hostname, &cert);

    // Matching is deterministic and normalization is idempotent.
    let labels = split_host(hostname);
    assert_eq!(check(&labels, cn, true), check(&labels, cn, true));
    if labels.last().is_some_and(|label| !label.is_empty()) {
        assert_eq!(split_host(&labels.join(".")), labels);
    }
});
