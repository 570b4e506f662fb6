//! Hostname normalization: root-dot stripping, ASCII lower-casing, label split.

/// Remove a single trailing `.` (the root zone) from `host`.
pub fn unfqdn(host: &str) -> &str {
    host.strip_suffix('.').unwrap_or(host)
}

/// A hostname or name pattern reduced to its comparable DNS labels.
///
/// Only ASCII `A`-`Z` are lower-cased; everything else is kept byte for byte,
/// so the result does not depend on locale or Unicode case tables. Labels may
/// be empty (e.g. `"a..b"`), which the matcher rejects for patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHost {
    labels: Vec<String>,
}

impl NormalizedHost {
    pub fn new(host: &str) -> Self {
        let lowered: String = unfqdn(host)
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let labels = lowered.split('.').map(str::to_owned).collect();
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }

    /// Labels joined back with `.`.
    pub fn to_dotted(&self) -> String {
        self.labels.join(".")
    }
}

/// Normalize `host` and split it into labels.
pub fn split_host(host: &str) -> Vec<String> {
    NormalizedHost::new(host).into_labels()
}
