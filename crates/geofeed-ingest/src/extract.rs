//! IPv4 address extraction from raw log lines.

use std::sync::LazyLock;

use regex::Regex;

/// Four dot-separated decimal groups. Deliberately loose — candidates like
/// `999.1.1.1` match here and are rejected by the address parse step.
static IP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("valid regex"));

/// Find the first IPv4-shaped substring in `line`, if any.
pub fn find_ipv4(line: &str) -> Option<&str> {
    IP_PATTERN.find(line).map(|m| m.as_str())
}
