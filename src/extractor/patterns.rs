// file: src/extractor/patterns.rs
// description: compiled regex patterns for entity extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Vulnerability identifiers
    pub static ref CVE_ID: Regex = Regex::new(
        r"(?i)\bCVE-\d{4}-\d{4,7}\b"
    ).expect("CVE_ID regex is valid");

    // Network indicators
    pub static ref IP_ADDRESS: Regex = Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b"
    ).expect("IP_ADDRESS regex is valid");

    // TLD-anchored so prose like "e.g" or version strings never match
    pub static ref DOMAIN: Regex = Regex::new(
        r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:com|net|org|io|ru|cn|xyz|top|info|biz|cc|tk|ml|ga|cf|pw|ws|su|onion)\b"
    ).expect("DOMAIN regex is valid");

    pub static ref URL: Regex = Regex::new(
        r#"(?i)https?://[^\s<>"')\]]+"#
    ).expect("URL regex is valid");

    // File hashes, keyed by hex length
    pub static ref MD5_HASH: Regex = Regex::new(
        r"\b[a-fA-F0-9]{32}\b"
    ).expect("MD5_HASH regex is valid");

    pub static ref SHA1_HASH: Regex = Regex::new(
        r"\b[a-fA-F0-9]{40}\b"
    ).expect("SHA1_HASH regex is valid");

    pub static ref SHA256_HASH: Regex = Regex::new(
        r"\b[a-fA-F0-9]{64}\b"
    ).expect("SHA256_HASH regex is valid");
}

/// True when every octet parses into 0..=255. The regex already enforces the
/// range; this guards call sites that receive candidate strings from elsewhere.
pub fn is_valid_ipv4(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| o.parse::<u8>().is_ok())
}

/// Version strings like "1.2.3.4" pass the IPv4 regex; treat a quad where
/// every octet is below 10 as a false positive.
pub fn is_version_like(ip: &str) -> bool {
    ip.split('.')
        .all(|o| o.parse::<u16>().map(|n| n < 10).unwrap_or(false))
}
