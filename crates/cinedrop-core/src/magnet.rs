//! Magnet URI parsing and synthesis.
//!
//! # Design
//! - Info-hashes are normalised to lowercase hex so base32 and hex spellings of the
//!   same torrent deduplicate against each other.
//! - Parsing never touches the network; callers validate before any remote call.

use std::fmt::{self, Display, Formatter};

use data_encoding::BASE32;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PipelineError, PipelineResult};

/// Scheme prefix every magnet URI must start with.
pub const MAGNET_PREFIX: &str = "magnet:?";

const MAGNET_SCHEME: &str = "magnet";
const BTIH_URN: &str = "urn:btih:";
const HEX_HASH_LEN: usize = 40;
const BASE32_HASH_LEN: usize = 32;

/// `BitTorrent` v1 info-hash, stored as 40 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoHash(String);

impl InfoHash {
    /// Parse a hex (40 chars) or base32 (32 chars) info-hash.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] when the value is neither encoding.
    pub fn parse(raw: &str) -> PipelineResult<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == HEX_HASH_LEN && trimmed.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Ok(Self(trimmed.to_ascii_lowercase()));
        }
        if trimmed.len() == BASE32_HASH_LEN
            && let Ok(bytes) = BASE32.decode(trimmed.to_ascii_uppercase().as_bytes())
        {
            return Ok(Self(hex::encode(bytes)));
        }
        Err(PipelineError::invalid("info_hash", "malformed_hash"))
    }

    /// Borrow the normalised hex representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InfoHash {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Extract the info-hash carried by a magnet URI's `xt=urn:btih:` parameter.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] when the URI does not use the magnet scheme,
/// lacks an `xt=urn:btih:` parameter, or carries a malformed hash.
pub fn extract_info_hash(magnet: &str) -> PipelineResult<InfoHash> {
    let url = Url::parse(magnet.trim())
        .map_err(|_| PipelineError::invalid("magnet_uri", "missing_magnet_scheme"))?;
    if url.scheme() != MAGNET_SCHEME {
        return Err(PipelineError::invalid("magnet_uri", "missing_magnet_scheme"));
    }

    for (key, value) in url.query_pairs() {
        if !key.eq_ignore_ascii_case("xt") {
            continue;
        }
        if let Some(hash) = strip_prefix_ignore_case(&value, BTIH_URN) {
            return InfoHash::parse(hash);
        }
    }

    Err(PipelineError::invalid("magnet_uri", "missing_info_hash"))
}

/// Compose a magnet URI for a backend that only reported an info-hash.
///
/// Produces `magnet:?xt=urn:btih:<hash>&dn=<name>&tr=<tracker>...` with the display
/// name and every tracker percent-encoded.
#[must_use]
pub fn build_magnet(hash: &InfoHash, display_name: &str, trackers: &[String]) -> String {
    let mut uri = format!(
        "{MAGNET_PREFIX}xt={BTIH_URN}{hash}&dn={}",
        urlencoding::encode(display_name)
    );
    for tracker in trackers {
        uri.push_str("&tr=");
        uri.push_str(&urlencoding::encode(tracker));
    }
    uri
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const HASH: &str = "ABCDEF0123456789ABCDEF0123456789ABCDEF01";

    #[test]
    fn extracts_hex_hash_case_insensitively() {
        let magnet = format!("magnet:?dn=Inception&xt=urn:btih:{HASH}&tr=udp%3A%2F%2Fx");
        let hash = extract_info_hash(&magnet).expect("hash");
        assert_eq!(hash.as_str(), HASH.to_ascii_lowercase());

        let shouting = format!("MAGNET:?XT=URN:BTIH:{HASH}");
        assert_eq!(extract_info_hash(&shouting).expect("hash"), hash);
    }

    #[test]
    fn base32_hash_normalises_to_hex() {
        // 20 zero bytes encode to 32 'A' characters in base32.
        let magnet = format!("magnet:?xt=urn:btih:{}", "A".repeat(32));
        let hash = extract_info_hash(&magnet).expect("hash");
        assert_eq!(hash.as_str(), "0".repeat(40));
    }

    #[test]
    fn rejects_magnets_without_info_hash() {
        for input in [
            "magnet:?dn=Inception",
            "magnet:?xt=urn:sha1:abc",
            "https://example.com/file.torrent",
            "magnet:?xt=urn:btih:not-a-hash",
            "",
        ] {
            let err = extract_info_hash(input).expect_err(input);
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{input}");
        }
    }

    #[test]
    fn lowercase_base32_hash_is_accepted() {
        let upper = InfoHash::parse(&"B".repeat(32)).expect("upper");
        let lower = InfoHash::parse(&"b".repeat(32)).expect("lower");
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str().len(), 40);
        assert!(InfoHash::parse(&"1".repeat(32)).is_err());
    }

    #[test]
    fn percent_encoded_xt_is_decoded() {
        let magnet = format!("magnet:?xt=urn%3Abtih%3A{HASH}");
        assert!(extract_info_hash(&magnet).is_ok());
    }

    #[test]
    fn build_magnet_encodes_name_and_trackers() {
        let hash = InfoHash::parse(HASH).expect("hash");
        let trackers = vec!["udp://tracker.example:1337/announce".to_string()];
        let uri = build_magnet(&hash, "Inception — 1080p", &trackers);

        assert!(uri.starts_with("magnet:?xt=urn:btih:abcdef0123456789"));
        assert!(uri.contains("&dn=Inception%20%E2%80%94%201080p"));
        assert!(uri.ends_with("&tr=udp%3A%2F%2Ftracker.example%3A1337%2Fannounce"));
        assert_eq!(extract_info_hash(&uri).expect("roundtrip"), hash);
    }
}
