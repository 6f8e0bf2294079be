//! Record normalisation and deduplication.
//!
//! # Design
//! - Pure functions: no I/O, no logging beyond what the caller decides.
//! - The info-hash is the identity of a torrent; quality only breaks ties between
//!   records that share one.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use cinedrop_core::{
    IndexerRecord, InfoHash, PipelineResult, Quality, RecordLocator, TorrentCandidate,
    build_magnet,
};

/// Separator between the source title and the quality label in display titles.
pub const TITLE_SEPARATOR: &str = " — ";

/// Compose the display label shown for a candidate.
#[must_use]
pub fn display_title(source_title: &str, quality_label: Option<&str>) -> String {
    let source_title = source_title.trim();
    match quality_label.map(str::trim).filter(|label| !label.is_empty()) {
        Some(label) => format!("{source_title}{TITLE_SEPARATOR}{label}"),
        None => source_title.to_string(),
    }
}

/// Map one backend record into a candidate.
///
/// The backend's quality label wins; otherwise a resolution tag is read from the title.
/// Records that only carry an info-hash get a synthesised magnet with the configured
/// trackers.
///
/// # Errors
///
/// Returns `InvalidInput` when the record's hash or magnet is unusable.
pub fn candidate_from_record(
    record: IndexerRecord,
    provider_id: &str,
    trackers: &[String],
) -> PipelineResult<TorrentCandidate> {
    let backend_label = record
        .quality
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty());
    let quality = match backend_label.map(Quality::from_label) {
        Some(Quality::Unspecified) | None => Quality::detect(&record.source_title),
        Some(known) => known,
    };
    let label = backend_label.or_else(|| quality.label());
    let title = display_title(&record.source_title, label);

    let magnet_uri = match record.locator {
        RecordLocator::Magnet(uri) => uri,
        RecordLocator::InfoHash(hash) => build_magnet(&InfoHash::parse(&hash)?, &title, trackers),
    };
    TorrentCandidate::new(title, magnet_uri, quality, Some(provider_id.to_string()))
}

/// Collapse candidates sharing an info-hash.
///
/// The higher quality tier wins; ties keep the first seen. Output follows the order in
/// which each info-hash was first seen.
#[must_use]
pub fn dedupe_candidates<I>(candidates: I) -> Vec<TorrentCandidate>
where
    I: IntoIterator<Item = TorrentCandidate>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<TorrentCandidate> = Vec::new();
    for candidate in candidates {
        match slots.entry(candidate.info_hash().as_str().to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(kept.len());
                kept.push(candidate);
            }
            Entry::Occupied(entry) => {
                let slot = &mut kept[*entry.get()];
                if candidate.quality() > slot.quality() {
                    *slot = candidate;
                }
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinedrop_core::PipelineError;

    const HASH_A: &str = "c9f1a3e4b5d6c7e8f9a0b1c2d3e4f5a6b7c8d9e0";
    const HASH_B: &str = "0a1b2c3d4e5f60718293a4b5c6d7e8f901234567";

    fn candidate(title: &str, hash: &str, quality: Quality) -> TorrentCandidate {
        TorrentCandidate::new(
            title,
            format!("magnet:?xt=urn:btih:{hash}"),
            quality,
            Some("test".to_string()),
        )
        .expect("valid magnet")
    }

    fn record(title: &str, quality: Option<&str>, locator: RecordLocator) -> IndexerRecord {
        IndexerRecord {
            source_title: title.to_string(),
            quality: quality.map(str::to_string),
            locator,
        }
    }

    #[test]
    fn display_title_appends_label() {
        assert_eq!(display_title("Inception", Some("1080p")), "Inception — 1080p");
        assert_eq!(display_title(" Inception ", None), "Inception");
        assert_eq!(display_title("Inception", Some(" ")), "Inception");
    }

    #[test]
    fn hash_records_get_synthesised_magnets() -> PipelineResult<()> {
        let trackers = vec!["udp://tracker.example:80/announce".to_string()];
        let mapped = candidate_from_record(
            record("Inception", Some("720p"), RecordLocator::InfoHash(HASH_B.to_uppercase())),
            "yts",
            &trackers,
        )?;
        assert_eq!(mapped.title(), "Inception — 720p");
        assert_eq!(mapped.quality(), Quality::Hd720);
        assert_eq!(mapped.info_hash().as_str(), HASH_B);
        assert_eq!(mapped.source_provider_id(), Some("yts"));
        assert!(mapped.magnet_uri().starts_with(&format!("magnet:?xt=urn:btih:{HASH_B}&dn=")));
        assert!(
            mapped
                .magnet_uri()
                .ends_with("&tr=udp%3A%2F%2Ftracker.example%3A80%2Fannounce")
        );
        Ok(())
    }

    #[test]
    fn backend_magnets_are_kept_verbatim() -> PipelineResult<()> {
        let magnet = format!("magnet:?xt=urn:btih:{HASH_A}&dn=Inception.2010.1080p");
        let mapped = candidate_from_record(
            record("Inception.2010.1080p.BluRay", None, RecordLocator::Magnet(magnet.clone())),
            "real_debrid",
            &[],
        )?;
        assert_eq!(mapped.magnet_uri(), magnet);
        assert_eq!(mapped.quality(), Quality::Hd1080);
        assert_eq!(mapped.title(), "Inception.2010.1080p.BluRay — 1080p");
        Ok(())
    }

    #[test]
    fn unlabelled_titles_stay_bare() -> PipelineResult<()> {
        let mapped = candidate_from_record(
            record("Inception", None, RecordLocator::InfoHash(HASH_A.to_string())),
            "yts",
            &[],
        )?;
        assert_eq!(mapped.title(), "Inception");
        assert_eq!(mapped.quality(), Quality::Unspecified);

        let labelled = candidate_from_record(
            record("Inception", Some("3D"), RecordLocator::InfoHash(HASH_B.to_string())),
            "yts",
            &[],
        )?;
        assert_eq!(labelled.title(), "Inception — 3D");
        assert_eq!(labelled.quality(), Quality::Unspecified);
        Ok(())
    }

    #[test]
    fn unusable_locators_are_rejected() {
        let err = candidate_from_record(
            record("Broken", None, RecordLocator::Magnet("magnet:?dn=x".to_string())),
            "real_debrid",
            &[],
        )
        .expect_err("no hash");
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
        assert!(
            candidate_from_record(
                record("Broken", None, RecordLocator::InfoHash("xyz".to_string())),
                "yts",
                &[],
            )
            .is_err()
        );
    }

    #[test]
    fn higher_quality_wins_and_keeps_first_slot() {
        let deduped = dedupe_candidates(vec![
            candidate("A 720p", HASH_A, Quality::Hd720),
            candidate("B", HASH_B, Quality::Unspecified),
            candidate("A 1080p", HASH_A, Quality::Hd1080),
        ]);
        let titles: Vec<&str> = deduped.iter().map(TorrentCandidate::title).collect();
        assert_eq!(titles, vec!["A 1080p", "B"]);
    }

    #[test]
    fn ties_keep_first_seen() {
        let deduped = dedupe_candidates(vec![
            candidate("first", HASH_A, Quality::Hd1080),
            candidate("second", HASH_A, Quality::Hd1080),
            candidate("lower", HASH_A, Quality::Sd480),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title(), "first");
    }
}
