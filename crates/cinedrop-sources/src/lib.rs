//! Torrent source discovery for a movie title.
//!
//! Layout: `aggregator.rs` (concurrent fan-out and merge), `normalize.rs` (record mapping
//! and deduplication), `realdebrid.rs` and `yts.rs` (HTTP backends), `http.rs` (shared
//! response handling).

pub mod aggregator;
mod http;
pub mod normalize;
pub mod realdebrid;
pub mod yts;

pub use aggregator::{AggregateOutcome, SourceAggregator};
pub use normalize::{TITLE_SEPARATOR, candidate_from_record, dedupe_candidates, display_title};
pub use realdebrid::RealDebridSearch;
pub use yts::YtsIndexer;
