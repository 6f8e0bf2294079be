//! Quality labels and the fixed precedence table used for deduplication.

use std::fmt::{self, Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RESOLUTION_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\b(2160|1080|720|480)p\b|\b(4k|uhd)\b").ok());

/// Video quality tier recognised by the aggregator.
///
/// Variant order is the precedence order: later variants win ties between
/// candidates that share an info-hash.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// No recognisable resolution tag.
    #[default]
    Unspecified,
    /// 480p.
    Sd480,
    /// 720p.
    Hd720,
    /// 1080p.
    Hd1080,
    /// 2160p / 4K.
    Uhd2160,
}

impl Quality {
    /// Interpret a backend-supplied quality label such as `1080p` or `4K`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "2160p" | "4k" | "uhd" => Self::Uhd2160,
            "1080p" => Self::Hd1080,
            "720p" => Self::Hd720,
            "480p" => Self::Sd480,
            _ => Self::Unspecified,
        }
    }

    /// Find the first resolution tag inside a free-form release title.
    #[must_use]
    pub fn detect(title: &str) -> Self {
        RESOLUTION_PATTERN
            .as_ref()
            .and_then(|pattern| pattern.find(title))
            .map_or(Self::Unspecified, |found| Self::from_label(found.as_str()))
    }

    /// Canonical label, or `None` for [`Quality::Unspecified`].
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::Sd480 => Some("480p"),
            Self::Hd720 => Some("720p"),
            Self::Hd1080 => Some("1080p"),
            Self::Uhd2160 => Some("2160p"),
        }
    }
}

impl Display for Quality {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label().unwrap_or("unspecified"))
    }
}
