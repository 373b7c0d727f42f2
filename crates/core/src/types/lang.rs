//! Interface language.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The storefront's interface languages.
///
/// French is the fallback for unknown or missing tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// French.
    #[default]
    Fr,
    /// Arabic.
    Ar,
}

impl Lang {
    /// Parse a language tag, falling back to French.
    ///
    /// Accepts bare tags (`fr`, `ar`) and region-qualified tags (`ar-DZ`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ar" => Self::Ar,
            _ => Self::Fr,
        }
    }

    /// The bare language tag.
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
