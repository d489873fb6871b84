use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a track id does not name a known language.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown language track: {raw}")]
pub struct UnknownLanguage {
    pub raw: String,
}

//
// ─── LANGUAGE ──────────────────────────────────────────────────────────────────
//

/// One of the fixed language tracks a learner can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    JavaScript,
    Python,
    Sql,
    Networking,
}

impl Language {
    /// Every track, in the order the language screen lists them.
    pub const ALL: [Language; 6] = [
        Language::Html,
        Language::Css,
        Language::JavaScript,
        Language::Python,
        Language::Sql,
        Language::Networking,
    ];

    /// Track id as used in URLs, level file names and the progress blob.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Sql => "sql",
            Language::Networking => "networking",
        }
    }

    /// Upper-cased label shown on map titles and code panels.
    #[must_use]
    pub fn label(self) -> String {
        self.id().to_uppercase()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.id() == s)
            .ok_or_else(|| UnknownLanguage { raw: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_track_id() {
        for lang in Language::ALL {
            assert_eq!(lang.id().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn rejects_unknown_and_mixed_case_ids() {
        assert!("rust".parse::<Language>().is_err());
        assert!("HTML".parse::<Language>().is_err());
    }

    #[test]
    fn serde_uses_track_ids() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let back: Language = serde_json::from_str("\"networking\"").unwrap();
        assert_eq!(back, Language::Networking);
    }

    #[test]
    fn label_is_upper_case() {
        assert_eq!(Language::Sql.label(), "SQL");
    }
}
