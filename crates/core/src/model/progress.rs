use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::language::Language;

/// Fixed key the progress blob is stored under.
pub const PROGRESS_KEY: &str = "escapeRoomProgress";

/// The persisted progress blob could not be decoded.
#[derive(Debug, Error)]
#[error("malformed progress blob: {0}")]
pub struct MalformedProgress(#[from] serde_json::Error);

//
// ─── TRACK PROGRESS ────────────────────────────────────────────────────────────
//

/// Completed levels and cumulative score for one track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackProgress {
    completed: BTreeSet<usize>,
    score: u64,
}

impl TrackProgress {
    #[must_use]
    pub fn completed(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Level 0 is always open; any later level opens once its predecessor is done.
    #[must_use]
    pub fn is_unlocked(&self, index: usize) -> bool {
        index == 0 || self.completed.contains(&(index - 1))
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Progress across all tracks, as persisted between visits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    tracks: BTreeMap<Language, TrackProgress>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Progress for `language`, empty when the track was never played.
    #[must_use]
    pub fn track(&self, language: Language) -> TrackProgress {
        self.tracks.get(&language).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn is_unlocked(&self, language: Language, index: usize) -> bool {
        index == 0
            || self
                .tracks
                .get(&language)
                .is_some_and(|track| track.is_unlocked(index))
    }

    /// Mark a level as solved and add `score` to the track total.
    ///
    /// The completed set never holds duplicates, but the score is added on
    /// every call, so replaying a solved level keeps raising the total.
    pub fn record_completion(&mut self, language: Language, index: usize, score: u32) {
        let track = self.tracks.entry(language).or_default();
        track.completed.insert(index);
        track.score = track.score.saturating_add(u64::from(score));
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    //
    // ─── BLOB CODEC ────────────────────────────────────────────────────────────
    //

    /// Decode a persisted blob.
    ///
    /// Unknown track ids are dropped; missing sections default to empty.
    ///
    /// # Errors
    ///
    /// Returns `MalformedProgress` if the blob is not valid JSON of the
    /// expected shape.
    pub fn decode(raw: &str) -> Result<Self, MalformedProgress> {
        let blob: ProgressBlob = serde_json::from_str(raw)?;
        let mut tracks: BTreeMap<Language, TrackProgress> = BTreeMap::new();

        for (id, indices) in blob.completed_levels {
            if let Ok(language) = id.parse::<Language>() {
                tracks
                    .entry(language)
                    .or_default()
                    .completed
                    .extend(indices);
            }
        }
        for (id, score) in blob.level_scores {
            if let Ok(language) = id.parse::<Language>() {
                tracks.entry(language).or_default().score = score;
            }
        }

        Ok(Self { tracks })
    }

    /// Decode a blob that may be absent; absent and malformed both give empty progress.
    #[must_use]
    pub fn decode_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::decode(raw).ok())
            .unwrap_or_default()
    }

    /// Encode into the persisted blob shape.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let mut blob = ProgressBlob::default();
        for (language, track) in &self.tracks {
            blob.completed_levels.insert(
                language.id().to_owned(),
                track.completed.iter().copied().collect(),
            );
            blob.level_scores
                .insert(language.id().to_owned(), track.score);
        }
        serde_json::to_string(&blob)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressBlob {
    #[serde(default)]
    completed_levels: BTreeMap<String, Vec<usize>>,
    #[serde(default)]
    level_scores: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_level_is_always_unlocked() {
        let progress = Progress::new();
        assert!(progress.is_unlocked(Language::Css, 0));
        assert!(!progress.is_unlocked(Language::Css, 1));
    }

    #[test]
    fn level_unlocks_when_predecessor_completed() {
        let mut progress = Progress::new();
        progress.record_completion(Language::Css, 0, 100);
        assert!(progress.is_unlocked(Language::Css, 1));
        assert!(!progress.is_unlocked(Language::Css, 2));
        assert!(!progress.is_unlocked(Language::Html, 1));
    }

    #[test]
    fn locking_ignores_later_completions() {
        let mut progress = Progress::new();
        progress.record_completion(Language::Sql, 2, 50);
        assert!(progress.is_unlocked(Language::Sql, 3));
        assert!(!progress.is_unlocked(Language::Sql, 2));
    }

    #[test]
    fn replay_does_not_duplicate_index_but_adds_score() {
        let mut progress = Progress::new();
        progress.record_completion(Language::Python, 0, 80);
        progress.record_completion(Language::Python, 0, 60);
        let track = progress.track(Language::Python);
        assert_eq!(track.completed_count(), 1);
        assert_eq!(track.score(), 140);
    }

    #[test]
    fn blob_round_trip_keeps_tracks() {
        let mut progress = Progress::new();
        progress.record_completion(Language::Html, 0, 100);
        progress.record_completion(Language::Html, 1, 60);
        progress.record_completion(Language::Networking, 0, 10);

        let decoded = Progress::decode(&progress.encode().unwrap()).unwrap();
        assert_eq!(decoded, progress);
    }

    #[test]
    fn encodes_browser_blob_shape() {
        let mut progress = Progress::new();
        progress.record_completion(Language::Sql, 0, 100);
        let value: serde_json::Value = serde_json::from_str(&progress.encode().unwrap()).unwrap();
        assert_eq!(value["completedLevels"]["sql"], serde_json::json!([0]));
        assert_eq!(value["levelScores"]["sql"], 100);
    }

    #[test]
    fn decodes_partial_blob_and_drops_unknown_tracks() {
        let raw = r#"{"completedLevels": {"css": [0, 1, 1], "cobol": [0]}}"#;
        let progress = Progress::decode(raw).unwrap();
        assert_eq!(progress.track(Language::Css).completed_count(), 2);
        assert_eq!(progress.track(Language::Css).score(), 0);
        assert!(progress.track(Language::Html).completed().is_empty());
    }

    #[test]
    fn malformed_blob_is_same_as_absent() {
        assert!(Progress::decode("{not json").is_err());
        assert_eq!(
            Progress::decode_or_default(Some("{not json")),
            Progress::decode_or_default(None)
        );
        assert_eq!(
            Progress::decode_or_default(Some(r#"{"levelScores": {"css": "lots"}}"#)),
            Progress::new()
        );
    }
}
