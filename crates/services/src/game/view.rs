//! Read-only snapshots of the session for rendering, one per screen.

use super::log::LogEntry;
use super::session::{HintPanel, Session};

/// One tile on the level map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCard {
    pub number: usize,
    pub name: String,
    pub completed: bool,
    pub locked: bool,
    /// The level's full score, only shown once it is completed.
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapView {
    pub title: String,
    pub completed: usize,
    pub score: u64,
    pub cards: Vec<LevelCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleView<'a> {
    pub heading: String,
    pub title: &'a str,
    pub description: &'a str,
    pub language_label: String,
    pub code: &'a str,
    pub hint_panel: &'a HintPanel,
    pub log: &'a [LogEntry],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessView {
    pub score: u32,
    pub hints_used: u32,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeView {
    pub language_label: String,
    pub total_score: u64,
    pub levels_completed: usize,
    pub hints_used: u32,
}

impl Session {
    /// Map of the current track; `None` before a track is chosen.
    #[must_use]
    pub fn map_view(&self) -> Option<MapView> {
        let language = self.language()?;
        let track = self.progress().track(language);
        let cards = self
            .levels()
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let completed = track.is_completed(index);
                LevelCard {
                    number: index + 1,
                    name: level.name.clone(),
                    completed,
                    locked: !track.is_unlocked(index),
                    score: completed.then(|| level.max_score()),
                }
            })
            .collect();

        Some(MapView {
            title: format!("{} ESCAPE MAP", language.label()),
            completed: track.completed_count(),
            score: track.score(),
            cards,
        })
    }

    #[must_use]
    pub fn puzzle_view(&self) -> Option<PuzzleView<'_>> {
        let language = self.language()?;
        let level = self.current_level()?;
        Some(PuzzleView {
            heading: format!("Level {}", self.current_level_index() + 1),
            title: &level.name,
            description: &level.description,
            language_label: language.label(),
            code: &level.code,
            hint_panel: self.hint_panel(),
            log: self.log().entries(),
        })
    }

    #[must_use]
    pub fn success_view(&self) -> Option<SuccessView> {
        self.last_score().map(|score| SuccessView {
            score,
            hints_used: self.hints_used(),
            status: "DEBUGGED",
        })
    }

    #[must_use]
    pub fn escape_view(&self) -> Option<EscapeView> {
        let language = self.language()?;
        let track = self.progress().track(language);
        Some(EscapeView {
            language_label: language.label(),
            total_score: track.score(),
            levels_completed: track.completed_count(),
            hints_used: self.hints_for_track(language),
        })
    }
}
