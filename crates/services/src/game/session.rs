use std::collections::BTreeMap;

use escape_core::Clock;
use escape_core::model::{Language, Level, Progress};

use crate::error::GameError;
use super::log::{LogKind, TerminalLog};
use super::screen::{Action, Screen};

/// Shown when the learner asks for more hints than the level has.
pub const NO_MORE_HINTS: &str = "No more hints available for this level.";

/// State of the hint drawer on the puzzle screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintPanel {
    pub open: bool,
    pub text: Option<String>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One visit of the learner: current screen, track, level and hint usage.
///
/// Transitions that need no I/O live here; the ones that load levels, submit
/// solutions or touch persisted progress go through
/// [`GameLoop`](super::GameLoop). Progress is only ever replaced by the loop;
/// the session reads it to decide locks and render scores.
#[derive(Debug, Clone)]
pub struct Session {
    clock: Clock,
    screen: Screen,
    progress: Progress,
    language: Option<Language>,
    levels: Vec<Level>,
    current_level: usize,
    hints_used: u32,
    hint_panel: HintPanel,
    last_score: Option<u32>,
    track_hints: BTreeMap<Language, u32>,
    log: TerminalLog,
}

impl Session {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            screen: Screen::Start,
            progress: Progress::new(),
            language: None,
            levels: Vec::new(),
            current_level: 0,
            hints_used: 0,
            hint_panel: HintPanel::default(),
            last_score: None,
            track_hints: BTreeMap::new(),
            log: TerminalLog::default(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn current_level_index(&self) -> usize {
        self.current_level
    }

    #[must_use]
    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.current_level)
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    #[must_use]
    pub fn hint_panel(&self) -> &HintPanel {
        &self.hint_panel
    }

    /// Score awarded for the most recently solved level.
    #[must_use]
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// Hints opened on `language` during this visit, across all its levels.
    #[must_use]
    pub fn hints_for_track(&self, language: Language) -> u32 {
        self.track_hints.get(&language).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn log(&self) -> &TerminalLog {
        &self.log
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub(crate) fn ensure(&self, action: Action) -> Result<(), GameError> {
        if self.screen.allows(action) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                from: self.screen,
                action,
            })
        }
    }

    pub(crate) fn push_log(&mut self, kind: LogKind, message: impl Into<String>) {
        let at = self.clock.now();
        self.log.push(at, kind, message);
    }

    //
    // ─── TRANSITIONS DRIVEN BY THE LOOP ────────────────────────────────────────
    //

    pub(crate) fn enter_language_select(&mut self, progress: Progress) {
        self.progress = progress;
        self.screen = Screen::LanguageSelect;
    }

    pub(crate) fn enter_map(&mut self, language: Language, levels: Vec<Level>) {
        self.language = Some(language);
        self.levels = levels;
        self.screen = Screen::Map;
    }

    pub(crate) fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    pub(crate) fn enter_success(&mut self, score: u32) {
        self.last_score = Some(score);
        self.screen = Screen::SuccessModal;
    }

    pub(crate) fn reset(&mut self) {
        *self = Session::new(self.clock);
    }

    //
    // ─── LOCAL TRANSITIONS ─────────────────────────────────────────────────────
    //

    /// Open an unlocked level from the map.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the map screen,
    /// `GameError::NoSuchLevel` for an index past the end of the track, and
    /// `GameError::LevelLocked` if the previous level is not solved yet.
    pub fn open_level(&mut self, index: usize) -> Result<(), GameError> {
        self.ensure(Action::OpenLevel)?;
        if index >= self.levels.len() {
            return Err(GameError::NoSuchLevel(index));
        }
        let unlocked = self
            .language
            .is_some_and(|lang| self.progress.is_unlocked(lang, index));
        if !unlocked {
            return Err(GameError::LevelLocked(index));
        }
        self.load_level(index);
        Ok(())
    }

    fn load_level(&mut self, index: usize) {
        self.current_level = index;
        self.hints_used = 0;
        self.hint_panel = HintPanel::default();
        self.log.clear();
        self.push_log(LogKind::Info, "System initialized. Analyze the code carefully.");
        self.push_log(LogKind::Info, "Type your solution and execute when ready.");
        self.screen = Screen::Puzzle;
    }

    /// Open or close the hint drawer.
    ///
    /// Opening reveals the next hint and costs a hint; closing is free.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the puzzle screen.
    pub fn toggle_hint(&mut self) -> Result<&HintPanel, GameError> {
        self.ensure(Action::ToggleHint)?;
        if self.hint_panel.open {
            self.hint_panel.open = false;
            return Ok(&self.hint_panel);
        }

        let level = self.levels.get(self.current_level);
        let text = match self.hints_used {
            0 => level.and_then(|l| l.hint(0)),
            1 => level.and_then(|l| l.hint(1)),
            _ => None,
        }
        .unwrap_or(NO_MORE_HINTS)
        .to_string();

        self.hint_panel = HintPanel {
            open: true,
            text: Some(text),
        };
        self.hints_used = self.hints_used.saturating_add(1);
        if let Some(lang) = self.language {
            let total = self.track_hints.entry(lang).or_insert(0);
            *total = total.saturating_add(1);
        }
        self.push_log(LogKind::Info, "Hint accessed. Score penalty applied.");
        Ok(&self.hint_panel)
    }

    /// Leave the success modal for the next level, or the escape screen
    /// after the last one.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` unless the success modal is showing.
    pub fn next_level(&mut self) -> Result<Screen, GameError> {
        self.ensure(Action::NextLevel)?;
        let next = self.current_level + 1;
        if next < self.levels.len() {
            self.load_level(next);
        } else {
            self.screen = Screen::Escape;
        }
        Ok(self.screen)
    }

    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` unless the success modal is showing.
    pub fn back_to_map(&mut self) -> Result<(), GameError> {
        self.ensure(Action::BackToMap)?;
        self.screen = Screen::Map;
        Ok(())
    }

    /// Abandon the current level without any penalty.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the puzzle screen.
    pub fn exit_level(&mut self) -> Result<(), GameError> {
        self.ensure(Action::ExitLevel)?;
        self.screen = Screen::Map;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the map screen.
    pub fn back_to_languages(&mut self) -> Result<(), GameError> {
        self.ensure(Action::BackToLanguages)?;
        self.screen = Screen::LanguageSelect;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the escape screen.
    pub fn try_another(&mut self) -> Result<(), GameError> {
        self.ensure(Action::TryAnother)?;
        self.screen = Screen::LanguageSelect;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_core::model::Criteria;
    use escape_core::time::fixed_clock;

    fn build_level(name: &str, hints: &[&str]) -> Level {
        Level {
            name: name.to_string(),
            description: String::new(),
            code: String::new(),
            hints: hints.iter().map(|h| (*h).to_string()).collect(),
            max_score: None,
            error_message: None,
            criteria: Criteria::default(),
        }
    }

    fn session_on_map(levels: Vec<Level>) -> Session {
        let mut session = Session::new(fixed_clock());
        session.enter_language_select(Progress::new());
        session.enter_map(Language::Css, levels);
        session
    }

    #[test]
    fn new_session_starts_on_start_screen() {
        let session = Session::new(fixed_clock());
        assert_eq!(session.screen(), Screen::Start);
        assert!(session.language().is_none());
    }

    #[test]
    fn open_level_resets_hints_and_log() {
        let mut session = session_on_map(vec![build_level("a", &["h1"])]);
        session.open_level(0).unwrap();
        session.toggle_hint().unwrap();
        session.exit_level().unwrap();

        session.open_level(0).unwrap();
        assert_eq!(session.screen(), Screen::Puzzle);
        assert_eq!(session.hints_used(), 0);
        assert!(!session.hint_panel().open);
        assert_eq!(session.log().entries().len(), 2);
    }

    #[test]
    fn locked_level_cannot_be_opened() {
        let mut session = session_on_map(vec![build_level("a", &[]), build_level("b", &[])]);
        let err = session.open_level(1).unwrap_err();
        assert!(matches!(err, GameError::LevelLocked(1)));
        assert_eq!(session.screen(), Screen::Map);
    }

    #[test]
    fn out_of_range_level_cannot_be_opened() {
        let mut session = session_on_map(vec![build_level("a", &[])]);
        assert!(matches!(
            session.open_level(3),
            Err(GameError::NoSuchLevel(3))
        ));
    }

    #[test]
    fn hints_reveal_in_order_then_run_out() {
        let mut session = session_on_map(vec![build_level("a", &["first", "second"])]);
        session.open_level(0).unwrap();

        let texts: Vec<String> = (0..3)
            .map(|_| {
                let text = session.toggle_hint().unwrap().text.clone().unwrap();
                session.toggle_hint().unwrap();
                text
            })
            .collect();
        assert_eq!(texts, ["first", "second", NO_MORE_HINTS]);
        assert_eq!(session.hints_used(), 3);
        assert_eq!(session.hints_for_track(Language::Css), 3);
    }

    #[test]
    fn single_hint_level_runs_out_on_second_reveal() {
        let mut session = session_on_map(vec![build_level("a", &["only"])]);
        session.open_level(0).unwrap();
        session.toggle_hint().unwrap();
        session.toggle_hint().unwrap();
        let panel = session.toggle_hint().unwrap();
        assert_eq!(panel.text.as_deref(), Some(NO_MORE_HINTS));
    }

    #[test]
    fn closing_hint_panel_is_free() {
        let mut session = session_on_map(vec![build_level("a", &["h"])]);
        session.open_level(0).unwrap();
        assert!(session.toggle_hint().unwrap().open);
        assert!(!session.toggle_hint().unwrap().open);
        assert_eq!(session.hints_used(), 1);
        assert_eq!(session.log().entries().len(), 3);
    }

    #[test]
    fn next_level_moves_on_or_escapes() {
        let mut session = session_on_map(vec![build_level("a", &[]), build_level("b", &[])]);
        session.open_level(0).unwrap();
        session.enter_success(100);
        assert_eq!(session.next_level().unwrap(), Screen::Puzzle);
        assert_eq!(session.current_level_index(), 1);

        session.enter_success(100);
        assert_eq!(session.next_level().unwrap(), Screen::Escape);
        session.try_another().unwrap();
        assert_eq!(session.screen(), Screen::LanguageSelect);
    }

    #[test]
    fn invalid_transition_leaves_state_untouched() {
        let mut session = session_on_map(vec![build_level("a", &[])]);
        let err = session.next_level().unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTransition {
                from: Screen::Map,
                action: Action::NextLevel
            }
        ));
        assert_eq!(session.screen(), Screen::Map);
        assert!(session.toggle_hint().is_err());
    }

    #[test]
    fn map_and_language_back_edges() {
        let mut session = session_on_map(vec![build_level("a", &[])]);
        session.open_level(0).unwrap();
        session.enter_success(90);
        session.back_to_map().unwrap();
        assert_eq!(session.screen(), Screen::Map);
        session.back_to_languages().unwrap();
        assert_eq!(session.screen(), Screen::LanguageSelect);
        assert_eq!(session.language(), Some(Language::Css));
    }
}
