use std::sync::Arc;

use escape_core::model::{Language, final_score};
use tracing::{info, warn};

use crate::error::GameError;
use crate::progress_service::ProgressService;
use crate::transport::Transport;

use super::log::LogKind;
use super::screen::Action;
use super::session::Session;

/// What happened to a submitted solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; the session moved to the success modal.
    Solved { score: u32 },
    /// Checked and rejected with the server's message.
    Rejected { message: String },
    /// Nothing but whitespace was submitted; the server was not asked.
    Empty,
    /// The server could not be reached or did not answer sensibly.
    ConnectionFailed,
}

/// Drives the transitions of a [`Session`] that need the transport or the
/// progress store.
#[derive(Clone)]
pub struct GameLoop {
    transport: Arc<dyn Transport>,
    progress: Arc<ProgressService>,
}

impl GameLoop {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, progress: Arc<ProgressService>) -> Self {
        Self {
            transport,
            progress,
        }
    }

    /// Leave the start screen, loading persisted progress.
    ///
    /// A progress backend that cannot be read is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the start screen.
    pub async fn begin(&self, session: &mut Session) -> Result<(), GameError> {
        session.ensure(Action::Begin)?;
        let progress = match self.progress.load().await {
            Ok(progress) => progress,
            Err(err) => {
                warn!(error = %err, "progress could not be loaded; starting empty");
                Default::default()
            }
        };
        session.enter_language_select(progress);
        Ok(())
    }

    /// Pick a track and fetch its levels.
    ///
    /// On failure an error line is logged and the session stays on the
    /// language screen.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the language screen and
    /// `GameError::LevelsUnavailable` if the levels cannot be fetched.
    pub async fn select_language(
        &self,
        session: &mut Session,
        language: Language,
    ) -> Result<(), GameError> {
        session.ensure(Action::SelectLanguage)?;
        match self.transport.fetch_levels(language).await {
            Ok(levels) => {
                info!(%language, levels = levels.len(), "track loaded");
                session.enter_map(language, levels);
                Ok(())
            }
            Err(err) => {
                warn!(%language, error = %err, "failed to load levels");
                session.push_log(
                    LogKind::Error,
                    format!("ERROR: Could not load {language} levels. Is the server running?"),
                );
                Err(GameError::LevelsUnavailable(err))
            }
        }
    }

    /// Send a solution for the open level.
    ///
    /// Only an accepted solution changes the screen: the hint-adjusted score
    /// is recorded, progress is saved and the success modal opens. Every
    /// other outcome leaves the session on the puzzle with a log line.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidTransition` off the puzzle screen.
    pub async fn submit(
        &self,
        session: &mut Session,
        solution: &str,
    ) -> Result<SubmitOutcome, GameError> {
        session.ensure(Action::Submit)?;
        let solution = solution.trim();
        if solution.is_empty() {
            session.push_log(LogKind::Error, "ERROR: Solution cannot be empty");
            return Ok(SubmitOutcome::Empty);
        }
        let (Some(language), Some(level)) = (session.language(), session.current_level()) else {
            return Err(GameError::NoSuchLevel(session.current_level_index()));
        };
        let max_score = level.max_score();
        let index = session.current_level_index();

        session.push_log(LogKind::Info, "Executing fix...");
        let verdict = match self
            .transport
            .submit_solution(language, index, solution)
            .await
        {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(%language, index, error = %err, "solution submission failed");
                session.push_log(LogKind::Error, "ERROR: Connection failed");
                return Ok(SubmitOutcome::ConnectionFailed);
            }
        };

        if !verdict.correct {
            session.push_log(LogKind::Error, format!("ERROR: {}", verdict.message));
            return Ok(SubmitOutcome::Rejected {
                message: verdict.message,
            });
        }

        session.push_log(LogKind::Success, "SUCCESS: Fix validated!");
        session.push_log(LogKind::Info, "Level complete. Calculating score...");

        let score = final_score(max_score, session.hints_used());
        if let Err(err) = self
            .progress
            .record_completion(session.progress_mut(), language, index, score)
            .await
        {
            warn!(%language, index, error = %err, "progress could not be saved");
            session.push_log(LogKind::Error, "ERROR: Progress could not be saved");
        }
        info!(%language, index, score, "level solved");
        session.enter_success(score);
        Ok(SubmitOutcome::Solved { score })
    }

    /// Wipe all persisted progress and return the session to the start screen.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Progress` if the progress store cannot be cleared;
    /// the session is left as it was.
    pub async fn restart(&self, session: &mut Session) -> Result<(), GameError> {
        session.ensure(Action::Restart)?;
        self.progress.clear().await?;
        session.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::game::Screen;
    use crate::level_service::LevelService;
    use crate::solution_service::{SolutionService, SolutionVerdict};
    use crate::transport::LocalTransport;
    use async_trait::async_trait;
    use escape_core::model::{Criteria, Level, Progress};
    use escape_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn build_level(name: &str, answer: &str) -> Level {
        Level {
            name: name.to_string(),
            description: String::new(),
            code: String::new(),
            hints: vec!["look at the tag".into()],
            max_score: Some(100),
            error_message: None,
            criteria: Criteria {
                answer: Some(answer.to_string()),
                ..Criteria::default()
            },
        }
    }

    fn fixture() -> (GameLoop, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        repo.insert_levels(
            Language::Html,
            vec![build_level("one", "<p>"), build_level("two", "<div>")],
        )
        .unwrap();
        let levels = LevelService::new(Arc::new(repo.clone()));
        let transport = LocalTransport::new(levels.clone(), SolutionService::new(levels));
        let progress = ProgressService::new(Arc::new(repo.clone()));
        (GameLoop::new(Arc::new(transport), Arc::new(progress)), repo)
    }

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn fetch_levels(&self, _: Language) -> Result<Vec<Level>, TransportError> {
            Err(TransportError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        }

        async fn submit_solution(
            &self,
            _: Language,
            _: usize,
            _: &str,
        ) -> Result<SolutionVerdict, TransportError> {
            Err(TransportError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        }
    }

    async fn on_puzzle(game: &GameLoop) -> Session {
        let mut session = Session::new(fixed_clock());
        game.begin(&mut session).await.unwrap();
        game.select_language(&mut session, Language::Html)
            .await
            .unwrap();
        session.open_level(0).unwrap();
        session
    }

    #[tokio::test]
    async fn solving_with_a_hint_scores_and_persists() {
        let (game, repo) = fixture();
        let mut session = on_puzzle(&game).await;
        session.toggle_hint().unwrap();

        let outcome = game.submit(&mut session, "  <p>  ").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Solved { score: 80 });
        assert_eq!(session.screen(), Screen::SuccessModal);
        assert_eq!(session.last_score(), Some(80));

        let stored = Progress::decode(&repo.progress_blob().unwrap().unwrap()).unwrap();
        assert!(stored.track(Language::Html).is_completed(0));
        assert_eq!(stored.track(Language::Html).score(), 80);
        assert!(session.progress().is_unlocked(Language::Html, 1));
    }

    #[tokio::test]
    async fn empty_solution_never_reaches_the_transport() {
        let game = GameLoop::new(
            Arc::new(Offline),
            Arc::new(ProgressService::new(Arc::new(InMemoryRepository::new()))),
        );
        let (real, _) = fixture();
        let mut session = on_puzzle(&real).await;

        let outcome = game.submit(&mut session, "   \n").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Empty);
        let last = session.log().last().unwrap();
        assert_eq!(last.message, "ERROR: Solution cannot be empty");
        assert_eq!(session.screen(), Screen::Puzzle);
    }

    #[tokio::test]
    async fn wrong_solution_logs_the_rejection() {
        let (game, repo) = fixture();
        let mut session = on_puzzle(&game).await;

        let outcome = game.submit(&mut session, "<div>").await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
        assert_eq!(session.screen(), Screen::Puzzle);
        assert_eq!(
            session.log().last().unwrap().message,
            "ERROR: Solution is incorrect. Analyze the code again."
        );
        assert!(repo.progress_blob().unwrap().is_none());
    }

    #[tokio::test]
    async fn transport_failure_stays_on_puzzle() {
        let (real, _) = fixture();
        let mut session = on_puzzle(&real).await;
        let game = GameLoop::new(
            Arc::new(Offline),
            Arc::new(ProgressService::new(Arc::new(InMemoryRepository::new()))),
        );

        let outcome = game.submit(&mut session, "<p>").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::ConnectionFailed);
        assert_eq!(session.log().last().unwrap().message, "ERROR: Connection failed");
        assert_eq!(session.screen(), Screen::Puzzle);
    }

    #[tokio::test]
    async fn unavailable_track_keeps_language_screen() {
        let game = GameLoop::new(
            Arc::new(Offline),
            Arc::new(ProgressService::new(Arc::new(InMemoryRepository::new()))),
        );
        let mut session = Session::new(fixed_clock());
        game.begin(&mut session).await.unwrap();

        let err = game
            .select_language(&mut session, Language::Sql)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::LevelsUnavailable(_)));
        assert_eq!(session.screen(), Screen::LanguageSelect);
        assert_eq!(
            session.log().last().unwrap().message,
            "ERROR: Could not load sql levels. Is the server running?"
        );
    }

    #[tokio::test]
    async fn submit_is_rejected_off_the_puzzle_screen() {
        let (game, _) = fixture();
        let mut session = Session::new(fixed_clock());
        let err = game.submit(&mut session, "<p>").await.unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTransition {
                from: Screen::Start,
                action: Action::Submit
            }
        ));
    }

    #[tokio::test]
    async fn restart_clears_progress_everywhere() {
        let (game, repo) = fixture();
        let mut session = on_puzzle(&game).await;
        game.submit(&mut session, "<p>").await.unwrap();

        game.restart(&mut session).await.unwrap();
        assert_eq!(session.screen(), Screen::Start);
        assert!(session.progress().is_empty());
        assert!(repo.progress_blob().unwrap().is_none());

        game.begin(&mut session).await.unwrap();
        assert!(session.progress().is_empty());
    }
}
