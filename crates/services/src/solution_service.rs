use escape_core::model::Language;
use escape_core::validation::validate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LevelServiceError;
use crate::level_service::LevelService;

/// Message returned with every accepted solution.
pub const SUCCESS_MESSAGE: &str = "Solution validated successfully!";

/// Message returned for a rejected solution when the level has none of its own.
pub const FALLBACK_REJECTION: &str = "Solution is incorrect. Analyze the code again.";

/// Verdict on one submitted solution, as exchanged over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionVerdict {
    pub correct: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl SolutionVerdict {
    #[must_use]
    pub fn accepted(score: u32) -> Self {
        Self {
            correct: true,
            message: SUCCESS_MESSAGE.to_string(),
            score: Some(score),
        }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            correct: false,
            message: message.into(),
            score: None,
        }
    }
}

/// Server-side checking of submitted solutions.
#[derive(Clone)]
pub struct SolutionService {
    levels: LevelService,
}

impl SolutionService {
    #[must_use]
    pub fn new(levels: LevelService) -> Self {
        Self { levels }
    }

    /// Look up the level and run the validation dispatcher on `solution`.
    ///
    /// An accepted verdict carries the level's full `maxScore`; the hint
    /// penalty is applied by the session, which knows how many hints were used.
    ///
    /// # Errors
    ///
    /// Returns `LevelServiceError` if the track or level index does not resolve.
    pub async fn submit(
        &self,
        language: Language,
        index: usize,
        solution: &str,
    ) -> Result<SolutionVerdict, LevelServiceError> {
        let level = self.levels.level(language, index).await?;
        let correct = validate(language, &level, solution);
        debug!(%language, index, correct, "solution checked");

        if correct {
            return Ok(SolutionVerdict::accepted(level.max_score()));
        }
        let message = level
            .error_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_REJECTION.to_string());
        Ok(SolutionVerdict::rejected(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_core::model::{Criteria, Level};
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    fn sql_levels() -> Vec<Level> {
        vec![
            Level {
                name: "Select all".into(),
                description: String::new(),
                code: "SELEC * FROM users".into(),
                hints: vec!["Spelling".into()],
                max_score: Some(150),
                error_message: Some("Check the keyword spelling.".into()),
                criteria: Criteria {
                    answer: Some("select *".into()),
                    ..Criteria::default()
                },
            },
            Level {
                name: "Filter".into(),
                description: String::new(),
                code: String::new(),
                hints: Vec::new(),
                max_score: None,
                error_message: None,
                criteria: Criteria {
                    required_keywords: Some(vec!["WHERE".into()]),
                    ..Criteria::default()
                },
            },
        ]
    }

    fn service() -> SolutionService {
        let repo = InMemoryRepository::new();
        repo.insert_levels(Language::Sql, sql_levels()).unwrap();
        SolutionService::new(LevelService::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn accepted_solution_carries_max_score() {
        let verdict = service()
            .submit(Language::Sql, 0, "SELECT * FROM users")
            .await
            .unwrap();
        assert_eq!(verdict, SolutionVerdict::accepted(150));
        assert_eq!(verdict.message, SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn rejection_uses_level_message() {
        let verdict = service()
            .submit(Language::Sql, 0, "SELEC * FROM users")
            .await
            .unwrap();
        assert!(!verdict.correct);
        assert_eq!(verdict.message, "Check the keyword spelling.");
        assert_eq!(verdict.score, None);
    }

    #[tokio::test]
    async fn rejection_falls_back_to_generic_message() {
        let verdict = service()
            .submit(Language::Sql, 1, "select * from t")
            .await
            .unwrap();
        assert_eq!(verdict, SolutionVerdict::rejected(FALLBACK_REJECTION));
    }

    #[tokio::test]
    async fn unknown_level_is_not_found() {
        let err = service()
            .submit(Language::Sql, 5, "anything")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = service()
            .submit(Language::Css, 0, "anything")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn rejected_verdict_omits_score_on_wire() {
        let value = serde_json::to_value(SolutionVerdict::rejected("nope")).unwrap();
        assert!(value.get("score").is_none());
        assert_eq!(value["correct"], false);
    }
}
