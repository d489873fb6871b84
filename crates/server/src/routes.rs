//! Route handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use escape_core::model::{Language, Level};
use serde::{Deserialize, Serialize};
use serde_json::json;
use services::{LevelServiceError, SolutionVerdict};
use tracing::{debug, error};

use crate::AppState;

type SharedState = Arc<AppState>;

const LANGUAGE_NOT_FOUND: &str = "Language not found";
const LEVEL_NOT_FOUND: &str = "Level not found";

/// Body of `GET /languages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
}

/// Body of `POST /validate-solution` as received.
///
/// `level` accepts any JSON number; only non-negative integers name a level.
#[derive(Debug, Clone, Deserialize)]
struct SolutionBody {
    language: String,
    level: serde_json::Number,
    solution: String,
}

impl SolutionBody {
    fn level_index(&self) -> Option<usize> {
        self.level
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
    }
}

/// Error body `{ "error": ... }` with its status.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }

    /// Map a service error, using `not_found` for the unknown track/level case.
    fn from_service(err: LevelServiceError, not_found: &str) -> Self {
        if err.is_not_found() {
            return Self::not_found(not_found);
        }
        error!(error = %err, "level store failure");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ============================================================================
// Level Routes
// ============================================================================

pub(crate) fn level_routes() -> Router<SharedState> {
    Router::new()
        .route("/languages", get(list_languages))
        .route("/levels/:language", get(list_levels))
}

async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::ALL.iter().map(|l| l.id().to_string()).collect(),
    })
}

async fn list_levels(
    State(state): State<SharedState>,
    Path(language): Path<String>,
) -> Result<Json<Vec<Level>>, ApiError> {
    let language: Language = language
        .parse()
        .map_err(|_| ApiError::not_found(LANGUAGE_NOT_FOUND))?;
    let levels = state
        .levels
        .levels(language)
        .await
        .map_err(|err| ApiError::from_service(err, LANGUAGE_NOT_FOUND))?;
    debug!(%language, count = levels.len(), "serving levels");
    Ok(Json(levels))
}

// ============================================================================
// Solution Routes
// ============================================================================

pub(crate) fn solution_routes() -> Router<SharedState> {
    Router::new().route("/validate-solution", post(validate_solution))
}

async fn validate_solution(
    State(state): State<SharedState>,
    Json(req): Json<SolutionBody>,
) -> Result<Json<SolutionVerdict>, ApiError> {
    let language: Language = req
        .language
        .parse()
        .map_err(|_| ApiError::not_found(LEVEL_NOT_FOUND))?;
    let index = req
        .level_index()
        .ok_or_else(|| ApiError::not_found(LEVEL_NOT_FOUND))?;
    let verdict = state
        .solutions
        .submit(language, index, &req.solution)
        .await
        .map_err(|err| ApiError::from_service(err, LEVEL_NOT_FOUND))?;
    Ok(Json(verdict))
}
