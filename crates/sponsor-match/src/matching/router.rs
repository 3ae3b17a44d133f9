use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::domain::{CandidateProfile, MatchCriteria, MatchId, MatchView, UserId};
use super::repository::{MatchRepository, RepositoryError};
use super::service::{MatchLifecycleService, MatchServiceError};

/// Router builder exposing HTTP endpoints for the match lifecycle.
pub fn match_router<R>(service: Arc<MatchLifecycleService<R>>) -> Router
where
    R: MatchRepository + 'static,
{
    Router::new()
        .route("/api/v1/matches/suggestions", post(suggest_handler::<R>))
        .route(
            "/api/v1/matches/suggested/:user_id",
            get(list_suggested_handler::<R>),
        )
        .route(
            "/api/v1/matches/:match_id/request",
            post(request_handler::<R>),
        )
        .route(
            "/api/v1/matches/:match_id/decline",
            post(decline_handler::<R>),
        )
        .route(
            "/api/v1/matches/:match_id/accept",
            post(accept_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestRequest {
    pub(crate) user_id: UserId,
    pub(crate) criteria: MatchCriteria,
    pub(crate) candidate: CandidateProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    pub(crate) user_id: UserId,
}

pub(crate) async fn suggest_handler<R>(
    State(service): State<Arc<MatchLifecycleService<R>>>,
    axum::Json(request): axum::Json<SuggestRequest>,
) -> Response
where
    R: MatchRepository + 'static,
{
    match service.suggest(request.user_id, &request.criteria, &request.candidate) {
        Ok(record) => {
            let view = service.view(&record);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_suggested_handler<R>(
    State(service): State<Arc<MatchLifecycleService<R>>>,
    Path(user_id): Path<Uuid>,
) -> Response
where
    R: MatchRepository + 'static,
{
    match service.list_suggested(&UserId(user_id)) {
        Ok(matches) => {
            let views: Vec<MatchView> = matches
                .iter()
                .map(|record| service.view(record))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn request_handler<R>(
    State(service): State<Arc<MatchLifecycleService<R>>>,
    Path(match_id): Path<Uuid>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: MatchRepository + 'static,
{
    respond(
        &service,
        service.request_connection(&MatchId(match_id), &request.user_id),
    )
}

pub(crate) async fn decline_handler<R>(
    State(service): State<Arc<MatchLifecycleService<R>>>,
    Path(match_id): Path<Uuid>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: MatchRepository + 'static,
{
    respond(
        &service,
        service.decline(&MatchId(match_id), &request.user_id),
    )
}

pub(crate) async fn accept_handler<R>(
    State(service): State<Arc<MatchLifecycleService<R>>>,
    Path(match_id): Path<Uuid>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: MatchRepository + 'static,
{
    respond(
        &service,
        service.accept_connection(&MatchId(match_id), &request.user_id),
    )
}

fn respond<R>(
    service: &MatchLifecycleService<R>,
    result: Result<super::domain::MatchRecord, MatchServiceError>,
) -> Response
where
    R: MatchRepository + 'static,
{
    match result {
        Ok(record) => {
            let view = service.view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: MatchServiceError) -> Response {
    let status = match &error {
        MatchServiceError::Validation(_) | MatchServiceError::InvalidTransition { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MatchServiceError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        MatchServiceError::NotFound => StatusCode::NOT_FOUND,
        MatchServiceError::Forbidden => StatusCode::FORBIDDEN,
        MatchServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MatchServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MatchServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
