//! HTTP routes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use fitplan_domain::{ExerciseId, PlacementId, WorkoutTemplateId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::App;
use crate::use_cases::placement::{
    AddExerciseInput, AddExerciseResult, CopyRoundInput, CopyRoundResult, OrganizedTemplate,
    PlacementError, RemoveExerciseResult, ReorderExerciseResult, UpdateMetadataResult,
};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route(
            "/api/v2/workout-templates/{template_id}/exercises",
            get(get_organized_view).post(add_exercise),
        )
        .route(
            "/api/v2/workout-templates/{template_id}/exercises/rounds/copy",
            post(copy_round),
        )
        .route(
            "/api/v2/workout-templates/{template_id}/exercises/{placement_id}",
            axum::routing::delete(remove_exercise),
        )
        .route(
            "/api/v2/workout-templates/{template_id}/exercises/{placement_id}/metadata",
            put(update_metadata),
        )
        .route(
            "/api/v2/workout-templates/{template_id}/exercises/{placement_id}/order",
            put(reorder_exercise),
        )
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Request bodies
// =============================================================================

fn first_round() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct AddExerciseRequest {
    pub exercise_id: Uuid,
    pub phase: String,
    #[serde(default = "first_round")]
    pub round_number: u32,
    pub metadata: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMetadataRequest {
    pub metadata: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub new_order: u32,
}

#[derive(Debug, Deserialize)]
pub struct CopyRoundRequest {
    pub source_phase: String,
    pub source_round: u32,
    pub target_phase: String,
    pub target_round: u32,
}

// =============================================================================
// Placement handlers
// =============================================================================

async fn get_organized_view(
    State(app): State<Arc<App>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<OrganizedTemplate>, ApiError> {
    let Path(template_id) = path?;
    let view = app
        .use_cases
        .placement
        .organized_view
        .execute(WorkoutTemplateId::from_uuid(template_id))
        .await?;
    Ok(Json(view))
}

async fn add_exercise(
    State(app): State<Arc<App>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<AddExerciseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddExerciseResult>), ApiError> {
    let Path(template_id) = path?;
    let Json(body) = body?;
    let input = AddExerciseInput {
        exercise_id: ExerciseId::from_uuid(body.exercise_id),
        phase: body.phase,
        round_number: body.round_number,
        metadata: body.metadata,
    };
    let result = app
        .use_cases
        .placement
        .add_exercise
        .execute(WorkoutTemplateId::from_uuid(template_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn remove_exercise(
    State(app): State<Arc<App>>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<RemoveExerciseResult>, ApiError> {
    let Path((template_id, placement_id)) = path?;
    let result = app
        .use_cases
        .placement
        .remove_exercise
        .execute(
            WorkoutTemplateId::from_uuid(template_id),
            PlacementId::from_uuid(placement_id),
        )
        .await?;
    Ok(Json(result))
}

async fn update_metadata(
    State(app): State<Arc<App>>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<UpdateMetadataRequest>, JsonRejection>,
) -> Result<Json<UpdateMetadataResult>, ApiError> {
    let Path((template_id, placement_id)) = path?;
    let Json(body) = body?;
    let result = app
        .use_cases
        .placement
        .update_metadata
        .execute(
            WorkoutTemplateId::from_uuid(template_id),
            PlacementId::from_uuid(placement_id),
            body.metadata,
        )
        .await?;
    Ok(Json(result))
}

async fn reorder_exercise(
    State(app): State<Arc<App>>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Json<ReorderExerciseResult>, ApiError> {
    let Path((template_id, placement_id)) = path?;
    let Json(body) = body?;
    let result = app
        .use_cases
        .placement
        .reorder_exercise
        .execute(
            WorkoutTemplateId::from_uuid(template_id),
            PlacementId::from_uuid(placement_id),
            body.new_order,
        )
        .await?;
    Ok(Json(result))
}

async fn copy_round(
    State(app): State<Arc<App>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CopyRoundRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CopyRoundResult>), ApiError> {
    let Path(template_id) = path?;
    let Json(body) = body?;
    let input = CopyRoundInput {
        source_phase: body.source_phase,
        source_round: body.source_round,
        target_phase: body.target_phase,
        target_round: body.target_round,
    };
    let result = app
        .use_cases
        .placement
        .copy_round
        .execute(WorkoutTemplateId::from_uuid(template_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Debug)]
pub struct ApiError(PlacementError);

impl From<PlacementError> for ApiError {
    fn from(e: PlacementError) -> Self {
        Self(e)
    }
}

// Malformed paths and bodies answer in the same shape as use case failures.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(PlacementError::InvalidInput(rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PlacementError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PlacementError::NotFound(_) => StatusCode::NOT_FOUND,
            PlacementError::InvalidState(_) => StatusCode::CONFLICT,
            PlacementError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlacementError::ExerciseInactive(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlacementError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "Placement request failed");
            "Internal error".to_string()
        } else {
            self.0.to_string()
        };

        let body = ErrorBody {
            code: self.0.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
