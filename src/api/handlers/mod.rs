use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::PlanetError;
use crate::models::*;
use crate::service::PlanetService;

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Store and internal failures are logged in full; clients only see a
/// generic message for them.
impl IntoResponse for PlanetError {
    fn into_response(self) -> Response {
        let status = match self {
            PlanetError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlanetError::DuplicateName(_) => StatusCode::CONFLICT,
            PlanetError::NotFound(_) => StatusCode::NOT_FOUND,
            PlanetError::Database(_) | PlanetError::Internal(_) => {
                tracing::error!("Internal error: {:#}", self);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };

        if self.is_constraint_violation() {
            tracing::warn!("Rejected planet: {}", self);
        }
        error_response(status, self.to_string())
    }
}

/// A body that parsed as JSON but does not fit a planet is a validation
/// failure; other body problems keep axum's status.
fn json_rejection(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            PlanetError::Validation(err.body_text()).into_response()
        }
        other => error_response(other.status(), other.body_text()),
    }
}

fn path_rejection(rejection: PathRejection) -> Response {
    error_response(rejection.status(), rejection.body_text())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Planets
// ============================================================

pub async fn create_planet(
    State(service): State<PlanetService>,
    input: Result<Json<Planet>, JsonRejection>,
) -> Result<(StatusCode, Json<Planet>), Response> {
    let Json(input) = input.map_err(json_rejection)?;
    service
        .create(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(IntoResponse::into_response)
}

pub async fn get_planet(
    State(service): State<PlanetService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Planet>, Response> {
    let Path(id) = id.map_err(path_rejection)?;
    service
        .get(id)
        .map_err(IntoResponse::into_response)?
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Planet not found"))
}

pub async fn get_planet_by_name(
    State(service): State<PlanetService>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Json<Planet>, Response> {
    let Path(name) = name.map_err(path_rejection)?;
    service
        .get_by_name(&name)
        .map_err(IntoResponse::into_response)?
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Planet not found"))
}

pub async fn list_planets(
    State(service): State<PlanetService>,
    Query(query): Query<ListPlanetsQuery>,
) -> Result<Json<Vec<Planet>>, PlanetError> {
    service
        .list(query.terrain.as_deref(), query.climate.as_deref())
        .map(Json)
}

pub async fn remove_planet(
    State(service): State<PlanetService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, Response> {
    let Path(id) = id.map_err(path_rejection)?;
    service.remove(id).map_err(IntoResponse::into_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let cases = [
            (PlanetError::Validation("name".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (PlanetError::DuplicateName("Hoth".into()), StatusCode::CONFLICT),
            (PlanetError::NotFound(99), StatusCode::NOT_FOUND),
            (
                PlanetError::Internal(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
