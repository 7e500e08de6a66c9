mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::service::PlanetService;

pub fn create_router(db: Database) -> Router {
    let service = PlanetService::new(db);

    Router::new()
        // Planets
        .route("/planets", get(handlers::list_planets))
        .route("/planets", post(handlers::create_planet))
        .route("/planets/{id}", get(handlers::get_planet))
        .route("/planets/{id}", delete(handlers::remove_planet))
        .route("/planets/name/{name}", get(handlers::get_planet_by_name))
        // Health
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}
