pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{reading_cache::ReadingCache, vision::VisionClient};

use handlers::ApiDoc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub vision: VisionClient,
    pub cache: ReadingCache,
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/plants", get(handlers::list_plants).post(handlers::create_plant))
        .route("/plants/{id}", get(handlers::get_plant))
        .route(
            "/plants/{id}/image",
            get(handlers::get_plant_image).put(handlers::update_plant_image),
        )
        .route("/plants/{id}/readings", get(handlers::get_readings))
        .route(
            "/plants/{id}/readings/refresh",
            post(handlers::refresh_reading),
        )
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
