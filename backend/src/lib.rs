pub mod config;
pub mod error;
pub mod gpx_export;
pub mod interpolation;
pub mod models;
pub mod playback;
pub mod route_file;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::RouteError;
use crate::gpx_export::encode_route_as_gpx;
use crate::models::{ApiError, GeoPoint, InterpolateRequest, InterpolatedRouteResponse, Route};
use crate::route_file::{RouteFileError, RouteStore};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RouteStore>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/route", post(generate_handler).get(saved_route_handler))
        .route("/api/route/preview", post(preview_handler))
        .layer(cors)
        .with_state(state)
}

/// Interpolates without persisting.
async fn preview_handler(Json(req): Json<InterpolateRequest>) -> ApiResult<InterpolatedRouteResponse> {
    build_response(&req).map(Json).map_err(route_error)
}

/// Interpolates and replaces the persisted route.
async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<InterpolateRequest>,
) -> ApiResult<InterpolatedRouteResponse> {
    let response = build_response(&req).map_err(route_error)?;

    state
        .store
        .save(response.path.clone())
        .await
        .map_err(|err| route_error(err.into()))?;
    tracing::info!(
        "saved {} points to {}",
        response.point_count,
        state.store.path().display()
    );

    Ok(Json(response))
}

async fn saved_route_handler(State(state): State<AppState>) -> ApiResult<Vec<GeoPoint>> {
    state
        .store
        .load()
        .await
        .map(Json)
        .map_err(|err| route_error(err.into()))
}

fn build_response(req: &InterpolateRequest) -> Result<InterpolatedRouteResponse, RouteError> {
    let route = Route::new(req.points.clone())?;
    let params = req.params();
    let path = route.interpolate(&params)?;

    Ok(InterpolatedRouteResponse {
        point_count: path.len(),
        distance_km: route.distance_km(),
        gpx_base64: encode_route_as_gpx(&path)?,
        params,
        path,
    })
}

fn route_error(err: RouteError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        RouteError::TooFewPoints(_)
        | RouteError::InvalidCoordinate { .. }
        | RouteError::TooManyPoints { .. } => StatusCode::BAD_REQUEST,
        RouteError::File(RouteFileError::NotFound(_)) => StatusCode::NOT_FOUND,
        RouteError::Gpx(_) | RouteError::File(_) => {
            tracing::error!("route request failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
