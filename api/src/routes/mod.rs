use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod foods;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(foods::food_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
