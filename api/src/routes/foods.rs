use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Router};

use crate::error::AppError;
use crate::models::food_form::SaveFoodForm;
use crate::{AppState, handlers};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/save-food", post(save_food))
}

async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let map = handlers::foods::map_listings(&state).await;
    let page = state.pages.home(&map.listings, map.available)?;
    Ok(Html(page))
}

async fn save_food(
    State(state): State<AppState>,
    form: Result<Form<SaveFoodForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form?;
    let listing = form.into_listing()?;
    handlers::foods::save_listing(&state, listing).await;

    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use chrono::NaiveDate;
    use food_store::{
        BoxFuture, FoodListing, FoodStore, ListingId, MemoryFoodStore, NewFoodListing, StoreError,
    };
    use tower::ServiceExt;

    use crate::routes::app_router;
    use crate::services::pages::PageRenderer;

    use super::*;

    struct FailingStore;

    fn unavailable() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    impl FoodStore for FailingStore {
        fn list_all(&self) -> BoxFuture<'_, Result<Vec<FoodListing>, StoreError>> {
            Box::pin(async { Err(unavailable()) })
        }

        fn add(&self, _: NewFoodListing) -> BoxFuture<'_, Result<ListingId, StoreError>> {
            Box::pin(async { Err(unavailable()) })
        }

        fn clear_all(&self) -> BoxFuture<'_, Result<u64, StoreError>> {
            Box::pin(async { Err(unavailable()) })
        }
    }

    fn state(store: Arc<dyn FoodStore>) -> AppState {
        AppState {
            store,
            pages: PageRenderer::new("test-key").unwrap(),
        }
    }

    fn bakery() -> NewFoodListing {
        NewFoodListing::new(
            "bakery",
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            40.7128,
            -74.0060,
            "day-old bread",
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn save_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/save-food")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn home_request() -> Request<Body> {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    const BAKERY_FORM: &str = "category=bakery&date=2023-05-01&latitude=40.7128\
        &longitude=-74.0060&description=day-old+bread";

    #[tokio::test]
    async fn home_lists_every_listing_as_json() {
        let store = Arc::new(MemoryFoodStore::with_listings([bakery()]));
        let response = app_router(state(store)).oneshot(home_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let html = body_text(response).await;
        assert!(html.contains(
            r#"[{"latitude":40.7128,"longitude":-74.006,"date":"2023-05-01","category":"bakery","description":"day-old bread"}]"#
        ));
    }

    #[tokio::test]
    async fn home_with_no_listings_embeds_empty_array() {
        let store = Arc::new(MemoryFoodStore::new());
        let response = app_router(state(store)).oneshot(home_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("const foods = [];"));
        assert!(!html.contains("currently unavailable"));
    }

    #[tokio::test]
    async fn home_still_renders_when_store_fails() {
        let response = app_router(state(Arc::new(FailingStore)))
            .oneshot(home_request())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("const foods = [];"));
        assert!(html.contains("currently unavailable"));
    }

    #[tokio::test]
    async fn save_food_stores_listing_and_redirects_home() {
        let store = Arc::new(MemoryFoodStore::new());
        let response = app_router(state(store.clone()))
            .oneshot(save_request(BAKERY_FORM))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let saved = store.snapshot();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].matches(&bakery()));
    }

    #[tokio::test]
    async fn save_food_redirects_even_when_store_fails() {
        let response = app_router(state(Arc::new(FailingStore)))
            .oneshot(save_request(BAKERY_FORM))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn malformed_coordinates_are_a_bad_request() {
        let store = Arc::new(MemoryFoodStore::new());
        let response = app_router(state(store.clone()))
            .oneshot(save_request(
                "category=bakery&date=2023-05-01&latitude=north&longitude=-74.0060&description=bread",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["status"], 400);
        assert_eq!(body["statusText"], "Bad Request");
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn missing_description_is_saved_as_empty() {
        let store = Arc::new(MemoryFoodStore::new());
        let response = app_router(state(store.clone()))
            .oneshot(save_request(
                "category=bakery&date=2023-05-01&latitude=1&longitude=2",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let saved = store.snapshot();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].description, "");
    }

    #[tokio::test]
    async fn missing_coordinate_is_a_bad_request() {
        let store = Arc::new(MemoryFoodStore::new());
        let response = app_router(state(store.clone()))
            .oneshot(save_request(
                "category=bakery&date=2023-05-01&longitude=2&description=bread",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("application/json"));

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["status"], 400);
        assert!(body["message"].as_str().unwrap().contains("latitude"));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn saved_listing_shows_up_on_the_map() {
        let store = Arc::new(MemoryFoodStore::new());
        let app = app_router(state(store));

        app.clone().oneshot(save_request(BAKERY_FORM)).await.unwrap();
        let html = body_text(app.oneshot(home_request()).await.unwrap()).await;

        assert!(html.contains(r#""category":"bakery""#));
        assert!(html.contains(r#""date":"2023-05-01""#));
    }
}
