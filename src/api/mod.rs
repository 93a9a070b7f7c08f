//! API handlers for the library REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    routing::{get, head},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON request body that must be present.
///
/// An empty body or a literal `null` is a missing argument; anything that
/// does not deserialize into `T` is invalid data.
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidData(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::NullArgument("Request body is required".to_string()));
        }

        let value: Option<T> =
            serde_json::from_slice(&bytes).map_err(|e| AppError::InvalidData(e.to_string()))?;

        value
            .map(Payload)
            .ok_or_else(|| AppError::NullArgument("Request body is null".to_string()))
    }
}

/// Path parameters whose parse failures are reported as invalid data
pub struct UrlPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for UrlPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| UrlPath(value))
            .map_err(|e| AppError::InvalidData(e.body_text()))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .head(authors::author_exists)
                .post(authors::create_author_with_id)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Books, scoped by author
        .route(
            "/books/authors/:author_id",
            get(books::list_books_for_author).post(books::create_book_for_author),
        )
        .route(
            "/books/:book_id/authors/:author_id",
            get(books::get_book_for_author).put(books::update_book_for_author),
        )
        .route(
            "/books/:book_id",
            head(books::book_exists).delete(books::delete_book),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
