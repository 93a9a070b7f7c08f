//! Author endpoints

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::author::AuthorDto,
    AppState,
};

use super::{Payload, UrlPath};

/// Optional filter for the author list
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorsQuery {
    /// Comma separated author identities
    pub ids: Option<String>,
}

impl AuthorsQuery {
    /// Parsed `ids` filter, `None` when the parameter is absent
    pub fn parse_ids(&self) -> AppResult<Option<Vec<Uuid>>> {
        let Some(raw) = self.ids.as_deref() else {
            return Ok(None);
        };
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                Uuid::parse_str(part)
                    .map_err(|_| AppError::InvalidData(format!("Invalid author id: {}", part)))
            })
            .collect::<AppResult<Vec<_>>>()
            .map(Some)
    }
}

type Created = (StatusCode, [(header::HeaderName, String); 1], Json<AuthorDto>);

/// List authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorsQuery),
    responses(
        (status = 200, description = "Authors ordered by first and last name", body = Vec<AuthorDto>),
        (status = 404, description = "No authors in the catalog", body = crate::error::ErrorResponse),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorsQuery>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = match query.parse_ids()? {
        Some(ids) => state.services.authors.get_authors_by_ids(&ids).await?,
        None => state.services.authors.get_authors().await?,
    };
    Ok(Json(authors))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author with its books", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<Uuid>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.get_author(id).await?;
    Ok(Json(author))
}

/// Check whether an author exists
#[utoipa::path(
    head,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author exists"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_exists(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<Uuid>,
) -> AppResult<StatusCode> {
    if state.services.authors.author_exists(id).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// Create an author with a server-assigned identity
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorDto,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Author already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Payload(dto): Payload<AuthorDto>,
) -> AppResult<Created> {
    create(state, None, dto).await
}

/// Create an author under a caller-chosen identity
#[utoipa::path(
    post,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Identity for the new author")),
    request_body = AuthorDto,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Author already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author_with_id(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<Uuid>,
    Payload(dto): Payload<AuthorDto>,
) -> AppResult<Created> {
    create(state, Some(id), dto).await
}

async fn create(state: AppState, id: Option<Uuid>, dto: AuthorDto) -> AppResult<Created> {
    let id = state.services.authors.add_author(id, dto).await?;
    let created = state.services.authors.get_author(id).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/authors/{}", id))],
        Json(created),
    ))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    request_body = AuthorDto,
    responses(
        (status = 204, description = "Author updated"),
        (status = 400, description = "Invalid input or identity change", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<Uuid>,
    Payload(dto): Payload<AuthorDto>,
) -> AppResult<StatusCode> {
    state.services.authors.update_author(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an author and its books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.authors.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
