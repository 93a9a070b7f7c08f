//! Book endpoints, scoped by owning author

use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::{error::AppResult, models::book::BookDto, AppState};

use super::{Payload, UrlPath};

/// List the books of an author
#[utoipa::path(
    get,
    path = "/books/authors/{author_id}",
    tag = "books",
    params(("author_id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books ordered by title", body = Vec<BookDto>),
        (status = 404, description = "Author not found or without books", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books_for_author(
    State(state): State<AppState>,
    UrlPath(author_id): UrlPath<Uuid>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.books.get_books_for_author(author_id).await?;
    Ok(Json(books))
}

/// Add a book to an author's collection
#[utoipa::path(
    post,
    path = "/books/authors/{author_id}",
    tag = "books",
    params(("author_id" = Uuid, Path, description = "Author ID")),
    request_body = BookDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Author already has a book with this title", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_for_author(
    State(state): State<AppState>,
    UrlPath(author_id): UrlPath<Uuid>,
    Payload(dto): Payload<BookDto>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<BookDto>)> {
    let book = state.services.books.add_book_for_author(author_id, dto).await?;
    let location = match book.id {
        Some(book_id) => format!("/api/books/{}/authors/{}", book_id, author_id),
        None => format!("/api/books/authors/{}", author_id),
    };
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Get one book of an author
#[utoipa::path(
    get,
    path = "/books/{book_id}/authors/{author_id}",
    tag = "books",
    params(
        ("book_id" = Uuid, Path, description = "Book ID"),
        ("author_id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Author or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_for_author(
    State(state): State<AppState>,
    UrlPath((book_id, author_id)): UrlPath<(Uuid, Uuid)>,
) -> AppResult<Json<BookDto>> {
    let book = state
        .services
        .books
        .get_book_for_author(author_id, book_id)
        .await?;
    Ok(Json(book))
}

/// Update a book of an author
#[utoipa::path(
    put,
    path = "/books/{book_id}/authors/{author_id}",
    tag = "books",
    params(
        ("book_id" = Uuid, Path, description = "Book ID"),
        ("author_id" = Uuid, Path, description = "Author ID")
    ),
    request_body = BookDto,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Invalid input or identity change", body = crate::error::ErrorResponse),
        (status = 404, description = "Author or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_for_author(
    State(state): State<AppState>,
    UrlPath((book_id, author_id)): UrlPath<(Uuid, Uuid)>,
    Payload(dto): Payload<BookDto>,
) -> AppResult<StatusCode> {
    state
        .services
        .books
        .update_book_for_author(author_id, book_id, dto)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a book exists
#[utoipa::path(
    head,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book exists"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn book_exists(
    State(state): State<AppState>,
    UrlPath(book_id): UrlPath<Uuid>,
) -> AppResult<StatusCode> {
    if state.services.books.book_exists(book_id).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// Delete a book, whichever author owns it
#[utoipa::path(
    delete,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    UrlPath(book_id): UrlPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
