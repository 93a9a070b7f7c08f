//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Book row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
}

impl Book {
    /// Build a book owned by `author_id` from its transfer shape.
    /// The supplied `id` wins over the one carried by the DTO.
    pub fn from_dto(id: Uuid, author_id: Uuid, dto: BookDto) -> Self {
        Self {
            id,
            author_id,
            title: dto.title,
            description: dto.description,
        }
    }
}

/// Book as exchanged over the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookDto {
    /// Assigned by the server; ignored on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title,
            description: book.description,
        }
    }
}
