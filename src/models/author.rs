//! Author model and related types

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::book::{Book, BookDto};

/// Full author model from database, with its owned books
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub genre: String,
    #[sqlx(skip)]
    pub books: Vec<Book>,
}

impl Author {
    /// Build an author entity from its transfer shape.
    /// Books in the DTO get fresh identities unless they carry one.
    pub fn from_dto(id: Uuid, dto: AuthorDto) -> Self {
        let books = dto
            .books
            .unwrap_or_default()
            .into_iter()
            .map(|book| Book::from_dto(book.id.unwrap_or_else(Uuid::new_v4), id, book))
            .collect();

        Self {
            id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            date_of_birth: dto.date_of_birth,
            genre: dto.genre,
            books,
        }
    }

    /// True when both records share the (first name, last name, birth date) triple
    pub fn same_person(&self, other: &Author) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.date_of_birth == other.date_of_birth
    }
}

/// Author as exchanged over the API
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorDto {
    /// Assigned by the server; ignored on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 50, message = "First name must be 1 to 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1 to 50 characters"))]
    pub last_name: String,
    /// ISO date (`YYYY-MM-DD`), not in the future
    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, max = 50, message = "Genre must be 1 to 50 characters"))]
    pub genre: String,
    /// Omitted on update to keep the stored books untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub books: Option<Vec<BookDto>>,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: Some(author.id),
            first_name: author.first_name,
            last_name: author.last_name,
            date_of_birth: author.date_of_birth,
            genre: author.genre,
            books: Some(author.books.into_iter().map(BookDto::from).collect()),
        }
    }
}

/// Birth dates may not lie after the current (UTC) day
pub fn validate_birth_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut err = ValidationError::new("birth_date_in_future");
        err.message = Some("Date of birth cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}
