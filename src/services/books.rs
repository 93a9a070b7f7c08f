//! Book management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDto},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to an author's collection and return it with its new identity
    pub async fn add_book_for_author(&self, author_id: Uuid, dto: BookDto) -> AppResult<BookDto> {
        dto.validate()?;

        let book = Book::from_dto(Uuid::new_v4(), author_id, dto);
        let mut uow = self.repository.begin().await?;
        let id = uow.books().add_for_author(author_id, &book).await?;
        uow.complete().await?;

        tracing::info!("Added book {} ({:?}) for author {}", id, book.title, author_id);
        Ok(book.into())
    }

    pub async fn get_book_for_author(&self, author_id: Uuid, book_id: Uuid) -> AppResult<BookDto> {
        let mut uow = self.repository.begin().await?;
        let book = uow.books().get_for_author(author_id, book_id).await?;
        Ok(book.into())
    }

    pub async fn get_books_for_author(&self, author_id: Uuid) -> AppResult<Vec<BookDto>> {
        let mut uow = self.repository.begin().await?;
        let books = uow.books().list_for_author(author_id).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    /// Overwrite title and description of book `book_id`
    pub async fn update_book_for_author(
        &self,
        author_id: Uuid,
        book_id: Uuid,
        dto: BookDto,
    ) -> AppResult<()> {
        dto.validate()?;
        if let Some(other) = dto.id.filter(|other| *other != book_id) {
            return Err(AppError::CannotChangeIdentity(format!(
                "Book {} cannot take identity {}",
                book_id, other
            )));
        }

        let book = Book::from_dto(book_id, author_id, dto);
        let mut uow = self.repository.begin().await?;
        uow.books().update_for_author(author_id, &book).await?;
        uow.complete().await?;

        tracing::info!("Updated book {} of author {}", book_id, author_id);
        Ok(())
    }

    pub async fn delete_book(&self, book_id: Uuid) -> AppResult<()> {
        let mut uow = self.repository.begin().await?;
        uow.books().delete(book_id).await?;
        uow.complete().await?;

        tracing::info!("Deleted book {}", book_id);
        Ok(())
    }

    pub async fn book_exists(&self, book_id: Uuid) -> AppResult<bool> {
        let mut uow = self.repository.begin().await?;
        uow.books().exists(book_id).await
    }
}
