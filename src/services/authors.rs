//! Author management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorDto},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create an author (and any books it carries). A caller-chosen `id`
    /// is used as the identity, otherwise a fresh one is generated.
    pub async fn add_author(&self, id: Option<Uuid>, dto: AuthorDto) -> AppResult<Uuid> {
        dto.validate()?;

        let author = Author::from_dto(id.unwrap_or_else(Uuid::new_v4), dto);
        let mut uow = self.repository.begin().await?;
        let id = uow.authors().add(&author).await?;
        uow.complete().await?;

        tracing::info!("Created author {} ({} {})", id, author.first_name, author.last_name);
        Ok(id)
    }

    pub async fn get_author(&self, id: Uuid) -> AppResult<AuthorDto> {
        let mut uow = self.repository.begin().await?;
        let author = uow.authors().get(id).await?;
        Ok(author.into())
    }

    /// Every author, ordered by first then last name. Fails with `NotFound`
    /// on an empty catalog.
    pub async fn get_authors(&self) -> AppResult<Vec<AuthorDto>> {
        let mut uow = self.repository.begin().await?;
        let authors = uow.authors().list().await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    pub async fn get_authors_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<AuthorDto>> {
        let mut uow = self.repository.begin().await?;
        let authors = uow.authors().list_by_ids(ids).await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    /// Replace the mutable fields of author `id`. When the DTO carries no
    /// `books`, the stored collection is kept. A DTO naming another identity
    /// is refused.
    pub async fn update_author(&self, id: Uuid, mut dto: AuthorDto) -> AppResult<()> {
        dto.validate()?;
        if let Some(other) = dto.id.filter(|other| *other != id) {
            return Err(AppError::CannotChangeIdentity(format!(
                "Author {} cannot take identity {}",
                id, other
            )));
        }

        let mut uow = self.repository.begin().await?;
        let kept_books = match dto.books.take() {
            Some(books) => Some(books),
            None => uow
                .authors()
                .find(id)
                .await?
                .map(|current| current.books.into_iter().map(Into::into).collect()),
        };
        dto.books = kept_books;

        let author = Author::from_dto(id, dto);
        uow.authors().update(&author).await?;
        uow.complete().await?;

        tracing::info!("Updated author {}", id);
        Ok(())
    }

    /// Delete an author along with its books
    pub async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        let mut uow = self.repository.begin().await?;
        uow.authors().delete(id).await?;
        uow.complete().await?;

        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    pub async fn author_exists(&self, id: Uuid) -> AppResult<bool> {
        let mut uow = self.repository.begin().await?;
        uow.authors().exists(id).await
    }
}
