//! Books repository: invariants on the books owned by an author

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

pub struct BooksRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> BooksRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Append a book to an author's collection.
    /// Titles are unique per author (exact, case-sensitive match).
    pub async fn add_for_author(&mut self, author_id: Uuid, book: &Book) -> AppResult<Uuid> {
        require_author(&mut *self.conn, author_id).await?;

        let title_taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE author_id = ? AND title = ?",
        )
        .bind(author_id)
        .bind(&book.title)
        .fetch_one(&mut *self.conn)
        .await?;
        if title_taken > 0 {
            tracing::debug!("Author {} already owns a book titled {:?}", author_id, book.title);
            return Err(AppError::AlreadyExists(format!(
                "Author {} already has a book titled \"{}\"",
                author_id, book.title
            )));
        }

        let book = Book {
            author_id,
            ..book.clone()
        };
        insert(&mut *self.conn, &book).await?;
        Ok(book.id)
    }

    /// Get one book of an author
    pub async fn get_for_author(&mut self, author_id: Uuid, book_id: Uuid) -> AppResult<Book> {
        require_author(&mut *self.conn, author_id).await?;

        sqlx::query_as::<_, Book>(
            "SELECT id, author_id, title, description FROM books WHERE id = ? AND author_id = ?",
        )
        .bind(book_id)
        .bind(author_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Book {} not found for author {}", book_id, author_id))
        })
    }

    /// All books of an author; an author without books is a miss
    pub async fn list_for_author(&mut self, author_id: Uuid) -> AppResult<Vec<Book>> {
        require_author(&mut *self.conn, author_id).await?;

        let books = fetch_for_author(&mut *self.conn, author_id).await?;
        if books.is_empty() {
            return Err(AppError::NotFound(format!("Author {} has no books", author_id)));
        }
        Ok(books)
    }

    /// Overwrite title and description of a book, matched by identity or title
    /// within the author's collection
    pub async fn update_for_author(&mut self, author_id: Uuid, book: &Book) -> AppResult<()> {
        require_author(&mut *self.conn, author_id).await?;

        let matches = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, author_id, title, description FROM books
            WHERE author_id = ? AND (id = ? OR title = ?)
            "#,
        )
        .bind(author_id)
        .bind(book.id)
        .bind(&book.title)
        .fetch_all(&mut *self.conn)
        .await?;

        if matches.is_empty() {
            return Err(AppError::NotFound(format!(
                "Book {} not found for author {}",
                book.id, author_id
            )));
        }
        if let Some(other) = matches.iter().find(|stored| stored.id != book.id) {
            tracing::debug!("Book title {:?} is held by {}, not {}", book.title, other.id, book.id);
            return Err(AppError::CannotChangeIdentity(format!(
                "Book titled \"{}\" has identity {}, not {}",
                book.title, other.id, book.id
            )));
        }

        sqlx::query("UPDATE books SET title = ?, description = ? WHERE id = ?")
            .bind(&book.title)
            .bind(&book.description)
            .bind(book.id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    /// Delete a book by identity, whoever owns it
    pub async fn delete(&mut self, book_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(book_id)
            .execute(&mut *self.conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        Ok(())
    }

    pub async fn exists(&mut self, book_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ?")
            .bind(book_id)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count > 0)
    }
}

/// Fail with `NotFound` unless the author exists
async fn require_author(conn: &mut SqliteConnection, author_id: Uuid) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE id = ?")
        .bind(author_id)
        .fetch_one(&mut *conn)
        .await?;
    if count == 0 {
        return Err(AppError::NotFound(format!("Author {} not found", author_id)));
    }
    Ok(())
}

/// Books of one author, ordered by title
pub(crate) async fn fetch_for_author(
    conn: &mut SqliteConnection,
    author_id: Uuid,
) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, author_id, title, description FROM books WHERE author_id = ? ORDER BY title",
    )
    .bind(author_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(books)
}

pub(crate) async fn insert(conn: &mut SqliteConnection, book: &Book) -> AppResult<()> {
    sqlx::query("INSERT INTO books (id, author_id, title, description) VALUES (?, ?, ?, ?)")
        .bind(book.id)
        .bind(book.author_id)
        .bind(&book.title)
        .bind(&book.description)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
