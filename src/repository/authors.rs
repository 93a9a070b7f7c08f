//! Authors repository: existence and uniqueness invariants on authors

use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

use super::books;
use crate::{
    error::{AppError, AppResult},
    models::{author::Author, book::Book},
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, genre";

pub struct AuthorsRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> AuthorsRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Insert an author together with its books and return its identity.
    /// No two authors may share first name, last name and date of birth.
    pub async fn add(&mut self, author: &Author) -> AppResult<Uuid> {
        if self.find_same_person(author).await?.is_some() {
            tracing::debug!(
                "Author {} {} born {} already exists",
                author.first_name, author.last_name, author.date_of_birth
            );
            return Err(AppError::AlreadyExists(format!(
                "Author {} {} born {} already exists",
                author.first_name, author.last_name, author.date_of_birth
            )));
        }
        if self.exists(author.id).await? {
            return Err(AppError::AlreadyExists(format!("Author {} already exists", author.id)));
        }
        check_distinct_titles(author)?;

        sqlx::query(
            r#"
            INSERT INTO authors (id, first_name, last_name, date_of_birth, genre)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .bind(&author.genre)
        .execute(&mut *self.conn)
        .await?;

        for book in &author.books {
            books::insert(&mut *self.conn, &owned_by(book, author.id)).await?;
        }

        Ok(author.id)
    }

    /// Get author by ID, books included
    pub async fn get(&mut self, id: Uuid) -> AppResult<Author> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Look an author up without treating a miss as an error
    pub async fn find(&mut self, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = ?",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        match author {
            Some(mut author) => {
                author.books = books::fetch_for_author(&mut *self.conn, author.id).await?;
                Ok(Some(author))
            }
            None => Ok(None),
        }
    }

    /// All authors ordered by first then last name; an empty catalog is a miss
    pub async fn list(&mut self) -> AppResult<Vec<Author>> {
        let mut authors = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY first_name, last_name",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        if authors.is_empty() {
            return Err(AppError::NotFound("No authors found".to_string()));
        }
        self.load_books(&mut authors).await?;
        Ok(authors)
    }

    /// Authors among `ids`, ordered by first then last name. Unknown ids are skipped.
    pub async fn list_by_ids(&mut self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM authors WHERE id IN (", AUTHOR_COLUMNS));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY first_name, last_name");

        let mut authors = builder
            .build_query_as::<Author>()
            .fetch_all(&mut *self.conn)
            .await?;
        self.load_books(&mut authors).await?;
        Ok(authors)
    }

    /// Delete an author; its books go with it
    pub async fn delete(&mut self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }

    /// Overwrite an author's mutable fields and replace its book collection.
    ///
    /// The stored record is resolved by identity or by the
    /// (first name, last name, date of birth) triple. A triple match that
    /// belongs to another identity is refused.
    pub async fn update(&mut self, author: &Author) -> AppResult<()> {
        let matches = sqlx::query_as::<_, Author>(&format!(
            r#"
            SELECT {} FROM authors
            WHERE id = ? OR (first_name = ? AND last_name = ? AND date_of_birth = ?)
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(author.id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .fetch_all(&mut *self.conn)
        .await?;

        if matches.is_empty() {
            return Err(AppError::NotFound(format!("Author {} not found", author.id)));
        }
        let conflicting = matches
            .iter()
            .find(|stored| stored.id != author.id && stored.same_person(author));
        if let Some(other) = conflicting {
            tracing::debug!("Author triple is held by {}, not {}", other.id, author.id);
            return Err(AppError::CannotChangeIdentity(format!(
                "Author {} {} born {} has identity {}, not {}",
                other.first_name, other.last_name, other.date_of_birth, other.id, author.id
            )));
        }
        check_distinct_titles(author)?;

        sqlx::query(
            r#"
            UPDATE authors
            SET first_name = ?, last_name = ?, date_of_birth = ?, genre = ?
            WHERE id = ?
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .bind(&author.genre)
        .bind(author.id)
        .execute(&mut *self.conn)
        .await?;

        sqlx::query("DELETE FROM books WHERE author_id = ?")
            .bind(author.id)
            .execute(&mut *self.conn)
            .await?;
        for book in &author.books {
            books::insert(&mut *self.conn, &owned_by(book, author.id)).await?;
        }

        Ok(())
    }

    pub async fn exists(&mut self, id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count > 0)
    }

    async fn find_same_person(&mut self, author: &Author) -> AppResult<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM authors
            WHERE first_name = ? AND last_name = ? AND date_of_birth = ?
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(id)
    }

    async fn load_books(&mut self, authors: &mut [Author]) -> AppResult<()> {
        for author in authors.iter_mut() {
            author.books = books::fetch_for_author(&mut *self.conn, author.id).await?;
        }
        Ok(())
    }
}

fn owned_by(book: &Book, author_id: Uuid) -> Book {
    Book {
        author_id,
        ..book.clone()
    }
}

/// A collection may not hold two books with the same title
fn check_distinct_titles(author: &Author) -> AppResult<()> {
    let mut seen = HashSet::new();
    for book in &author.books {
        if !seen.insert(book.title.as_str()) {
            return Err(AppError::AlreadyExists(format!(
                "Author {} would own two books titled \"{}\"",
                author.id, book.title
            )));
        }
    }
    Ok(())
}
