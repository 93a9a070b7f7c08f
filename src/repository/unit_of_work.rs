//! Unit of work: one database transaction shared by the repositories

use sqlx::{Sqlite, Transaction};

use super::{authors::AuthorsRepository, books::BooksRepository};
use crate::error::AppResult;

/// Groups author and book operations into a single commit.
///
/// Repositories borrowed from a unit of work run inside its transaction.
/// Dropping the unit of work without calling [`UnitOfWork::complete`]
/// rolls everything back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    pub fn authors(&mut self) -> AuthorsRepository<'_> {
        AuthorsRepository::new(&mut self.tx)
    }

    pub fn books(&mut self) -> BooksRepository<'_> {
        BooksRepository::new(&mut self.tx)
    }

    /// Commit every pending change as one transaction
    pub async fn complete(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
