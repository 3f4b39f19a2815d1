//! Book persistence.

use async_trait::async_trait;
use bookshelf_db::{Expr, MemoryTable, OrderBy, StoreResult};
use time::OffsetDateTime;

use super::models::{Book, BookPatch, NewBook};

/// Thin CRUD over book records keyed by integer id.
///
/// `create` and `update` fail with `StoreError::ConstraintViolation` when the
/// title is already taken.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, book: NewBook) -> StoreResult<Book>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>>;

    async fn find_many(
        &self,
        predicate: &Expr,
        order: &OrderBy,
        offset: u64,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Book>>;

    async fn count(&self, predicate: &Expr) -> StoreResult<u64>;

    async fn update(&self, id: i64, patch: BookPatch) -> StoreResult<Book>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// [`BookStore`] backed by an in-process table with a unique title index.
pub struct MemoryBookStore {
    table: MemoryTable<Book>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            table: MemoryTable::new("book").with_unique("title"),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.table.is_empty().await
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let now = OffsetDateTime::now_utc();
        self.table
            .insert(|id| Book {
                id,
                title: book.title,
                author: book.author,
                published_year: book.published_year,
                stock: book.stock,
                genres: book.genres,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>> {
        self.table.get(id).await
    }

    async fn find_many(
        &self,
        predicate: &Expr,
        order: &OrderBy,
        offset: u64,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Book>> {
        self.table.select(predicate, order, offset, limit).await
    }

    async fn count(&self, predicate: &Expr) -> StoreResult<u64> {
        self.table.count(predicate).await
    }

    async fn update(&self, id: i64, patch: BookPatch) -> StoreResult<Book> {
        let now = OffsetDateTime::now_utc();
        self.table
            .update(id, |book| {
                patch.apply(book);
                book.updated_at = now;
            })
            .await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.table.delete(id).await.map(|_| ())
    }
}
