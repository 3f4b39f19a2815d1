//! Book use cases: create, list, fetch, update, remove.

use std::sync::Arc;

use bookshelf_cache::{cache_key, CacheAside};
use bookshelf_db::StoreError;
use thiserror::Error;

use super::models::{Book, BookFilter, BookPatch, NewBook, Paginated};
use super::query;
use super::store::BookStore;

/// Namespace for list-result cache keys.
pub const CACHE_NAMESPACE: &str = "books";

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book is not found")]
    NotFound { id: i64 },

    #[error("Book with this title already exists")]
    DuplicateTitle,

    /// Any other store failure, passed through untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the store and the list cache.
pub struct BookService {
    store: Arc<dyn BookStore>,
    cache: CacheAside,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    pub async fn create(&self, input: NewBook) -> Result<Book, BookError> {
        let book = self
            .store
            .create(input)
            .await
            .map_err(translate_write_error)?;
        tracing::info!(book_id = book.id, "book created");
        Ok(book)
    }

    /// Cached for the cache TTL; writes do not invalidate earlier pages.
    pub async fn list(&self, filter: &BookFilter) -> Result<Paginated<Book>, BookError> {
        match cache_key(CACHE_NAMESPACE, filter) {
            Ok(key) => {
                self.cache
                    .get_or_compute(&key, || self.load_page(filter))
                    .await
            }
            Err(err) => {
                tracing::warn!(error = %err, "list filter has no cache key, reading through");
                self.load_page(filter).await
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Book, BookError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(BookError::NotFound { id })
    }

    pub async fn update(&self, id: i64, patch: BookPatch) -> Result<Book, BookError> {
        self.get_by_id(id).await?;

        let book = self
            .store
            .update(id, patch)
            .await
            .map_err(translate_write_error)?;
        tracing::info!(book_id = id, "book updated");
        Ok(book)
    }

    pub async fn remove(&self, id: i64) -> Result<(), BookError> {
        self.get_by_id(id).await?;

        self.store.delete(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Count and fetch run concurrently; either failing fails the page.
    async fn load_page(&self, filter: &BookFilter) -> Result<Paginated<Book>, BookError> {
        let query = query::build(filter);

        let (total, data) = tokio::try_join!(
            self.store.count(&query.predicate),
            self.store
                .find_many(&query.predicate, &query.order, query.offset, query.limit),
        )?;

        Ok(Paginated::new(data, total, filter.page, filter.limit))
    }
}

fn translate_write_error(err: StoreError) -> BookError {
    if err.is_constraint_violation() {
        BookError::DuplicateTitle
    } else {
        BookError::Store(err)
    }
}
