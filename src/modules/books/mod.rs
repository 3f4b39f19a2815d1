pub mod docs;
pub mod models;
pub mod query;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod service;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookshelf_cache::{Cache, CacheAside, MemoryCache};
use bookshelf_kernel::{settings::Settings, InitCtx, Module};

use service::BookService;
use store::{BookStore, MemoryBookStore};

/// Book catalogue: CRUD plus a cached, filtered listing.
pub struct BooksModule {
    service: Arc<BookService>,
    store: Arc<dyn BookStore>,
    seed_count: u32,
}

impl BooksModule {
    /// In-memory store and cache sized from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let cache = Arc::new(MemoryCache::new(settings.cache.max_entries));
        Self::with_parts(
            Arc::new(MemoryBookStore::new()),
            cache,
            Duration::from_secs(settings.cache.ttl_secs),
            settings.store.seed_count,
        )
    }

    pub fn with_parts(
        store: Arc<dyn BookStore>,
        cache: Arc<dyn Cache>,
        ttl: Duration,
        seed_count: u32,
    ) -> Self {
        let service = Arc::new(BookService::new(
            store.clone(),
            CacheAside::new(cache, ttl),
        ));
        Self {
            service,
            store,
            seed_count,
        }
    }

    pub fn service(&self) -> Arc<BookService> {
        self.service.clone()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.seed_count > 0 {
            seed::seed(self.store.as_ref(), self.seed_count)
                .await
                .with_context(|| format!("failed to seed {} books", self.seed_count))?;
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(docs::openapi())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module from loaded settings
pub fn create_module(settings: &Settings) -> Arc<dyn Module> {
    Arc::new(BooksModule::from_settings(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::BookFilter;

    #[tokio::test]
    async fn test_init_seeds_configured_count() {
        let mut settings = Settings::default();
        settings.store.seed_count = 12;
        let module = BooksModule::from_settings(&settings);

        module.init(&InitCtx { settings: &settings }).await.unwrap();

        let page = module
            .service()
            .list(&BookFilter {
                limit: 0,
                ..BookFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 12);
    }

    #[tokio::test]
    async fn test_init_without_seed_leaves_store_empty() {
        let settings = Settings::default();
        let module = BooksModule::from_settings(&settings);

        module.init(&InitCtx { settings: &settings }).await.unwrap();

        let page = module.service().list(&BookFilter::default()).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, 0);
    }
}
