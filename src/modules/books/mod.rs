pub mod models;

use async_trait::async_trait;
use booklist_kernel::{InitCtx, Module, RecordSchema};

use crate::utils;

pub use models::{Book, BOOK_SCHEMA};

/// Books module: contributes the `book` record definition
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            target: "project.modules",
            prefix = %utils::log_prefix(self.name()),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn schemas(&self) -> Vec<RecordSchema> {
        vec![BOOK_SCHEMA]
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

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
