use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use booklist_kernel::{InitCtx, Module};

use crate::sqlite::SqliteStore;

/// Core module owning the database connection.
///
/// Rows are committed as they are written; start verifies the file and stop
/// folds the write-ahead log back into it.
pub struct DbModule {
    store: Arc<SqliteStore>,
}

impl DbModule {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            path = ?ctx.settings.database.path,
            "db module initialized"
        );
        Ok(())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store
            .integrity_check()
            .await
            .with_context(|| "database integrity check failed")?;
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store
            .checkpoint()
            .await
            .with_context(|| "failed to checkpoint database")?;
        tracing::info!(module = self.name(), "db module stopped");
        Ok(())
    }
}
