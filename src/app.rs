//! Application bootstrap: module registration, explicit schema registration,
//! and lifecycle.

use std::sync::Arc;

use anyhow::Context;
use booklist_db::{DbModule, Repository, SqliteStore, Store};
use booklist_kernel::{settings::Settings, InitCtx, ModuleRegistry, RecordSchema};

use crate::modules::{self, books::Book};

/// A fully wired BookList instance.
pub struct App {
    settings: Settings,
    registry: ModuleRegistry,
    store: Arc<SqliteStore>,
}

impl App {
    /// Register every module, initialize them, and hand each collected
    /// record schema to the store.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let store = match &settings.database.path {
            Some(path) => SqliteStore::open(path)
                .with_context(|| format!("failed to open database {}", path.display()))?,
            None => SqliteStore::open_in_memory()?,
        };
        let store = Arc::new(store);

        let mut registry = ModuleRegistry::new();
        registry.register_core(Arc::new(DbModule::new(Arc::clone(&store))));
        modules::register_all(&mut registry);

        let app = Self {
            settings,
            registry,
            store,
        };

        let ctx = app.ctx();
        app.registry.init_core_modules(&ctx).await?;
        app.registry.init_custom_modules(&ctx).await?;

        for (module, schema) in app.registry.collect_schemas() {
            tracing::info!(module = %module, table = schema.table, "registering schema");
            app.store
                .register(schema)
                .await
                .with_context(|| format!("module '{}' failed to register '{}'", module, schema.table))?;
        }

        Ok(app)
    }

    /// Start core modules (checking the database), then custom modules
    pub async fn start(&self) -> anyhow::Result<()> {
        let ctx = self.ctx();
        self.registry.start_core_modules(&ctx).await?;
        self.registry.start_custom_modules(&ctx).await?;
        tracing::info!("booklist started");
        Ok(())
    }

    /// Stop custom modules, then core modules (checkpointing the database)
    pub async fn stop(&self) -> anyhow::Result<()> {
        self.registry.stop_custom_modules().await?;
        self.registry.stop_core_modules().await?;
        tracing::info!("booklist stopped");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Record schemas registered by all modules, sorted by module then table
    pub fn schemas(&self) -> Vec<(String, RecordSchema)> {
        self.registry.collect_schemas()
    }

    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    pub fn books(&self) -> Repository<Book> {
        Repository::new(self.store())
    }

    fn ctx(&self) -> InitCtx<'_> {
        InitCtx {
            settings: &self.settings,
        }
    }
}
