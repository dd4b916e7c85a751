//! Kernel for BookList: record schemas, module lifecycle, and settings.

pub mod module;
pub mod registry;
pub mod schema;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use schema::{FieldDef, FieldKind, RecordSchema};
