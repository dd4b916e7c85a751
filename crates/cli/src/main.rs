use anyhow::Context;
use booklist_app::App;
use booklist_kernel::{settings::Settings, FieldKind, RecordSchema};
use clap::{Parser, Subcommand};

/// Inspect a BookList installation.
#[derive(Debug, Parser)]
#[command(name = "booklist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the record schemas registered by every module
    Schema {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load BookList settings")?;
    // Logs go to stderr through the subscriber; stdout carries command output.
    booklist_telemetry::init(&settings.telemetry).ok();

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "booklist cli");

    match cli.command {
        Command::Schema { json } => {
            // Schemas come from the modules; no need to touch the database file.
            let mut settings = settings;
            settings.database.path = None;
            let app = App::build(settings).await?;
            let schemas = app.schemas();
            if json {
                let entries: Vec<_> = schemas
                    .iter()
                    .map(|(module, schema)| serde_json::json!({ "module": module, "schema": schema }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (module, schema) in &schemas {
                    print_schema(module, schema);
                }
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn print_schema(module: &str, schema: &RecordSchema) {
    println!("{} ({})", schema.table, module);
    for field in schema.fields {
        let name = match field.kind {
            FieldKind::Text { .. } => "text",
            FieldKind::Url { .. } => "url",
            FieldKind::Date => "date",
            FieldKind::Integer => "integer",
        };
        let kind = match field.kind.max_length() {
            Some(max_length) => format!("{name}({max_length})"),
            None => name.to_string(),
        };
        println!("  {:<16} {}", field.name, kind);
    }
}
