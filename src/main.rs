use anyhow::Context;
use booklist_app::App;
use booklist_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load BookList settings")?;

    booklist_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        database = ?settings.database.path,
        "booklist-app bootstrap starting"
    );

    let app = App::build(settings).await?;
    if let Err(err) = app.start().await {
        // Modules that did start still get to release their resources.
        if let Err(stop_err) = app.stop().await {
            tracing::error!(error = ?stop_err, "shutdown after failed start also failed");
        }
        return Err(err);
    }

    tracing::info!("booklist-app bootstrap complete, waiting for shutdown signal");
    shutdown_signal().await?;

    app.stop().await
}

/// Resolve on Ctrl-C, or on SIGTERM where the platform has it.
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())
            .with_context(|| "failed to listen for SIGTERM")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.with_context(|| "failed to listen for shutdown signal")?;
            }
            _ = terminate.recv() => {
                tracing::info!("received SIGTERM");
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .with_context(|| "failed to listen for shutdown signal")
    }
}
