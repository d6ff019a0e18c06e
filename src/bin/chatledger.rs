use std::{path::PathBuf, sync::Arc};

use chatledger::{
    app::{build_engine, build_store},
    dispatcher::Dispatcher,
    errors::AppError,
    health::HealthServer,
    init,
    transport::{LineReplier, LineSource},
    BuildInfo,
};
use chatledger_config::ConfigManager;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "chatledger stopped");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let manager = match std::env::args_os().nth(1) {
        Some(path) => ConfigManager::new(PathBuf::from(path)),
        None => ConfigManager::with_default_location()?,
    };
    let config = manager.load_effective()?;
    init();
    info!(
        build = %BuildInfo::current(),
        config = %manager.config_path().display(),
        backend = config.backend.kind(),
        locale = %config.locale,
        "chatledger starting"
    );

    let store = build_store(&config.backend).await?;
    let engine = Arc::new(build_engine(&config, store)?);

    let health = HealthServer::bind(config.health_port).await?;
    let health_task = tokio::spawn(health.serve());

    let dispatcher = Dispatcher::new(engine, Arc::new(LineReplier::stdout()));
    let summary = dispatcher
        .run_until(LineSource::stdin(), interrupted())
        .await?;
    info!(
        received = summary.received,
        replied = summary.replied,
        "message source closed"
    );
    health_task.abort();
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves when the signal cannot be installed.
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupted"),
        Err(err) => {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
