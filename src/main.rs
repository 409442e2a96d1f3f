//! game-saver binary entrypoint wiring configuration, logging, storage and the HTTP server.

use std::{future::IntoFuture, time::Duration};

use anyhow::Context;
use game_saver::{
    config::{AppConfig, Environment},
    dao::game_store,
    routes,
    state::AppState,
};
use tokio::{net::TcpListener, sync::watch, time::sleep};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(config.env);

    info!(env = ?config.env, "starting game-saver");
    debug!("debug messages are enabled");

    let store = match game_store::connect(&config.storage_url).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "failed to init storage");
            return Err(err).context("initialising storage");
        }
    };

    let app = routes::with_middleware(
        routes::router(AppState::new(store.clone())),
        config.http_server.timeout,
    );

    let listener = TcpListener::bind(&config.address)
        .await
        .context("binding server")?;
    info!(address = %config.address, "starting server");

    let (draining_tx, mut draining_rx) = watch::channel(false);
    let server = axum::serve(listener, app.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            let _ = draining_tx.send(true);
        },
    );

    tokio::select! {
        result = server.into_future() => result.context("serving axum")?,
        () = drain_deadline(&mut draining_rx, config.http_server.idle_timeout) => {
            warn!(
                idle_timeout = ?config.http_server.idle_timeout,
                "connections still open after idle timeout; forcing shutdown"
            );
        }
    }

    store.close().await;
    info!("server stopped");
    Ok(())
}

/// Resolve once shutdown has started and `idle_timeout` has elapsed since.
async fn drain_deadline(draining: &mut watch::Receiver<bool>, idle_timeout: Duration) {
    if draining.wait_for(|draining| *draining).await.is_ok() {
        info!("shutdown requested; draining open connections");
        sleep(idle_timeout).await;
    } else {
        std::future::pending::<()>().await;
    }
}

/// Configure tracing: human readable output locally, JSON lines elsewhere.
fn init_tracing(env: Environment) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match env {
        Environment::Local => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        Environment::Dev | Environment::Prod => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
