use anyhow::Context;
use api::{
    config::{Cli, Command},
    db, rest, seed, AppState,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to DB")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Populate { file, email } => {
            let count = seed::populate_from_file(&pool, &email, &file).await?;
            tracing::info!("populated {} jobs for {}", count, email);
        }
        Command::Serve => {
            let bind_addr = config.bind_addr.clone();
            let app = rest::router(AppState::new(pool, config));

            tracing::info!("REST API listening on {}", bind_addr);
            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
