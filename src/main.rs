use std::{process, sync::Arc};

use sitevars::{
    application::{
        checks,
        error::AppError,
        repos::{SiteRepo, SiteVarRepo},
        vars::SiteVars,
    },
    cache::{CacheConfig, SiteVarCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HealthProbe, HttpState},
        telemetry,
    },
};
use tokio::net::TcpListener;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections,
    )
    .await
    .map_err(|err| AppError::unexpected(format!("failed to connect to database: {err}")))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to run migrations: {err}")))?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    let cache = Arc::new(SiteVarCache::new(&CacheConfig::from(&settings.cache)));
    let var_repo: Arc<dyn SiteVarRepo> = repositories.clone();
    let site_repo: Arc<dyn SiteRepo> = repositories.clone();
    let vars = Arc::new(SiteVars::new(var_repo, site_repo.clone(), cache));

    checks::report(&checks::run_startup_checks(&settings));

    let health: Arc<dyn HealthProbe> = repositories.clone();
    let state = HttpState {
        vars,
        sites: site_repo,
        health,
        default_host: settings.sites.default_host.clone(),
        context_inject: settings.context.inject,
    };

    let router = http::build_router(state);
    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %settings.server.addr, "sitevars listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections,
    )
    .await
    .map_err(|err| AppError::unexpected(format!("failed to connect to database: {err}")))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to run migrations: {err}")))?;

    info!("migrations applied");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown signal handler");
    }
}
