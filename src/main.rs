use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use portal::config::AppConfig;
use portal::logging::init_logging;
use portal::state::AppState;

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    tracing::error!(error = %e, "startup failed");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // RUST_LOG may come from .env
    dotenv::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env().map_err(startup_error)?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config).map_err(startup_error)?;
    state.bootstrap_admin().map_err(startup_error)?;

    let data = web::Data::new(state);
    tracing::info!(%bind_addr, "starting portal backend");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(portal::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
