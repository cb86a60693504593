use std::path::Path;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::NormalizePath, web};
use tracing_actix_web::TracingLogger;

use flowbit_backend::{
    AppState,
    background_task::start_maintenance_task,
    graceful_shutdown::shutdown_signal,
    handlers::json_error,
    routes::configure_routes,
    settings::AppConfig,
};

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    if origins.iter().any(|o| o == "*") {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
    } else {
        let mut cors = Cors::default().allow_any_method().allow_any_header();
        for origin in &origins {
            cors = cors.allowed_origin(origin);
        }
        cors
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Startup error: {}", e);
            std::process::exit(1);
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} backend v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let app_state_clone = app_state.clone();

    let server = HttpServer::new(move || {
        let cors = build_cors(&app_state.config);

        App::new()
            .app_data(app_state.clone())
            .app_data(json_error::json_extractor_config())
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(configure_routes)
            .configure(|cfg| {
                // The exported marketing pages ride along when present;
                // the API scope above still wins on /api.
                if Path::new("public").is_dir() {
                    cfg.service(Files::new("/", "public").index_file("index.html"));
                }
            })
            .default_service(web::route().to(json_error::not_found))
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_maintenance_task(
        app_state_clone.rate_limiter.clone(),
        app_state_clone.csrf_tokens.clone(),
    ));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
