use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use shortmap::api::{self, AppStartTime};
use shortmap::config::{get_config, init_config, Config};
use shortmap::logging::init_logging;
use shortmap::services::{CleanupTask, MapperService};
use shortmap::storage::StoreFactory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenvy::dotenv().ok();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });
    init_config(config);
    let config = get_config();

    let _log_guard = init_logging(config);

    let store = StoreFactory::create().await.unwrap_or_else(|e| {
        eprintln!("Failed to initialize storage: {}", e);
        std::process::exit(1);
    });
    info!("Using storage backend: {}", store.backend_name().await);

    let service = Arc::new(MapperService::new(store));

    if config.cleanup.enabled {
        let task = CleanupTask::new(
            service.clone(),
            std::time::Duration::from_secs(config.cleanup.sweep_interval_secs),
        );
        tokio::spawn(task.run());
    } else {
        info!("Expiry sweep disabled by configuration");
    }

    let bind_addr = (config.server.host.clone(), config.server.port);
    info!(
        "Listening on {}:{} (public base {})",
        config.server.host, config.server.port, config.server.public_url
    );

    let service_data = web::Data::new(service);
    let start_time_data = web::Data::new(app_start_time);

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .app_data(start_time_data.clone())
            .configure(api::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
