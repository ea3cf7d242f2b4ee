use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::trace;

use crate::services::MapperService;

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        service: web::Data<Arc<MapperService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let store = service.store();
        let backend = store.backend_name().await;
        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        HttpResponse::Ok().json(json!({
            "status": "healthy",
            "backend": backend,
            "timestamp": now.to_rfc3339(),
            "uptime": uptime_seconds,
        }))
    }
}
