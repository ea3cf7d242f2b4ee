use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use super::{error_response, short_url};
use crate::services::MapperService;
use crate::storage::Mapping;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    pub original_url: String,
    pub short_url: String,
    pub creation_date: DateTime<Utc>,
    pub click_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl From<Mapping> for UrlStatsResponse {
    fn from(mapping: Mapping) -> Self {
        let code = mapping.code.as_deref().unwrap_or_default();
        UrlStatsResponse {
            short_url: short_url(code),
            original_url: mapping.target,
            creation_date: mapping.created_at,
            click_count: mapping.click_count,
            expiration_date: mapping.expires_at,
        }
    }
}

pub struct StatsService;

impl StatsService {
    #[instrument(skip(service), fields(code = %path))]
    pub async fn handle_stats(
        path: web::Path<String>,
        service: web::Data<Arc<MapperService>>,
    ) -> impl Responder {
        let code = path.into_inner();

        match service.stats(&code).await {
            Ok(mapping) => HttpResponse::Ok().json(UrlStatsResponse::from(mapping)),
            Err(e) => error_response(&e),
        }
    }
}
