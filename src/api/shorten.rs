use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{error_response, short_url};
use crate::services::{CreateMappingRequest, MapperService};

/// Field names match the public API contract, not the internal model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde(default)]
    pub ttl_hours: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
}

pub struct ShortenService;

impl ShortenService {
    #[instrument(skip(body, service))]
    pub async fn handle_shorten(
        body: web::Json<ShortenRequest>,
        service: web::Data<Arc<MapperService>>,
    ) -> impl Responder {
        let req = body.into_inner();

        let result = service
            .create(CreateMappingRequest {
                target: req.url,
                alias: req.custom_alias,
                ttl_hours: req.ttl_hours,
            })
            .await;

        match result {
            Ok(mapping) => {
                let code = mapping.code.as_deref().unwrap_or_default();
                HttpResponse::Created().json(ShortenResponse {
                    short_url: short_url(code),
                })
            }
            Err(e) => error_response(&e),
        }
    }
}
