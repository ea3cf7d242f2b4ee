use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use tracing::{debug, instrument};

use crate::errors::ShortmapError;
use crate::services::MapperService;

pub struct RedirectService;

impl RedirectService {
    #[instrument(skip(service), fields(code = %path))]
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<Arc<MapperService>>,
    ) -> impl Responder {
        let code = path.into_inner();

        match service.resolve(&code).await {
            Ok(target) => HttpResponse::TemporaryRedirect()
                .insert_header(("Location", target))
                .finish(),
            // Expired and unknown codes are the same 404 on purpose
            Err(ShortmapError::NotFound(_)) => {
                debug!("Redirect target not found: {}", code);
                Self::not_found_response()
            }
            Err(e) => super::error_response(&e),
        }
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}
