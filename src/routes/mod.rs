use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod prices;

/// JSON body returned for every failed request.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(prices::show_price_totals)
        .service(prices::upload_prices)
        .service(prices::download_prices);
}

/// Map a service failure to a 400 or 500 JSON response.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let message = err.to_string();
    let body = ErrorBody {
        error: err.kind(),
        message: &message,
    };

    if err.is_client_error() {
        log::warn!("Rejected price request: {err}");
        HttpResponse::BadRequest().json(body)
    } else {
        log::error!("Price request failed: {err}");
        HttpResponse::InternalServerError().json(body)
    }
}
