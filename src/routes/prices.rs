use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::forms::import_export::UploadPricesForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::import_export::{
    export_prices as export_prices_service, import_prices as import_prices_service,
    show_price_totals as show_price_totals_service,
};

const DEFAULT_ARCHIVE_TYPE: &str = "zip";

/// `?type=zip|tar`; absent or blank means zip.
#[derive(Deserialize)]
pub struct ArchiveQueryParams {
    #[serde(rename = "type")]
    pub archive_type: Option<String>,
}

impl ArchiveQueryParams {
    pub fn archive_type(&self) -> &str {
        match self.archive_type.as_deref() {
            Some(value) if !value.trim().is_empty() => value,
            _ => DEFAULT_ARCHIVE_TYPE,
        }
    }
}

#[post("/api/v0/prices")]
pub async fn upload_prices(
    params: web::Query<ArchiveQueryParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(mut form): MultipartForm<UploadPricesForm>,
) -> impl Responder {
    let archive = match form.read_archive() {
        Ok(archive) => archive,
        Err(e) => return error_response(&ServiceError::ArchiveRead(e.to_string())),
    };

    match import_prices_service(
        repo.get_ref(),
        &archive,
        params.archive_type(),
        server_config.record_schema,
    ) {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(err) => error_response(&err),
    }
}

#[get("/api/v0/prices")]
pub async fn download_prices(
    params: web::Query<ArchiveQueryParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match export_prices_service(
        repo.get_ref(),
        params.archive_type(),
        server_config.record_schema,
    ) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(err) => error_response(&err),
    }
}

#[get("/api/v0/prices/totals")]
pub async fn show_price_totals(repo: web::Data<DieselRepository>) -> impl Responder {
    match show_price_totals_service(repo.get_ref()) {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(err) => error_response(&err),
    }
}
