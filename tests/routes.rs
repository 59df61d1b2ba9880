use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use pushkind_prices::archive::{self, ArchiveFormat};
use pushkind_prices::domain::price::RecordSchema;
use pushkind_prices::models::config::ServerConfig;
use pushkind_prices::repository::DieselRepository;
use pushkind_prices::routes;
use serde_json::Value;

mod common;

const BOUNDARY: &str = "----pricesboundary";

fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        record_schema: RecordSchema::Full,
    }
}

fn multipart_body(file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, file_name: &str, contents: &[u8]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(file_name, contents))
}

#[actix_web::test]
async fn upload_then_download_prices() {
    let test_db = common::TestDb::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DieselRepository::new(test_db.pool())))
            .app_data(web::Data::new(server_config()))
            .configure(routes::configure),
    )
    .await;

    let data = archive::pack(
        "prices.csv",
        b"1,Widget,Tools,9.99,2024-01-15\n2,Gadget,Tools,19.99,2024-02-20\n3,Gizmo,Toys,5.00,\n",
        ArchiveFormat::Zip,
    )
    .expect("should pack archive");

    let resp = test::call_service(
        &app,
        upload_request("/api/v0/prices", "prices.zip", &data).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let totals: Value = test::read_body_json(resp).await;
    assert_eq!(totals["total_items"], 3);
    assert_eq!(totals["total_categories"], 2);
    let total_price = totals["total_price"].as_f64().expect("numeric total");
    assert!((total_price - 34.98).abs() < 1e-9);

    let req = test::TestRequest::get()
        .uri("/api/v0/prices?type=tar")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/x-tar"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"data.tar\""
    );
    let bytes = test::read_body(resp).await;
    let entries = archive::extract(&bytes, ArchiveFormat::Tar).expect("should extract");
    assert_eq!(entries[0].name, "data.csv");
    assert_eq!(entries[0].text.lines().count(), 4);

    let req = test::TestRequest::get()
        .uri("/api/v0/prices/totals")
        .to_request();
    let totals: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(totals["total_items"], 3);
}

#[actix_web::test]
async fn malformed_upload_is_a_bad_request() {
    let test_db = common::TestDb::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DieselRepository::new(test_db.pool())))
            .app_data(web::Data::new(server_config()))
            .configure(routes::configure),
    )
    .await;

    let data = archive::pack("prices.csv", b"1,Widget,Tools\n", ArchiveFormat::Tar)
        .expect("should pack archive");

    let resp = test::call_service(
        &app,
        upload_request("/api/v0/prices?type=tar", "prices.tar", &data).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "malformed_line");

    let req = test::TestRequest::get()
        .uri("/api/v0/prices/totals")
        .to_request();
    let totals: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(totals["total_items"], 0);
}

#[actix_web::test]
async fn unsupported_download_format_is_a_bad_request() {
    let test_db = common::TestDb::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DieselRepository::new(test_db.pool())))
            .app_data(web::Data::new(server_config()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v0/prices?type=pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unsupported_format");
    assert_eq!(body["message"], "unsupported archive format: pdf");
}

#[actix_web::test]
async fn invalid_field_values_are_bad_requests() {
    let test_db = common::TestDb::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DieselRepository::new(test_db.pool())))
            .app_data(web::Data::new(server_config()))
            .configure(routes::configure),
    )
    .await;

    let cases = [
        ("1,a,b,abc,2024-01-01\n", "invalid_price"),
        ("1,a,b,1.0,15/01/2024\n", "invalid_date"),
        ("-4,a,b,1.0,2024-01-01\n", "invalid_id"),
    ];

    for (body, kind) in cases {
        let data = archive::pack(
            "prices.csv",
            format!("2,ok,Tools,1.00,2024-01-01\n{body}").as_bytes(),
            ArchiveFormat::Zip,
        )
        .expect("should pack archive");

        let resp = test::call_service(
            &app,
            upload_request("/api/v0/prices?type=zip", "prices.zip", &data).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{kind}");
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error"], kind);

        let req = test::TestRequest::get()
            .uri("/api/v0/prices/totals")
            .to_request();
        let totals: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(totals["total_items"], 0, "{kind}");
    }
}

#[actix_web::test]
async fn unsupported_format_is_reported_as_sent() {
    let test_db = common::TestDb::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DieselRepository::new(test_db.pool())))
            .app_data(web::Data::new(server_config()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v0/prices?type=PDF")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "unsupported archive format: PDF");
}
