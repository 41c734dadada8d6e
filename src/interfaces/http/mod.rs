use actix_cors::Cors;
use actix_multipart::form::bytes::Bytes as UploadBytes;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use tracing::{error, info};

use crate::application::analyze;
use crate::domain::analysis::ErrorBody;
use crate::infrastructure::config::Settings;

const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, MultipartForm)]
struct UploadForm {
    file: Option<UploadBytes>,
}

#[post("/analyze/")]
async fn analyze_csv(MultipartForm(form): MultipartForm<UploadForm>) -> impl Responder {
    let Some(file) = form.file else {
        return HttpResponse::BadRequest().json(ErrorBody::new("No file provided"));
    };

    info!(
        bytes = file.data.len(),
        file_name = file.file_name.as_deref().unwrap_or("<unnamed>"),
        "Received CSV upload"
    );

    match analyze(&file.data) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) if e.is_client_fault() => {
            info!("Rejected upload: {}", e);
            HttpResponse::BadRequest().json(ErrorBody::new(e.to_string()))
        }
        Err(e) => {
            error!("Failed to process upload: {}", e);
            HttpResponse::InternalServerError().json(ErrorBody::new(e.to_string()))
        }
    }
}

#[get("/health/")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn start_server(settings: &Settings) -> std::io::Result<Server> {
    let bind_addr = settings.bind_addr.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(
                MultipartFormConfig::default()
                    .memory_limit(UPLOAD_LIMIT_BYTES)
                    .total_limit(UPLOAD_LIMIT_BYTES),
            )
            .service(web::scope("/api").service(analyze_csv).service(health))
    })
    .bind(bind_addr.as_str())?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    const BOUNDARY: &str = "----equipment-test-boundary";
    const HEADER: &str = "equipment_name,equipment_type,flowrate,pressure,temperature";

    fn multipart_body(field_name: &str, content: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"data.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        )
        .into_bytes()
    }

    async fn post_upload(field_name: &str, content: &str) -> (u16, serde_json::Value) {
        let app = test::init_service(
            App::new().service(web::scope("/api").service(analyze_csv).service(health)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/analyze/")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(field_name, content))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_valid_upload_returns_statistics() {
        let (status, body) = post_upload(
            "file",
            &format!("{HEADER}\nPump,Pump,10,5,100\nPump,Pump,20,5,110\nReactor,Reactor,0,50,300"),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["total_equipment"], 3);
        assert_eq!(body["average_flowrate"], 10.0);
        assert_eq!(body["average_pressure"], 20.0);
        assert_eq!(body["average_temperature"], 170.0);
        assert_eq!(body["equipment_by_type"]["Pump"], 2);
        assert_eq!(body["equipment_by_type"]["Reactor"], 1);
    }

    #[actix_web::test]
    async fn test_missing_file_part_is_bad_request() {
        let (status, body) = post_upload("not_file", "irrelevant").await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "No file provided");
    }

    #[actix_web::test]
    async fn test_missing_column_is_bad_request_naming_it() {
        let (status, body) = post_upload(
            "file",
            "equipment_name,equipment_type,pressure,temperature\nP-1,Pump,5,100",
        )
        .await;

        assert_eq!(status, 400);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("flowrate"));
    }

    #[actix_web::test]
    async fn test_header_only_file_is_bad_request() {
        let (status, body) = post_upload("file", HEADER).await;

        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[actix_web::test]
    async fn test_absent_average_serializes_as_null() {
        let (status, body) = post_upload("file", &format!("{HEADER}\nP-1,Pump,n/a,5,100")).await;

        assert_eq!(status, 200);
        assert!(body["average_flowrate"].is_null());
        assert_eq!(body["average_pressure"], 5.0);
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(App::new().service(web::scope("/api").service(health))).await;
        let req = test::TestRequest::get().uri("/api/health/").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }
}
