use crate::{models::DisplayedImage, orchestrator::GenerationOrchestrator};
use actix_web::{error::InternalError, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateReply {
    pub images: Vec<DisplayedImage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

async fn generate(
    orchestrator: web::Data<GenerationOrchestrator>,
    body: web::Json<GenerateBody>,
) -> HttpResponse {
    let prompt = body.into_inner().prompt;
    if prompt.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorReply {
            error: "Prompt must not be empty.".into(),
        });
    }

    match orchestrator.generate(&prompt).await {
        Ok(images) => {
            let images = images
                .into_iter()
                .map(|image| DisplayedImage::from_generated(image, &prompt))
                .collect();
            HttpResponse::Ok().json(GenerateReply { images })
        }
        Err(e) => HttpResponse::InternalServerError().json(ErrorReply {
            error: e.message().to_string(),
        }),
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed or incomplete bodies get the same `{ "error": ... }` shape as
/// every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let reply = HttpResponse::BadRequest().json(ErrorReply {
            error: format!("Invalid request body: {}", err),
        });
        InternalError::from_response(err, reply).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/generate", web::post().to(generate))
        .route("/health", web::get().to(health));
}

pub async fn run(orchestrator: GenerationOrchestrator, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(orchestrator);

    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
