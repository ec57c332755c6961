use promptforge::{logger, Config, GenerationOrchestrator, NebiusImageClient};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init()?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    if let Err(e) = config.validate() {
        log::error!("❌ {}", e);
        return Err(e.into());
    }

    let known = NebiusImageClient::supported_models()
        .into_iter()
        .any(|(id, _, _)| id == config.synthesis.model);
    if !known {
        log::warn!(
            "Model {} is not in the known model list, sending it anyway",
            config.synthesis.model
        );
    }

    let orchestrator = GenerationOrchestrator::from_config(&config)?;
    let port = config.port_or_default();

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), port);
    promptforge::server::run(orchestrator, port).await?;

    Ok(())
}
