use classroom_ai_service::config::ClassroomConfig;
use classroom_ai_service::startup::Application;
use service_core::config::get_optional_env;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    let otlp_endpoint = get_optional_env("OTLP_ENDPOINT");
    init_tracing("classroom-ai-service", "info", otlp_endpoint.as_deref());

    let config = ClassroomConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
