use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use saju_server::config::AppConfig;
use saju_server::domain::fortune::{dto, handler};
use saju_server::{create_app, error, shutdown};

#[derive(OpenApi)]
#[openapi(
    paths(handler::health, handler::fortune),
    components(schemas(
        dto::FortuneRequest,
        dto::FortuneResponse,
        dto::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "Saju", description = "사주 해석 API")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; POST /saju will fail until configured");
    }

    let app = create_app(&config)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %addr, "Failed to bind server address");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %addr, "Starting saju server");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shut down");
}
