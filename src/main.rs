use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use http::HeaderValue;
use secrecy::ExposeSecret;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_assistant::adapters::ai::{
    AssistantSettings, LlmAssistant, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use cv_assistant::adapters::document::TemplateCvRenderer;
use cv_assistant::adapters::http::{cv_routes, CvHandlers};
use cv_assistant::adapters::storage::{FileSessionStore, InMemorySessionStore};
use cv_assistant::config::{
    AiConfig, AiProvider, AppConfig, LogFormat, ServerConfig, StorageBackend, StorageConfig,
};
use cv_assistant::domain::conversation::ConversationEngine;
use cv_assistant::ports::{AIProvider, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.server);
    info!("Starting Niajiri CV assistant v{}", env!("CARGO_PKG_VERSION"));

    let provider = build_provider(&config.ai)?;
    let provider_info = provider.provider_info();
    info!(provider = %provider_info.name, model = %provider_info.model, "language model ready");

    let assistant = Arc::new(LlmAssistant::new(provider).with_settings(AssistantSettings {
        extraction_temperature: config.ai.extraction_temperature,
        enhance_temperature: config.ai.enhance_temperature,
        max_tokens: config.ai.max_tokens,
    }));

    let store = build_store(&config.storage).await?;
    let engine = Arc::new(ConversationEngine::new(config.flow.engine_config()));

    let handlers = CvHandlers::from_ports(
        store,
        assistant.clone(),
        assistant,
        Arc::new(TemplateCvRenderer::new()),
        engine,
    )
    .with_default_template(config.flow.template());

    let app = Router::new()
        .nest("/api/sessions", cv_routes(handlers))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// RUST_LOG wins over the configured level when set.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("cv_assistant={0},tower_http={0}", server.log_level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>> {
    match ai.provider {
        AiProvider::Mock => {
            warn!("using mock language model; natural-language input will not be understood");
            Ok(Arc::new(MockAIProvider::new()))
        }
        AiProvider::OpenAI => {
            let api_key = ai
                .openai_api_key
                .as_ref()
                .context("OpenAI API key is not configured")?;
            let openai = OpenAIConfig::new(api_key.expose_secret().clone())
                .with_model(ai.model.clone())
                .with_base_url(ai.base_url.clone())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Ok(Arc::new(OpenAIProvider::new(openai)?))
        }
    }
}

async fn build_store(storage: &StorageConfig) -> Result<Arc<dyn SessionStore>> {
    match storage.backend {
        StorageBackend::Memory => {
            warn!("sessions are kept in memory and will not survive a restart");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
        StorageBackend::File => {
            tokio::fs::create_dir_all(&storage.sessions_dir)
                .await
                .with_context(|| format!("cannot create {}", storage.sessions_dir.display()))?;
            info!(dir = %storage.sessions_dir.display(), "file session store ready");
            Ok(Arc::new(FileSessionStore::new(&storage.sessions_dir)))
        }
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}
