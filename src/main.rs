//! Mitigation Intake server entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use mitigation_intake::adapters::ai::{
    AnthropicConfig, AnthropicProvider, GenerationSettings, StatementGenerator,
};
use mitigation_intake::adapters::auth::{JwtConfig, JwtSessionValidator};
use mitigation_intake::adapters::http::{app_router, AuthState, ChatHandlers};
use mitigation_intake::adapters::postgres::PostgresIntakeRecordRepository;
use mitigation_intake::adapters::retrieval::{
    InMemoryRetrievalClient, PineconeConfig, PineconeRetrievalClient,
};
use mitigation_intake::adapters::storage::{
    InMemoryIntakeRecordRepository, InMemorySessionStore, RedisSessionStore,
};
use mitigation_intake::application::handlers::ConversationOrchestrator;
use mitigation_intake::config::{AppConfig, LogFormat, RetrievalProvider, ServerConfig};
use mitigation_intake::domain::intake::ConversationClassifier;
use mitigation_intake::ports::{IntakeRecordRepository, RetrievalClient, SessionStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting mitigation intake server"
    );

    let sessions = build_session_store(&config).await?;
    let records = build_record_repository(&config).await?;
    let retrieval = build_retrieval(&config)?;

    let api_key = config.ai.anthropic_api_key.clone().unwrap_or_default();
    let provider = AnthropicProvider::new(
        AnthropicConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?;
    let generator = StatementGenerator::new(
        Arc::new(provider),
        GenerationSettings {
            max_tokens: config.ai.max_tokens,
            temperature: config.ai.temperature,
        },
    );

    let bank = config.intake.question_bank()?;
    tracing::info!(
        questions = bank.len(),
        policy = ?config.intake.short_answer_policy,
        "Question bank loaded"
    );
    let classifier = ConversationClassifier::new(bank, config.intake.short_answer_policy);

    let orchestrator = ConversationOrchestrator::new(
        Arc::new(classifier),
        sessions.clone(),
        records.clone(),
        retrieval,
        Arc::new(generator),
    )
    .with_top_k(config.retrieval.top_k);

    let mut jwt = JwtConfig::new(config.auth.jwt_secret.clone());
    if let Some(issuer) = &config.auth.issuer {
        jwt = jwt.with_issuer(issuer.clone());
    }
    let validator: AuthState = Arc::new(JwtSessionValidator::new(jwt));

    let handlers = ChatHandlers::from_stores(Arc::new(orchestrator), sessions, records);
    let app = app_router(handlers, validator, &config.server);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let fmt_layer = match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn build_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, BoxError> {
    match &config.redis {
        Some(redis_config) => {
            let client = redis::Client::open(redis_config.url.as_str())?;
            let conn = client.get_multiplexed_tokio_connection().await?;
            tracing::info!(ttl_secs = redis_config.session_ttl_secs, "Using Redis session store");
            Ok(Arc::new(RedisSessionStore::new(conn, redis_config.session_ttl_secs)))
        }
        None => {
            tracing::warn!("No Redis configured; sessions are kept in memory");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
    }
}

async fn build_record_repository(
    config: &AppConfig,
) -> Result<Arc<dyn IntakeRecordRepository>, BoxError> {
    match &config.database {
        Some(db) => {
            let pool = db.pool_options().connect(&db.url).await?;
            if db.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
            }
            Ok(Arc::new(PostgresIntakeRecordRepository::new(pool)))
        }
        None => {
            tracing::warn!("No database configured; records are kept in memory");
            Ok(Arc::new(InMemoryIntakeRecordRepository::new()))
        }
    }
}

fn build_retrieval(config: &AppConfig) -> Result<Arc<dyn RetrievalClient>, BoxError> {
    let retrieval = &config.retrieval;
    match retrieval.provider {
        RetrievalProvider::Pinecone => {
            let pinecone = PineconeConfig::new(
                retrieval.pinecone_api_key.clone().unwrap_or_default(),
                retrieval.pinecone_index_host.clone().unwrap_or_default(),
            )
            .with_dimensions(retrieval.embedding_dimensions)
            .with_timeout(retrieval.timeout());
            Ok(Arc::new(PineconeRetrievalClient::new(pinecone)?))
        }
        RetrievalProvider::InMemory => {
            let client = match &retrieval.corpus_path {
                Some(path) => InMemoryRetrievalClient::from_yaml_file(path)?,
                None => InMemoryRetrievalClient::default(),
            };
            tracing::info!(cases = client.len(), "Using in-memory retrieval");
            Ok(Arc::new(client))
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
