//! lead-intake server binary.
//!
//! Reads configuration from `LEAD_INTAKE__*` environment variables (and a
//! `.env` file when present), wires the adapters, and serves the intake API.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use lead_intake::adapters::ai::{OpenAIConfig, OpenAIProvider, UnconfiguredProvider};
use lead_intake::adapters::http::{apply_middleware, intake_router, IntakeAppState};
use lead_intake::adapters::memory::InMemoryLeadStore;
use lead_intake::adapters::postgres::{PostgresActivityLog, PostgresLeadStore};
use lead_intake::application::handlers::intake::{
    ActivityRecorder, DialogueTurnEngine, LeadCommitter,
};
use lead_intake::config::{AiConfig, AppConfig, DatabaseConfig, LogFormat, ServerConfig};
use lead_intake::ports::{AIProvider, LeadStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let (lead_store, activity) = build_stores(&config.database).await?;
    let provider = build_provider(&config.ai)?;
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "completion engine ready");

    let committer = LeadCommitter::new(lead_store)
        .with_source(config.agent.lead_source.clone())
        .with_appointment_minutes(config.agent.appointment_duration_minutes);
    let engine = DialogueTurnEngine::new(provider, committer)
        .with_policy(config.agent.scheduling_policy)
        .with_temperature(config.ai.temperature);

    let state = IntakeAppState::new(Arc::new(engine), activity)
        .with_greeting(&config.agent.greeting)
        .with_max_message_length(config.agent.max_message_length)
        .with_step_timeout(config.server.request_timeout());

    let app = apply_middleware(intake_router(state), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        policy = ?config.agent.scheduling_policy,
        "lead-intake listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn build_stores(
    database: &DatabaseConfig,
) -> Result<(Arc<dyn LeadStore>, ActivityRecorder), Box<dyn Error>> {
    let Some(url) = database.url() else {
        tracing::warn!("no database configured, leads are kept in memory and activity logging is off");
        return Ok((Arc::new(InMemoryLeadStore::new()), ActivityRecorder::disabled()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(url)
        .await?;
    tracing::info!("Connected to database");

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    Ok((
        Arc::new(PostgresLeadStore::new(pool.clone())),
        ActivityRecorder::new(Arc::new(PostgresActivityLog::new(pool))),
    ))
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>, Box<dyn Error>> {
    let Some(key) = ai.openai_api_key() else {
        tracing::warn!("no completion engine key configured, turns will fail");
        return Ok(Arc::new(UnconfiguredProvider::default()));
    };

    let provider = OpenAIProvider::new(
        OpenAIConfig::new(key)
            .with_model(ai.model.clone())
            .with_base_url(ai.base_url.clone())
            .with_timeout(ai.timeout()),
    )?;
    Ok(Arc::new(provider))
}
