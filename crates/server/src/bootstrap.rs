use std::sync::Arc;

use parley_agent::{ActionDependencies, ActionRuntime, AzureOpenAiClient, LlmError};
use parley_core::config::AppConfig;
use parley_core::content::ContentLookup;
use parley_db::{connect_with_settings, migrations, open_connection, DbPool, SqlSubmissionStore};
use sqlx::Connection;
use thiserror::Error;
use tracing::{info, warn};

pub struct Application {
    pub config: AppConfig,
    pub profile_pool: DbPool,
    pub runtime: Arc<ActionRuntime>,
    pub llm_configured: bool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client setup failed: {0}")]
    Llm(#[source] LlmError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let profile_pool = connect_with_settings(
        &config.profile.url,
        config.profile.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "profile store connection established"
    );

    let mut conn = open_connection(&config.database.url, config.database.timeout_secs)
        .await
        .map_err(BootstrapError::DatabaseConnect)?;
    let migrated = migrations::run_pending_on(&mut conn).await;
    conn.close().await.map_err(BootstrapError::DatabaseConnect)?;
    migrated.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "submission table migrations applied"
    );

    let llm = AzureOpenAiClient::from_config(&config.llm).map_err(BootstrapError::Llm)?;
    let llm_configured = llm.is_configured();
    if !llm_configured {
        warn!(
            event_name = "system.bootstrap.llm_unconfigured",
            correlation_id = "bootstrap",
            "llm endpoint or api key missing; model-assisted steps will apologise"
        );
    }

    let runtime = ActionRuntime::new(ActionDependencies {
        llm: Arc::new(llm),
        store: Arc::new(SqlSubmissionStore::new(
            config.database.url.clone(),
            config.database.timeout_secs,
        )),
        content: ContentLookup::new(
            config.content.pages_path.clone(),
            config.content.help_path.clone(),
        ),
    });

    Ok(Application { config, profile_pool, runtime: Arc::new(runtime), llm_configured })
}
