use lambda_runtime::{Error, run, service_fn};
use mailcast::api::{ApiState, function_handler};
use mailcast::core::config::AppConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    mailcast::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let state = ApiState::from_config(&config).map_err(|e| {
        error!("Startup failed: {}", e);
        Error::from(e)
    })?;
    info!(provider = %config.llm_provider, "API ready");

    let state = &state;
    run(service_fn(move |event| async move {
        function_handler(state, event).await
    }))
    .await
}
