use mediverse::api::HttpApi;
use mediverse::config::{self, ApiConfig};
use mediverse::preferences::Preferences;
use mediverse::ui::{ApiHandle, App};
use std::sync::Arc;

fn init_tracing() {
    let level = config::log_level(|key| std::env::var(key).ok());
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    config::load_dotenv();
    init_tracing();

    let api_config = ApiConfig::from_env();
    let api = match HttpApi::new(&api_config) {
        Ok(api) => api,
        Err(err) => {
            tracing::error!(error = %err, "failed to build the analysis client");
            std::process::exit(1);
        }
    };
    tracing::info!(
        base_url = %api_config.base_url,
        timeout_secs = api_config.request_timeout.map(|t| t.as_secs()),
        "starting Mediverse"
    );

    dioxus::LaunchBuilder::new()
        .with_context(ApiHandle(Arc::new(api)))
        .with_context(Preferences::load())
        .launch(App);
}
