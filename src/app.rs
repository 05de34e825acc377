use crate::config::RuntimeConfig;
use crate::error::ConfigError;
use crate::model_table::ModelTable;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::{Arc, OnceLock};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeConfig>,
    pub model_table: Arc<ModelTable>,
    pub http: reqwest::Client,
    pub metrics: PrometheusHandle,
}

static METRICS_HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Loads the model table named by `runtime` and builds the shared state.
pub fn load_state(runtime: RuntimeConfig) -> Result<AppState, ConfigError> {
    let model_table = ModelTable::load(&runtime.model_table)?;
    tracing::info!(
        path = %runtime.model_table.display(),
        entries = model_table.len(),
        "loaded model table"
    );
    load_state_with_table(runtime, model_table)
}

pub fn load_state_with_table(
    runtime: RuntimeConfig,
    model_table: ModelTable,
) -> Result<AppState, ConfigError> {
    runtime.validate()?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("model-forward/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ConfigError::HttpClient)?;

    let metrics = init_metrics()?;

    Ok(AppState {
        runtime: Arc::new(runtime),
        model_table: Arc::new(model_table),
        http,
        metrics,
    })
}

fn init_metrics() -> Result<PrometheusHandle, ConfigError> {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .map_err(|err| err.to_string())
        })
        .clone()
        .map_err(ConfigError::Metrics)
}

pub fn build_app(state: AppState) -> Router {
    let metrics_path = state.runtime.metrics_path.clone();
    let max_body_bytes = state.runtime.max_body_bytes;
    let mut router = Router::<AppState>::new()
        .route("/", get(crate::docs::help_page))
        .route(crate::docs::STYLESHEET_PATH, get(crate::docs::stylesheet))
        .route(
            crate::upstream::CHAT_COMPLETIONS_PATH,
            post(crate::handlers::chat_completions),
        );
    if let Some(path) = metrics_path.as_deref() {
        router = router.route(path, get(crate::handlers::metrics));
    }
    router
        .fallback(crate::handlers::not_found)
        .method_not_allowed_fallback(crate::handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
}
