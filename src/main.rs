use clap::Parser;
use model_forward::config::RuntimeConfig;
use model_forward::error::ConfigError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,model_forward=debug")),
        )
        .json()
        .init();

    let runtime = RuntimeConfig::parse();
    if let Err(err) = run(runtime).await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(runtime: RuntimeConfig) -> Result<(), ConfigError> {
    let state = model_forward::app::load_state(runtime)?;
    let app = model_forward::app::build_app(state.clone());
    let addr = state.runtime.listen_addr();
    let listener = tokio::net::TcpListener::bind((state.runtime.host.as_str(), state.runtime.port))
        .await
        .map_err(|source| ConfigError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(
        addr = %addr,
        api_base = %state.runtime.api_base,
        "listening"
    );
    axum::serve(listener, app).await.map_err(ConfigError::Serve)?;
    Ok(())
}
