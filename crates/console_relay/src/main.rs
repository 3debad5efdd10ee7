use console_logging::{console_info, LogOptions};
use console_relay::{router, RelayConfig, RelayState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut log_options = LogOptions::terminal();
    if let Ok(path) = std::env::var("RELAY_LOG_FILE") {
        log_options = log_options.with_file(path);
    }
    console_logging::initialize(log_options);

    let config = RelayConfig::from_env();
    let state = RelayState::new(&config.backend_url)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    console_info!(
        "relay listening on {} forwarding to {}",
        config.bind_addr,
        config.backend_url
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}
