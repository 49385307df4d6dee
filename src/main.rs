use fuel_my_dream::app;
use fuel_my_dream::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let port = config.port;

    eprintln!("Fuel My Dream v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Network: {}", config.network.required_chain_name());
    eprintln!("   IPFS gateway: {}", config.ipfs_gateway);
    eprintln!("   API: http://0.0.0.0:{}/api/opportunities", port);
    eprintln!("   Pages: http://0.0.0.0:{}/pages/\n", port);

    app::serve(config).await?;

    Ok(())
}
