use std::sync::Arc;

use clap::Parser;
use profile_relay::server::start_api_server;
use profile_relay::utils::{logger, validation::Validate};
use profile_relay::{build_service, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_format);
    tracing::info!("Starting profile-relay");

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Relay config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let service = Arc::new(build_service(&config)?);
    start_api_server(&config.server.bind_addr(), service).await?;

    Ok(())
}
