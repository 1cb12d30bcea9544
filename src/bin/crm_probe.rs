use clap::Parser;
use profile_relay::adapters::HttpCrmClient;
use profile_relay::core::token::TokenProvider;
use profile_relay::core::CrmClient;
use profile_relay::utils::{logger, validation::Validate};
use profile_relay::CliConfig;

/// 部署前檢查 CRM 憑證與 tenant/location 設定
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_logger(cli.verbose, cli.log_format);

    let config = cli.load()?;
    config.validate()?;
    println!("✅ 配置驗證通過");
    println!(
        "📋 Tenant {} / Location {} @ {}",
        config.crm.tenant_id, config.crm.location_id, config.crm.api_url
    );

    let crm = HttpCrmClient::new(config.crm.clone())?;
    let tokens = TokenProvider::new();

    let token = tokens.get_token(&crm).await?;
    if let Some(cached) = tokens.cached().await {
        println!("🔑 Token acquired, expires at {}", cached.expires_at);
    }

    let clients = crm.list_clients(&token).await?;
    println!("👥 {} clients visible", clients.len());

    Ok(())
}
