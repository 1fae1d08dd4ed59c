//! `hevychat serve`: start the HTTP gateway.

use hevychat_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🏋️ HevyChat Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.model);
    println!(
        "   Chat: {}",
        if config.has_anthropic_key() { "enabled" } else { "disabled (no ANTHROPIC_API_KEY)" }
    );
    println!(
        "   Fallback Hevy key: {}",
        if config.has_hevy_key() { "configured" } else { "none" }
    );

    hevychat_gateway::start(config).await?;

    Ok(())
}
