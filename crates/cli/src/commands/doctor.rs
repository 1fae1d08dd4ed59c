//! `hevychat doctor`: diagnose configuration.

use hevychat_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 HevyChat Doctor: Configuration Diagnostics");
    println!("=============================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ℹ️  No config file, using defaults and environment");
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid (model: {})", config.model);

            if config.has_anthropic_key() {
                println!("  ✅ Anthropic API key configured");
            } else {
                println!("  ❌ No Anthropic API key: set ANTHROPIC_API_KEY");
                issues += 1;
            }

            if config.has_hevy_key() {
                println!("  ✅ Fallback Hevy API key configured");
            } else {
                println!("  ⚠️  No fallback Hevy API key: callers must store their own");
                issues += 1;
            }

            println!("  ✅ Hevy API: {}", config.hevy.base_url);
            println!("  ✅ Gateway: {}:{}", config.gateway.host, config.gateway.port);
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
