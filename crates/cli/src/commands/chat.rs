//! `hevychat chat`: single-message or interactive chat against the configured Hevy account.

use std::io::Write;
use std::sync::Arc;

use hevychat_agent::ChatAgent;
use hevychat_config::AppConfig;
use hevychat_core::fitness::{FitnessConnector, FitnessData};
use hevychat_core::message::Message;
use hevychat_core::tool::ToolContext;
use hevychat_hevy::HevyConnector;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tracing::debug;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = match hevychat_providers::build_from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            print_missing_key("ANTHROPIC_API_KEY", "anthropic_api_key = \"sk-ant-...\"");
            return Err(e.to_string().into());
        }
    };

    let Some(hevy_key) = config.hevy.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        print_missing_key("HEVY_API_KEY", "[hevy]\n    api_key = \"...\"");
        return Err("No Hevy API key found. See above for setup instructions.".into());
    };
    let fitness = HevyConnector::from_config(&config.hevy).connect(hevy_key)?;

    let tools = Arc::new(hevychat_tools::default_registry());
    let agent = Arc::new(ChatAgent::from_config(provider, tools, &config));
    debug!(model = %agent.model(), hevy = %config.hevy.base_url, "Chat agent ready");

    if let Some(msg) = message {
        reply(&agent, &fitness, vec![Message::user(msg)]).await?;
        return Ok(());
    }

    println!();
    println!("  HevyChat: Interactive Mode");
    println!();
    println!("  Model:  {}", agent.model());
    println!("  Tools:  {}", hevychat_tools::default_registry().names().join(", "));
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        history.push(Message::user(line));
        println!();
        match reply(&agent, &fitness, history.clone()).await {
            Ok(text) => history.push(Message::assistant(text)),
            Err(e) => {
                // Keep the transcript alternating
                history.pop();
                eprintln!("  [Error] {e}");
            }
        }
        println!();

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 💪");
    println!();
    Ok(())
}

/// Stream one assistant reply to stdout and return its full text.
async fn reply(
    agent: &Arc<ChatAgent>,
    fitness: &Arc<dyn FitnessData>,
    history: Vec<Message>,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut output = agent.start(ToolContext::new(Arc::clone(fitness)), history);
    let mut text = String::new();
    let mut stdout = std::io::stdout();

    while let Some(item) = output.next().await {
        let chunk = item?;
        let piece = String::from_utf8_lossy(&chunk);
        write!(stdout, "{piece}")?;
        stdout.flush()?;
        text.push_str(&piece);
    }
    writeln!(stdout)?;
    Ok(text)
}

fn print_missing_key(var: &str, toml_line: &str) {
    eprintln!();
    eprintln!("  ERROR: {var} is not configured!");
    eprintln!();
    eprintln!("  Set the environment variable:");
    eprintln!("    export {var}=...");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!("    {toml_line}");
    eprintln!();
}
