use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use goal_intake::adapters::ai::{OpenAICompatibleProvider, OpenAIConfig};
use goal_intake::config::AppConfig;
use goal_intake::domain::conversation::{DialogueEngine, DialogueState};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("goal_intake=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let provider_config = OpenAIConfig::from_app_config(&config.ai)
        .context("GOAL_INTAKE__AI__API_KEY is not set")?;
    let provider = OpenAICompatibleProvider::new(provider_config)
        .context("Failed to create extraction provider")?;

    let mut engine = DialogueEngine::new(Arc::new(provider));
    if let Some(date) = config.dialogue.reference_date {
        engine = engine.with_reference_date(date);
    }
    info!(model = %config.ai.model, today = %engine.today(), "Starting conversation");

    println!("--Starting chat demo, please enter your request to get started.--");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = DialogueState::new();

    loop {
        print!("User: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };

        state = engine.advance(&state, &line).await;
        for message in &state.new_messages {
            println!("AI: {}", message.text());
        }

        if state.finished {
            break;
        }
    }

    println!("--Ending conversation--");
    println!("Information collected about the user: {}", state.gathered);

    Ok(())
}
