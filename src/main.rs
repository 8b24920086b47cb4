//! mini-agent - terminal entry point
//!
//! With arguments, they are joined into a single one-shot prompt.
//! Without arguments, prompts are read from standard input until `exit`.

use mini_agent::{agent::Agent, config::Config, session::Session};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the conversation.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_agent=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, workspace={}",
        config.model,
        config.workspace_path.display()
    );

    let agent = Agent::new(&config)?;
    let mut session = Session::new(agent, std::io::stdout());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        session
            .run_interactive(BufReader::new(tokio::io::stdin()))
            .await?;
    } else {
        session.run_once(&args.join(" ")).await?;
    }

    Ok(())
}
