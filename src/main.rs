mod cli;
mod telemetry;

use ai_llm_service::{OpenRouterService, config_openrouter};
use anyhow::Context;
use clap::Parser;
use quality_agent::QualityAgent;
use tracing::{info, warn};

use crate::cli::{ChatMode, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file; a missing file is fine.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Chat { structured: false });

    telemetry::init(match command {
        Command::Serve { .. } => "info",
        _ => "warn",
    });

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env file could not be loaded");
        }
    }

    let mut cfg = config_openrouter().context("OPENROUTER_API_KEY must be set (environment or .env)")?;
    if let Some(max_tokens) = cli.max_tokens {
        cfg.max_tokens = max_tokens;
    }
    let agent = QualityAgent::new(OpenRouterService::new(cfg)?);
    info!(model = %agent.model(), "quality agent ready");

    let mut stdout = std::io::stdout();
    match command {
        Command::Chat { structured } => {
            println!("\nISO 9001 Quality Assistant ({})\n", agent.model());
            let mode = if structured {
                ChatMode::Structured
            } else {
                ChatMode::Raw
            };
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::chat_loop(&agent, mode, stdin, &mut stdout).await?;
        }
        Command::Ask { question, context } => {
            let question = question.join(" ");
            let fut = agent.ask(&question, context.as_deref());
            cli::one_shot("Quality question", fut, &mut stdout).await?;
        }
        Command::Capa { issue } => {
            let issue = issue.join(" ");
            cli::one_shot("CAPA analysis", agent.capa(&issue), &mut stdout).await?;
        }
        Command::Audit { finding } => {
            let finding = finding.join(" ");
            cli::one_shot("Audit finding", agent.audit(&finding), &mut stdout).await?;
        }
        Command::Serve { addr } => {
            api::start(api::AppState::new(agent), &addr).await?;
        }
    }

    Ok(())
}
