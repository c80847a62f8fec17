use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use ai_llm_service::is_error_answer;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use quality_agent::{QualityAgent, QualityResponse};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const PROMPT: &str = "Ask your question (or type 'exit'): ";

#[derive(Debug, Parser)]
#[command(name = "iso-assistant", version, about = "ISO 9001 quality assistant backed by OpenRouter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Completion token budget (defaults to 300).
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive question loop (the default).
    Chat {
        /// Print the six template sections instead of the raw answer.
        #[arg(long)]
        structured: bool,
    },
    /// Ask a single question and print the structured answer.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Extra context appended to the question.
        #[arg(long)]
        context: Option<String>,
    },
    /// Corrective and preventive action analysis for a quality issue.
    Capa {
        #[arg(required = true, num_args = 1..)]
        issue: Vec<String>,
    },
    /// Evaluate an audit finding.
    Audit {
        #[arg(required = true, num_args = 1..)]
        finding: Vec<String>,
    },
    /// Run the HTTP API and chat page.
    Serve {
        #[arg(long, env = "API_ADDRESS", default_value = api::DEFAULT_ADDRESS)]
        addr: String,
    },
}

/// How the chat loop prints answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Raw,
    Structured,
}

/// Spinner on stderr while waiting for the model; hidden off-terminal.
struct Thinking(ProgressBar);

impl Thinking {
    fn start() -> Self {
        if !io::stderr().is_terminal() {
            return Self(ProgressBar::hidden());
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style.tick_chars("-\\|/ "));
        }
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(80));
        Self(pb)
    }

    fn stop(self) {
        self.0.finish_and_clear();
    }
}

/// Reads questions from `input` until `exit` or EOF.
pub async fn chat_loop<R, W>(
    agent: &QualityAgent,
    mode: ChatMode,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        debug!(question_len = question.len(), ?mode, "question received");
        let thinking = Thinking::start();
        match mode {
            ChatMode::Raw => {
                let answer = agent.ask_raw(question, None).await;
                thinking.stop();
                print_raw(out, &answer)?;
            }
            ChatMode::Structured => {
                let response = agent.ask(question, None).await;
                thinking.stop();
                print_structured(out, &response)?;
            }
        }
    }

    writeln!(out, "Goodbye!")?;
    Ok(())
}

/// One structured answer, shown with a spinner.
pub async fn one_shot<F, W>(title: &str, fut: F, out: &mut W) -> anyhow::Result<()>
where
    F: std::future::Future<Output = QualityResponse>,
    W: Write,
{
    writeln!(out, "{}", title.bold())?;
    let thinking = Thinking::start();
    let response = fut.await;
    thinking.stop();
    print_structured(out, &response)
}

fn print_raw<W: Write>(out: &mut W, answer: &str) -> anyhow::Result<()> {
    writeln!(out, "\n{}\n", "Answer:".bold())?;
    if is_error_answer(answer) {
        writeln!(out, "{}", answer.red())?;
    } else {
        writeln!(out, "{answer}")?;
    }
    writeln!(out, "\n{}\n", "-".repeat(60))?;
    Ok(())
}

fn print_structured<W: Write>(out: &mut W, response: &QualityResponse) -> anyhow::Result<()> {
    writeln!(out, "\n{response}\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{LlmModelConfig, OpenRouterService};
    use mockito::{Server, ServerGuard};

    fn agent(server: &ServerGuard) -> QualityAgent {
        let cfg = LlmModelConfig {
            model: "test/model".into(),
            endpoint: server.url(),
            api_key: "k".into(),
            max_tokens: 300,
            temperature: 0.2,
            timeout_secs: 5,
            referer: None,
            title: None,
        };
        QualityAgent::new(OpenRouterService::new(cfg).unwrap())
    }

    fn completion(content: &str) -> String {
        format!(r#"{{"choices":[{{"message":{{"content":"{content}"}}}}]}}"#)
    }

    #[tokio::test]
    async fn exit_stops_without_calling_the_model() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let mut out = Vec::new();
        chat_loop(&agent(&server), ChatMode::Raw, &b"  ExIt  \n"[..], &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(PROMPT));
        assert!(text.ends_with("Goodbye!\n"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn each_question_is_one_call_and_blank_lines_are_skipped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("Clause 8.5.1 covers production control."))
            .expect(2)
            .create_async()
            .await;

        let input = b"What is clause 8.5.1?\n\n   \nAnd 8.5.2?\nexit\nnever asked\n";
        let mut out = Vec::new();
        chat_loop(&agent(&server), ChatMode::Raw, &input[..], &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Clause 8.5.1 covers production control.").count(), 2);
        assert!(text.contains(&"-".repeat(60)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn eof_ends_the_loop() {
        let server = Server::new_async().await;
        let mut out = Vec::new();
        chat_loop(&agent(&server), ChatMode::Raw, &b""[..], &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn structured_mode_prints_sections() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("**Context:** Records **ISO Clause:** 7.5.3"))
            .create_async()
            .await;

        let mut out = Vec::new();
        chat_loop(
            &agent(&server),
            ChatMode::Structured,
            &b"How long to keep records?\nexit\n"[..],
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("**Context:** Records"));
        assert!(text.contains("**ISO Clause:** 7.5.3"));
        assert!(text.contains("**Risks:** No specific risks identified"));
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["iso-assistant", "capa", "late", "deliveries"]).unwrap();
        match cli.command {
            Some(Command::Capa { issue }) => assert_eq!(issue.join(" "), "late deliveries"),
            other => panic!("unexpected: {other:?}"),
        }

        let cli = Cli::try_parse_from(["iso-assistant", "chat", "--structured", "--max-tokens", "800"])
            .unwrap();
        assert_eq!(cli.max_tokens, Some(800));
        assert!(matches!(cli.command, Some(Command::Chat { structured: true })));

        let cli = Cli::try_parse_from(["iso-assistant"]).unwrap();
        assert!(cli.command.is_none());
    }
}
