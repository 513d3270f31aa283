use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use voyage_agents::{AgentConfig, TourismAgent};
use voyage_core::analyze_query;
use voyage_observability::{init_tracing, AppMetrics};

const EXIT_WORDS: &[&str] = &["quit", "exit", "bye"];
const BANNER_RULE: &str = "==================================================";

#[derive(Debug, Parser)]
#[command(name = "voyage")]
#[command(about = "Voyage Concierge: weather and sights for wherever you're headed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive conversation (default).
    Chat,
    /// Answer a single question and exit.
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show the extracted destination and intent without calling any service.
    Inspect {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("voyage_cli");
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(build_agent()?).await?,
        Command::Ask { text } => {
            let agent = build_agent()?;
            println!("{}", agent.process_request(&text.join(" ")).await);
        }
        Command::Inspect { text } => {
            let analysis = analyze_query(&text.join(" "));
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
    }

    Ok(())
}

fn build_agent() -> Result<TourismAgent> {
    let config = AgentConfig::from_env().context("invalid VOYAGE_* configuration")?;
    TourismAgent::from_config(&config, AppMetrics::shared())
}

async fn run_chat(agent: TourismAgent) -> Result<()> {
    println!("{BANNER_RULE}");
    println!("  Welcome to the Voyage Concierge!");
    println!("  Type 'quit' to exit");
    println!("{BANNER_RULE}");
    println!();

    let stdin = io::stdin();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let message = line.trim();
        if is_exit_word(message) {
            println!("\nSafe travels! Goodbye!");
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent.process_request(message).await;
        println!("\nAssistant: {reply}\n");
    }

    Ok(())
}

fn is_exit_word(message: &str) -> bool {
    let lowered = message.to_lowercase();
    EXIT_WORDS.contains(&lowered.as_str())
}
