mod agent;

use std::io::{self, BufRead, Write};

use agentlink::llm::chat::ChatMessage;
use agentlink::llm::ToolContext;
use clap::Parser;
use log::error;

/// Orchestrating agent CLI: asks the hosted model, delegating sub-tasks to
/// remote agents over the A2A protocol.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// One-shot prompt; omit for an interactive session
    #[arg(short, long)]
    prompt: Option<String>,

    /// Endpoint of the translator agent
    #[arg(long, default_value = "http://localhost:8001")]
    translator_url: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let agent = agent::build_agent(&args.translator_url);
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut tool_ctx = ToolContext::new();

    if let Some(prompt) = args.prompt {
        match agent.run_collect(&history, &prompt, &mut tool_ctx).await {
            Ok((text, _)) => println!("{text}"),
            Err(e) => error!("Agent run failed: {e}"),
        }
        return;
    }

    println!("{} (exit で終了)", agent.description());
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read input: {e}");
                break;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        match agent.run_collect(&history, input, &mut tool_ctx).await {
            Ok((text, new_messages)) => {
                history.extend(new_messages);
                println!("{text}");
            }
            Err(e) => error!("Agent run failed: {e}"),
        }
    }
}
