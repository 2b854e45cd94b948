mod agent;
mod card;

use std::sync::Arc;

use agentlink::core::executor::LlmAgentExecutor;
use agentlink::core::server::A2AServer;
use clap::Parser;
use log::info;

/// Translation agent served over the A2A protocol.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = 8001)]
    port: u16,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let agent = agent::build_agent();
    info!("Serving agent {} on port {}", agent.name(), args.port);

    let executor = Arc::new(LlmAgentExecutor::new(agent, "translator-agent"));
    let card = card::agent_card(&format!("http://localhost:{}", args.port));

    A2AServer::new(card, executor)
        .serve(&args.host, args.port)
        .await
}
