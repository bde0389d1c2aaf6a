use clap::{Parser, Subcommand};
use serde_json::json;

use flareproxy::config::load_from_env;
use flareproxy::http::response::reconstruct;
use flareproxy::solver::{Command, Session, SolverClient, SolverReply};

#[derive(Parser)]
#[command(name = "solver-cli")]
#[command(about = "Diagnostics for the solver service behind flareproxy", long_about = None)]
struct Cli {
    /// Solver command endpoint (defaults to $FLARESOLVERR_URL or the built-in default)
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage solver sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Fetch a URL through the solver, session-less, and summarize the result
    Get { url: String },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List active session ids
    List,
    /// Create a new session and print its id
    Create,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_from_env()?;
    if let Some(url) = cli.url {
        config.solver.url = url;
    }
    let client = SolverClient::new(&config.solver)?;

    match cli.command {
        Commands::Sessions { action: SessionAction::List } => {
            let sessions = client.list_sessions().await;
            println!("{}", serde_json::to_string_pretty(&json!({ "sessions": sessions }))?);
        }
        Commands::Sessions { action: SessionAction::Create } => {
            let session = client.create_session().await;
            match session.id() {
                Some(id) => println!("{}", id),
                None => {
                    eprintln!("Error: solver at {} did not issue a session", client.endpoint());
                    std::process::exit(1);
                }
            }
        }
        Commands::Get { url } => {
            let command = Command::request_get(url, client.max_timeout_ms(), &Session::none());
            let reply = client.send(&command).await?;
            print_reply(reply)?;
        }
    }

    Ok(())
}

fn print_reply(reply: SolverReply) -> Result<(), Box<dyn std::error::Error>> {
    let solver_status = reply.envelope().and_then(|e| e.status().map(str::to_owned));
    let message = reply.envelope().and_then(|e| e.message().map(str::to_owned));
    let upstream_status = reply.envelope().and_then(|e| e.upstream_status());

    let out = reconstruct(reply);
    let body = out.body.into_bytes();
    let summary = json!({
        "http_status": out.status.as_u16(),
        "solver_status": solver_status,
        "message": message,
        "upstream_status": upstream_status,
        "content_type": out.content_type,
        "body_bytes": body.len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
