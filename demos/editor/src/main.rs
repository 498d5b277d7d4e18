//! Demo editing session.
//!
//! Connects to a running authoring server, clones a repository, checks out
//! the first advertised branch, and logs every fact the server reports.
//!
//! Run against a local server:
//!   cargo run -p authorsync-demo-editor -- --port 6543 --repo https://example.com/repo.git

use std::sync::Arc;

use authorsync_client::{Connection, ConnectionStatus, EndpointConfig, Message, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("authorsync_demo_editor=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = parse_arg_string(&args, "--host").unwrap_or_else(|| "127.0.0.1".into());
    let port = parse_arg(&args, "--port").unwrap_or(6543);
    let basepath = parse_arg_string(&args, "--basepath").unwrap_or_else(|| "/".into());
    let repo = parse_arg_string(&args, "--repo")
        .ok_or_else(|| anyhow::anyhow!("--repo <url> is required"))?;

    let mut config = EndpointConfig::new(host, port);
    config.basepath = basepath;

    let session = Arc::new(Session::new());
    let connection = Connection::connect(&config, Arc::clone(&session));
    let mut messages = session.subscribe_messages();
    let mut status = session.watch_status();

    status
        .wait_for(|s| *s != ConnectionStatus::Initialising)
        .await?;
    if session.status() == ConnectionStatus::Disconnected {
        anyhow::bail!("could not reach the authoring server at {}", config.url());
    }
    tracing::info!("connected to {}", config.url());

    connection.send(Message::CloneRepository { url: repo });

    loop {
        tokio::select! {
            changed = status.changed() => {
                changed?;
                if session.status() == ConnectionStatus::Disconnected {
                    tracing::info!("server closed the connection");
                    break;
                }
            }
            message = messages.recv() => {
                let Ok(message) = message else { break };
                match message {
                    Message::Repository(repository) => {
                        tracing::info!("repository cloned, branches: {:?}", repository.branches);
                        if let Some(branch) = repository.branches.first() {
                            connection.send(Message::CheckoutBranch {
                                branch: branch.clone(),
                            });
                        }
                    }
                    Message::Branch(branch) => {
                        tracing::info!("checked out, blocks: {:?}", branch.blocks);
                        if let Some(block) = branch.blocks.first() {
                            connection.send(Message::SelectBlock {
                                block: block.clone(),
                            });
                        }
                    }
                    Message::Block(block) => {
                        tracing::info!("block {} has {} files", block.path, block.files.len());
                    }
                    other => tracing::info!(?other, "fact"),
                }
            }
        }
    }
    Ok(())
}

fn parse_arg(args: &[String], flag: &str) -> Option<u16> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn parse_arg_string(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
