//! JSON-lines host loop.
//!
//! Each stdin line is either a method call
//! `{"id": .., "network": "..", "method": "..", "arguments": {..}}`
//! or a listen toggle `{"network": "..", "listen": true}`. Replies and
//! pushed events share stdout through a single writer task.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use meshgate_config::Config;
use meshgate_core::{ErrorKind, EventSubscription, MeshBridge, MeshEvent, Reply};

use super::{load_network, network_paths};
use crate::cli::ServeArgs;
use crate::error::CliError;

// ── Wire shapes ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostMessage {
    Listen {
        network: String,
        listen: bool,
    },
    Call {
        #[serde(default)]
        id: Option<Value>,
        network: String,
        method: String,
        #[serde(default)]
        arguments: Option<Value>,
    },
}

#[derive(Debug, Serialize)]
struct ReplyLine<'a> {
    id: Option<&'a Value>,
    network: Option<&'a str>,
    reply: &'a Reply,
}

#[derive(Debug, Serialize)]
struct EventLine<'a> {
    network: &'a str,
    event: &'a MeshEvent,
}

// ── Loop ────────────────────────────────────────────────────────────

pub async fn handle(args: &ServeArgs, config: &Config) -> Result<(), CliError> {
    let bridge = MeshBridge::new(config.bridge_config());
    for path in network_paths(&args.networks, config)? {
        bridge.register(load_network(&path)?);
    }
    info!(networks = bridge.network_ids().len(), "serving host calls on stdin");

    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_lines(out_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message: HostMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "malformed host line");
                reject_line(&out_tx, &line, &e)?;
                continue;
            }
        };

        match message {
            HostMessage::Call {
                id,
                network,
                method,
                arguments,
            } => {
                let reply = bridge
                    .handle_call(&network, &method, arguments.as_ref())
                    .await
                    .unwrap_or_else(|e| Reply::from_error(&e));
                emit(
                    &out_tx,
                    &ReplyLine {
                        id: id.as_ref(),
                        network: Some(&network),
                        reply: &reply,
                    },
                )?;
            }
            HostMessage::Listen {
                network,
                listen: true,
            } => match bridge.subscribe(&network) {
                Ok(subscription) => {
                    debug!(network = %network, "host listening");
                    forward_events(network, subscription, out_tx.clone());
                }
                Err(e) => warn!(network = %network, error = %e, "cannot listen"),
            },
            HostMessage::Listen {
                network,
                listen: false,
            } => {
                if let Err(e) = bridge.cancel_subscription(&network) {
                    warn!(network = %network, error = %e, "cannot cancel listener");
                }
            }
        }
    }

    // EOF: dropping every sink ends the forwarders, then the writer drains.
    for id in bridge.network_ids() {
        bridge.unregister(&id);
    }
    drop(out_tx);
    if let Err(e) = writer.await {
        warn!(error = %e, "output writer stopped abnormally");
    }
    Ok(())
}

fn emit<T: Serialize>(out: &mpsc::UnboundedSender<String>, line: &T) -> Result<(), CliError> {
    let text = serde_json::to_string(line)?;
    if out.send(text).is_err() {
        warn!("output writer closed, dropping line");
    }
    Ok(())
}

/// Answer an undecodable line when it still names a call id, so the host
/// is not left waiting for a reply that will never come.
fn reject_line(
    out: &mpsc::UnboundedSender<String>,
    line: &str,
    err: &serde_json::Error,
) -> Result<(), CliError> {
    let Ok(Value::Object(raw)) = serde_json::from_str::<Value>(line) else {
        return Ok(());
    };
    let Some(id) = raw.get("id") else {
        return Ok(());
    };

    let reply = Reply::error(
        ErrorKind::MalformedArguments,
        format!("malformed host line: {err}"),
    );
    emit(
        out,
        &ReplyLine {
            id: Some(id),
            network: raw.get("network").and_then(Value::as_str),
            reply: &reply,
        },
    )
}

fn forward_events(
    network: String,
    mut subscription: EventSubscription,
    out: mpsc::UnboundedSender<String>,
) {
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            let line = EventLine {
                network: &network,
                event: &event,
            };
            match serde_json::to_string(&line) {
                Ok(text) => {
                    if out.send(text).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(network = %network, error = %e, "dropping unencodable event"),
            }
        }
        debug!(network = %network, "event forwarding stopped");
    });
}

async fn write_lines(mut rx: mpsc::UnboundedReceiver<String>) {
    let mut stdout = tokio::io::stdout();
    while let Some(line) = rx.recv().await {
        let written = async {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await
        };
        if let Err(e) = written.await {
            warn!(error = %e, "stdout closed");
            break;
        }
    }
}
