//! WebSocket host for the single shared blackjack table.
//!
//! One `Table` lives behind a mutex; every inbound intent locks it,
//! runs to completion, and fans its outbound messages out through a
//! broadcast channel. Each socket task forwards only the frames
//! addressed to everyone or to its own session, so personalized
//! projections never cross sessions.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State as AxumState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use pitboss_engine::{
    broadcast_frames, Intent, Outbound, Player, Projection, SessionId, Table, TableConfig,
};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

#[derive(Clone, Debug)]
struct ServiceConfig {
    host: String,
    port: u16,
    table: TableConfig,
}

impl ServiceConfig {
    fn from_env() -> Self {
        let defaults = TableConfig::default();
        Self {
            host: std::env::var("TABLE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("TABLE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9200),
            table: TableConfig {
                capacity: read_usize("TABLE_CAPACITY", defaults.capacity),
                shoe_decks: read_usize("TABLE_SHOE_DECKS", defaults.shoe_decks),
                default_bankroll: read_u64("TABLE_DEFAULT_BANKROLL", defaults.default_bankroll),
                default_bet: read_u64("TABLE_DEFAULT_BET", defaults.default_bet),
                bankroll_cap: defaults.bankroll_cap,
            },
        }
    }
}

fn read_u64(key: &str, fallback: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(fallback)
}

fn read_usize(key: &str, fallback: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(fallback)
}

/// A serialized outbound message and its audience. `target: None`
/// reaches every connected session.
#[derive(Clone, Debug)]
struct WireFrame {
    target: Option<SessionId>,
    payload: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum OutboundMessage {
    #[serde(rename = "joined")]
    Joined { player: Player },
    #[serde(rename = "errorMessage")]
    Error { text: String },
    #[serde(rename = "state")]
    State { projection: Projection },
}

#[derive(Clone)]
struct AppState {
    table: Arc<Mutex<Table>>,
    broadcaster: broadcast::Sender<WireFrame>,
}

/// Route the engine's outbound messages onto the wire.
fn dispatch(broadcaster: &broadcast::Sender<WireFrame>, outbounds: Vec<Outbound>) {
    for outbound in outbounds {
        let (target, message) = match outbound {
            Outbound::Joined { session, player } => {
                (Some(session), OutboundMessage::Joined { player })
            }
            Outbound::Error { session, text } => (Some(session), OutboundMessage::Error { text }),
            Outbound::State(frame) => (
                frame.target,
                OutboundMessage::State { projection: frame.projection },
            ),
        };
        match serde_json::to_string(&message) {
            Ok(payload) => {
                let _ = broadcaster.send(WireFrame { target, payload });
            }
            Err(err) => warn!(?err, "failed to encode outbound message"),
        }
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    AxumState(state): AxumState<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let session = SessionId::new();
    info!(%session, "session connected");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut broadcast_rx = state.broadcaster.subscribe();

    let write_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    // Forward broadcast frames addressed to everyone or to us.
    let broadcast_task = {
        let tx = tx.clone();
        let session = session.clone();
        tokio::spawn(async move {
            while let Ok(frame) = broadcast_rx.recv().await {
                let mine = frame.target.as_ref().map_or(true, |target| *target == session);
                if mine && tx.send(Message::Text(frame.payload)).is_err() {
                    break;
                }
            }
        })
    };

    // A fresh connection gets the current snapshot straight away.
    {
        let table = state.table.lock().unwrap();
        for frame in broadcast_frames(&table) {
            if frame.target.is_none() {
                let message = OutboundMessage::State { projection: frame.projection };
                if let Ok(payload) = serde_json::to_string(&message) {
                    let _ = tx.send(Message::Text(payload));
                }
            }
        }
    }

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<Intent>(&text) {
                Ok(intent) => {
                    let outbounds = {
                        let mut table = state.table.lock().unwrap();
                        table.apply(&session, intent)
                    };
                    dispatch(&state.broadcaster, outbounds);
                }
                Err(err) => {
                    warn!(%session, ?err, "unparseable intent");
                    let message = OutboundMessage::Error {
                        text: "unrecognized request".to_string(),
                    };
                    if let Ok(payload) = serde_json::to_string(&message) {
                        let _ = tx.send(Message::Text(payload));
                    }
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Disconnection is an ordinary intent with the same run-to-completion
    // discipline, including re-checking the round-advance predicate.
    let outbounds = {
        let mut table = state.table.lock().unwrap();
        table.apply(&session, Intent::Leave)
    };
    dispatch(&state.broadcaster, outbounds);
    info!(%session, "session disconnected");

    write_task.abort();
    broadcast_task.abort();
}

async fn healthz() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::from_env();
    let table = Arc::new(Mutex::new(Table::new(config.table)));
    let (broadcaster, _) = broadcast::channel::<WireFrame>(1024);

    let state = AppState { table, broadcaster };

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/healthz", get(healthz))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen addr")?;
    info!(%addr, "blackjack table service listening");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
