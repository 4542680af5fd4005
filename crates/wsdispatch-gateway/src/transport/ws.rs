//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS (frame size capped by config)
//! - One read loop per connection: every data frame goes through `Dispatcher::dispatch`
//!   strictly in receive order
//! - Outbound writes go through a bounded queue drained by a writer task; nothing on
//!   the read side ever waits on that queue, and a running handler is bounded by the
//!   idle deadline and the connection token
//! - Lifecycle: ping/pong, idle timeout, dispatch error policy

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use wsdispatch_core::ClientCode;

use crate::app_state::AppState;
use crate::dispatch::Scope;
use crate::transport::codec::{classify, close_for, close_idle, Inbound};
use crate::transport::connection::OutboundConnection;

/// Why a connection loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disconnect {
    PeerClosed,
    ReadError,
    IdleTimeout,
    Dispatch(ClientCode),
    WriterGone,
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let max = app.cfg().gateway.max_frame_bytes;
    ws.max_message_size(max)
        .on_upgrade(move |socket| run_connection(app, socket))
}

async fn run_connection(app: AppState, socket: WebSocket) {
    let id = app.next_connection_id();
    async move {
        tracing::info!("client connected");
        let reason = serve(app, socket).await;
        tracing::info!(?reason, "client disconnected");
    }
    .instrument(tracing::info_span!("conn", id))
    .await
}

/// How one in-flight dispatch ended.
enum Outcome {
    Done(wsdispatch_core::Result<()>),
    /// Connection token cancelled (writer failed or peer went away).
    Gone,
    IdleTimeout,
}

/// How long the writer may keep flushing after the loop ends.
const WRITER_GRACE: Duration = Duration::from_secs(1);

// --------------------
// Writer
// --------------------
async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut out_rx: mpsc::Receiver<Message>,
    closed: CancellationToken,
) {
    while let Some(m) = out_rx.recv().await {
        let closing = matches!(m, Message::Close(_));
        if let Err(e) = ws_tx.send(m).await {
            tracing::debug!(error = %e, "write failed");
            closed.cancel();
            return;
        }
        if closing {
            return;
        }
    }
    if let Err(e) = ws_tx.close().await {
        tracing::debug!(error = %e, "close failed");
    }
}

/// Queue a control frame without waiting. A full queue drops the frame;
/// returns false only when the writer is gone.
fn enqueue(out_tx: &mpsc::Sender<Message>, msg: Message) -> bool {
    match out_tx.try_send(msg) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            tracing::debug!("outbound queue full, control frame dropped");
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

// --------------------
// Core connection loop
// --------------------
async fn serve(app: AppState, socket: WebSocket) -> Disconnect {
    let gw = &app.cfg().gateway;
    let dispatcher = app.dispatcher();
    let policy = gw.on_dispatch_error;

    let root = Scope::new(CancellationToken::new(), Span::current());

    let (ws_tx, mut ws_rx) = socket.split();
    let (out_tx, out_rx) = mpsc::channel::<Message>(gw.outbound_queue);
    let mut writer = tokio::spawn(
        write_loop(ws_tx, out_rx, root.token().clone()).instrument(Span::current()),
    );

    let conn = OutboundConnection::new(out_tx.clone(), root.token().clone());

    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let mut ping_tick = tokio::time::interval_at(Instant::now() + ping_every, ping_every);
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();
    let mut seq: u64 = 0;
    // One frame read while a handler was running; handled next, in order.
    let mut ahead: Option<Message> = None;
    let mut peer_gone = false;

    let reason = loop {
        let msg = match ahead.take() {
            Some(m) => m,
            None => tokio::select! {
                // inbound reader
                incoming = ws_rx.next() => match incoming {
                    Some(Ok(m)) => {
                        last_activity = Instant::now();
                        m
                    }
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "read error");
                        break Disconnect::ReadError;
                    }
                    None => break Disconnect::PeerClosed,
                },

                // ping
                _ = ping_tick.tick() => {
                    if !enqueue(&out_tx, Message::Ping(Vec::new())) {
                        break Disconnect::WriterGone;
                    }
                    continue;
                }

                // idle timeout
                _ = tokio::time::sleep_until(last_activity + idle_timeout) => {
                    enqueue(&out_tx, close_idle());
                    break Disconnect::IdleTimeout;
                }

                _ = root.cancelled() => break Disconnect::WriterGone,
            },
        };

        let raw = match classify(msg) {
            Inbound::Data(raw) => raw,
            Inbound::Ping(p) => {
                if !enqueue(&out_tx, Message::Pong(p)) {
                    break Disconnect::WriterGone;
                }
                continue;
            }
            Inbound::Pong => continue,
            Inbound::Close => break Disconnect::PeerClosed,
        };

        seq += 1;
        let scope = root.child(tracing::debug_span!("frame", seq, len = raw.len()));
        let outcome = {
            let dispatch = dispatcher.dispatch(scope, &conn, &raw);
            tokio::pin!(dispatch);
            loop {
                tokio::select! {
                    // the handler gets the first chance to finish after a cancel
                    biased;
                    r = &mut dispatch => break Outcome::Done(r),
                    _ = root.cancelled() => break Outcome::Gone,
                    _ = tokio::time::sleep_until(last_activity + idle_timeout) => {
                        break Outcome::IdleTimeout;
                    }
                    incoming = ws_rx.next(), if ahead.is_none() && !peer_gone => match incoming {
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                            peer_gone = true;
                            root.token().cancel();
                        }
                        Some(Ok(m)) => {
                            last_activity = Instant::now();
                            ahead = Some(m);
                        }
                    },
                }
            }
        };

        match outcome {
            Outcome::Done(Ok(())) => {}
            Outcome::Done(Err(e)) => {
                let code = e.client_code();
                tracing::warn!(seq, code = code.as_str(), error = %e, "dispatch failed");
                if !peer_gone && policy.should_close(&e) {
                    enqueue(&out_tx, close_for(code));
                    break Disconnect::Dispatch(code);
                }
            }
            Outcome::Gone if peer_gone => break Disconnect::PeerClosed,
            Outcome::Gone => break Disconnect::WriterGone,
            Outcome::IdleTimeout => {
                tracing::warn!(seq, "handler still running at idle timeout");
                enqueue(&out_tx, close_idle());
                break Disconnect::IdleTimeout;
            }
        }
        if peer_gone {
            break Disconnect::PeerClosed;
        }
    };

    root.token().cancel();
    drop(conn);
    drop(out_tx);
    match tokio::time::timeout(WRITER_GRACE, &mut writer).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "writer task failed"),
        Err(_) => {
            tracing::debug!("writer stalled, aborting");
            writer.abort();
        }
    }
    reason
}
