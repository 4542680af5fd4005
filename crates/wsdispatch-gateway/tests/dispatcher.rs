#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use wsdispatch_core::DispatchError;
use wsdispatch_gateway::dispatch::{Dispatcher, Handler, HandlerRegistry, Scope};
use wsdispatch_gateway::handlers::{FizzHandler, PingHandler};
use wsdispatch_gateway::transport::connection::ConnectionClosed;

mod support;
use support::{DeadConnection, RecordingConnection, SpyHandler};

fn builtin() -> Dispatcher {
    let d = Dispatcher::new();
    d.register("ping", Arc::new(PingHandler::new()));
    d.register("fizz", Arc::new(FizzHandler::new()));
    d
}

#[test]
fn lookup_returns_registered_handler_last_write_wins() {
    let reg = HandlerRegistry::new();
    let h1: Arc<dyn Handler> = Arc::new(SpyHandler::default());
    let h2: Arc<dyn Handler> = Arc::new(SpyHandler::default());

    assert!(reg.is_empty());
    reg.register("join", Arc::clone(&h1));
    assert!(Arc::ptr_eq(&reg.lookup("join").unwrap(), &h1));

    reg.register("join", Arc::clone(&h2));
    assert!(Arc::ptr_eq(&reg.lookup("join").unwrap(), &h2));
    assert_eq!(reg.len(), 1);
}

#[test]
fn lookup_is_exact_and_case_sensitive() {
    let reg = HandlerRegistry::new();
    reg.register("ping", Arc::new(SpyHandler::default()));

    assert!(reg.lookup("ping").is_some());
    assert!(reg.lookup("Ping").is_none());
    assert!(reg.lookup("pin").is_none());
    assert!(reg.lookup("ping ").is_none());
    assert_eq!(reg.events(), vec!["ping".to_string()]);
}

#[tokio::test]
async fn decode_failure_invokes_nothing() {
    let d = Dispatcher::new();
    let spy = Arc::new(SpyHandler::default());
    d.register("ping", spy.clone());
    let conn = RecordingConnection::default();

    let inputs: [&[u8]; 5] = [
        b"not json",
        br#"{"payload":{}}"#,
        br#"{"type":1,"payload":{}}"#,
        br#"{"type":"ping"}"#,
        b"\xff\xfe",
    ];
    for raw in inputs {
        let err = d.dispatch(Scope::background(), &conn, raw).await.unwrap_err();
        assert!(matches!(err, DispatchError::Decode(_)), "got: {err}");
    }

    assert_eq!(spy.calls(), 0);
    assert!(conn.frames().is_empty());
}

#[tokio::test]
async fn unregistered_type_is_unrecognized() {
    let d = Dispatcher::new();
    let spy = Arc::new(SpyHandler::default());
    d.register("ping", spy.clone());
    let conn = RecordingConnection::default();

    let err = d
        .dispatch(Scope::background(), &conn, br#"{"type":"PING","payload":{}}"#)
        .await
        .unwrap_err();

    match err {
        DispatchError::UnrecognizedEvent(t) => assert_eq!(t, "PING"),
        other => panic!("unexpected: {other}"),
    }
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn registered_handler_runs_once_with_exact_payload() {
    let d = Dispatcher::new();
    let spy = Arc::new(SpyHandler::default());
    let other = Arc::new(SpyHandler::default());
    d.register("join", spy.clone());
    d.register("leave", other.clone());
    let conn = RecordingConnection::default();

    let raw = br#"{"type":"join","payload":{ "room" : "a",  "n":[1,2] }}"#;
    d.dispatch(Scope::background(), &conn, raw).await.unwrap();

    assert_eq!(spy.calls(), 1);
    assert_eq!(other.calls(), 0);
    assert_eq!(spy.payloads(), vec![br#"{ "room" : "a",  "n":[1,2] }"#.to_vec()]);
}

#[tokio::test]
async fn same_frame_twice_runs_twice_identically() {
    let d = Dispatcher::new();
    let spy = Arc::new(SpyHandler::default());
    d.register("tick", spy.clone());
    let conn = RecordingConnection::default();

    let raw = br#"{"type":"tick","payload":{"n":1}}"#;
    d.dispatch(Scope::background(), &conn, raw).await.unwrap();
    d.dispatch(Scope::background(), &conn, raw).await.unwrap();

    let p = spy.payloads();
    assert_eq!(spy.calls(), 2);
    assert_eq!(p[0], p[1]);
    assert_eq!(p[0], br#"{"n":1}"#.to_vec());
}

#[tokio::test]
async fn scope_is_threaded_through() {
    let d = Dispatcher::new();
    let spy = Arc::new(SpyHandler::default());
    d.register("tick", spy.clone());
    let conn = RecordingConnection::default();
    let raw = br#"{"type":"tick","payload":null}"#;

    let root = Scope::background();
    d.dispatch(root.child(tracing::Span::none()), &conn, raw).await.unwrap();
    root.token().cancel();
    d.dispatch(root.child(tracing::Span::none()), &conn, raw).await.unwrap();

    assert_eq!(spy.saw_cancelled(), vec![false, true]);
}

#[tokio::test]
async fn scenario_ping_pong() {
    let d = builtin();
    let conn = RecordingConnection::default();

    d.dispatch(Scope::background(), &conn, br#"{"type":"ping","payload":{}}"#)
        .await
        .unwrap();

    assert_eq!(conn.texts(), vec![r#"{"type":"pong"}"#.to_string()]);
}

#[tokio::test]
async fn scenario_fizz_buzz() {
    let d = builtin();
    let conn = RecordingConnection::default();

    d.dispatch(Scope::background(), &conn, br#"{"type":"fizz","payload":{}}"#)
        .await
        .unwrap();

    assert_eq!(conn.texts(), vec![r#"{"type":"buzz"}"#.to_string()]);
}

#[tokio::test]
async fn scenario_unknown_writes_nothing() {
    let d = builtin();
    let conn = RecordingConnection::default();

    let err = d
        .dispatch(Scope::background(), &conn, br#"{"type":"unknown","payload":{}}"#)
        .await
        .unwrap_err();

    assert!(err.is_unrecognized_event());
    assert!(err.to_string().contains("unknown"));
    assert!(conn.frames().is_empty());
}

#[tokio::test]
async fn scenario_malformed_writes_nothing() {
    let d = builtin();
    let conn = RecordingConnection::default();

    let inputs: [&[u8]; 2] = [b"{\"type\":", br#"{"payload":{}}"#];
    for raw in inputs {
        let err = d.dispatch(Scope::background(), &conn, raw).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "DECODE_ERROR");
    }
    assert!(conn.frames().is_empty());
}

#[tokio::test]
async fn handler_error_is_propagated_unmodified() {
    let d = builtin();

    let err = d
        .dispatch(Scope::background(), &DeadConnection, br#"{"type":"ping","payload":{}}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Handler(_)));
    let inner = err.handler_error().unwrap();
    assert!(inner.downcast_ref::<ConnectionClosed>().is_some());
}

#[tokio::test]
async fn concurrent_dispatch_shares_registry() {
    let d = Arc::new(builtin());

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let d = Arc::clone(&d);
        tasks.push(tokio::spawn(async move {
            let conn = RecordingConnection::default();
            d.dispatch(Scope::background(), &conn, br#"{"type":"fizz","payload":{}}"#)
                .await
                .unwrap();
            conn.texts()
        }));
    }

    for t in tasks {
        assert_eq!(t.await.unwrap(), vec![r#"{"type":"buzz"}"#.to_string()]);
    }
}
