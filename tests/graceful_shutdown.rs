//! Shutdown behaviour against a live listener.

use axum::{routing::get, Router};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use blm_adapter::http::ServerHandle;
use blm_adapter::lifecycle::{Component, Shutdown, ShutdownOrchestrator, ShutdownState};
use blm_adapter::plugin::PluginSet;

mod common;

fn slow_app() -> Router {
    Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                "done"
            }),
        )
        .route(
            "/stuck",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "too late"
            }),
        )
}

/// Fire a request in the background and return once the server has accepted it.
async fn send_in_flight(
    server: &ServerHandle,
    path: &str,
) -> JoinHandle<reqwest::Result<reqwest::Response>> {
    let client = common::client();
    let url = format!("http://{}{path}", server.local_addr());
    let in_flight = tokio::spawn(async move { client.get(url).send().await });

    tokio::time::timeout(Duration::from_secs(5), async {
        while server.connection_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("request never reached the server");

    in_flight
}

#[tokio::test]
async fn test_finishes_when_components_stop_promptly() {
    let server = common::start_server(slow_app()).await;
    let (rest, rest_stopped) = common::SlowStop::new(Duration::from_millis(200));
    let (plugin, plugin_stopped) = common::SlowStop::new(Duration::from_millis(500));
    let mut plugins = PluginSet::new();
    plugins.register(plugin).unwrap();
    let components: Vec<Arc<dyn Component>> = vec![rest, Arc::new(plugins)];

    let shutdown = Shutdown::new();
    let orchestrator = ShutdownOrchestrator::new(Duration::from_secs(5), Duration::from_secs(5));

    let start = Instant::now();
    shutdown.trigger();
    let outcome = orchestrator.run(shutdown.wait(), server, components).await;

    assert_eq!(outcome, ShutdownState::Finished);
    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
    assert!(rest_stopped.load(Ordering::SeqCst));
    assert!(plugin_stopped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_times_out_when_plugin_hangs() {
    let server = common::start_server(slow_app()).await;
    let mut plugins = PluginSet::new();
    plugins.register(Arc::new(common::HangingStop)).unwrap();
    let components: Vec<Arc<dyn Component>> = vec![Arc::new(plugins)];

    let orchestrator = ShutdownOrchestrator::new(Duration::from_secs(1), Duration::from_secs(1));

    let start = Instant::now();
    let outcome = orchestrator.shutdown(server, components).await;
    let elapsed = start.elapsed();

    assert_eq!(outcome, ShutdownState::TimedOut);
    assert!(elapsed >= Duration::from_secs(1), "took {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[tokio::test]
async fn test_in_flight_request_completes_during_drain() {
    let server = common::start_server(slow_app()).await;
    let in_flight = send_in_flight(&server, "/slow").await;

    let orchestrator = ShutdownOrchestrator::new(Duration::from_secs(5), Duration::from_secs(5));
    let outcome = orchestrator.shutdown(server, Vec::new()).await;
    assert_eq!(outcome, ShutdownState::Finished);

    let res = in_flight.await.unwrap().expect("in-flight request should finish");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "done");
}

#[tokio::test]
async fn test_drain_deadline_force_closes_connections() {
    let server = common::start_server(slow_app()).await;
    let in_flight = send_in_flight(&server, "/stuck").await;

    let orchestrator = ShutdownOrchestrator::new(Duration::from_secs(1), Duration::from_secs(5));
    let start = Instant::now();
    let outcome = orchestrator.shutdown(server, Vec::new()).await;
    let elapsed = start.elapsed();

    assert_eq!(outcome, ShutdownState::Finished);
    assert!(elapsed >= Duration::from_secs(1), "took {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");

    let result = in_flight.await.unwrap();
    assert!(result.is_err(), "request outliving the drain deadline got {result:?}");
}

#[tokio::test]
async fn test_listener_closed_after_drain() {
    let server = common::start_server(slow_app()).await;
    let addr = server.local_addr();

    let orchestrator = ShutdownOrchestrator::new(Duration::from_secs(1), Duration::from_secs(5));
    assert_eq!(orchestrator.shutdown(server, Vec::new()).await, ShutdownState::Finished);

    let result = common::client()
        .get(format!("http://{addr}/slow"))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(result.is_err());
}
