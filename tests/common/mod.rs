//! Shared utilities for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blm_adapter::config::AdapterConfig;
use blm_adapter::http::{HttpServer, ServerHandle};
use blm_adapter::lifecycle::{Component, ComponentError};

/// Start the full middleware stack around `app` on an ephemeral loopback port.
pub async fn start_server(app: Router) -> ServerHandle {
    start_server_with(AdapterConfig::default(), app).await
}

/// Like `start_server`, with `config` for everything but the bind address.
pub async fn start_server_with(mut config: AdapterConfig, app: Router) -> ServerHandle {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    HttpServer::new(&config, app).start().await.unwrap()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Component whose `stop` takes `delay`.
pub struct SlowStop {
    pub delay: Duration,
    pub stopped: Arc<AtomicBool>,
}

impl SlowStop {
    pub fn new(delay: Duration) -> (Arc<dyn Component>, Arc<AtomicBool>) {
        let stopped = Arc::new(AtomicBool::new(false));
        (
            Arc::new(Self {
                delay,
                stopped: stopped.clone(),
            }),
            stopped,
        )
    }
}

#[async_trait]
impl Component for SlowStop {
    fn name(&self) -> &str {
        "slow"
    }

    async fn stop(&self) -> Result<(), ComponentError> {
        tokio::time::sleep(self.delay).await;
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Component whose `stop` never returns.
pub struct HangingStop;

#[async_trait]
impl Component for HangingStop {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn stop(&self) -> Result<(), ComponentError> {
        std::future::pending().await
    }
}
