//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the application router in the shared middleware stack
//!   (request ID, tracing, panic recovery, timeout, CORS, compression, metrics)
//! - Bind the listener (plain or TLS) through `axum-server`
//! - Expose a handle the shutdown orchestrator can drain

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use axum_server::{Handle, Server};
use hyper_util::rt::TokioTimer;
use std::any::Any;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::{AdapterConfig, CorsConfig, ListenerConfig};
use crate::http::middleware::track_requests;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::{Drain, StartupError};
use crate::net::tls::load_tls_config;

/// HTTP server for the adapter.
pub struct HttpServer {
    router: Router,
    listener: ListenerConfig,
    header_read_timeout: Duration,
}

impl HttpServer {
    /// Wrap `app` with the middleware stack described by `config`.
    pub fn new(config: &AdapterConfig, app: Router) -> Self {
        Self {
            router: build_router(config, app),
            listener: config.listener.clone(),
            header_read_timeout: Duration::from_secs(config.timeouts.header_read_secs),
        }
    }

    /// Bind the listener and start serving in the background.
    pub async fn start(self) -> Result<ServerHandle, StartupError> {
        let addr: SocketAddr =
            self.listener
                .bind_address
                .parse()
                .map_err(|source| StartupError::InvalidAddress {
                    address: self.listener.bind_address.clone(),
                    source,
                })?;

        let handle = Handle::new();
        let app = self.router.into_make_service();
        let tls = &self.listener.tls;

        let task = if tls.enabled {
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path))
                .await
                .map_err(StartupError::Tls)?;
            let mut server = axum_server::bind_rustls(addr, rustls).handle(handle.clone());
            limit_header_read(&mut server, self.header_read_timeout);
            tokio::spawn(server.serve(app))
        } else {
            let mut server = axum_server::bind(addr).handle(handle.clone());
            limit_header_read(&mut server, self.header_read_timeout);
            tokio::spawn(server.serve(app))
        };

        let local_addr = match handle.listening().await {
            Some(local_addr) => local_addr,
            None => {
                let err = match task.await {
                    Ok(Err(e)) => e,
                    Ok(Ok(())) => std::io::Error::other("listener exited before binding"),
                    Err(e) => std::io::Error::other(e),
                };
                return Err(StartupError::Bind(err));
            }
        };

        tracing::info!(
            address = %local_addr,
            tls = tls.enabled,
            "HTTP server listening"
        );

        Ok(ServerHandle {
            handle,
            task,
            local_addr,
        })
    }
}

/// Close HTTP/1 connections that do not finish sending the request head in time.
fn limit_header_read<A>(server: &mut Server<A>, timeout: Duration) {
    server
        .http_builder()
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeout);
}

/// Build the router with all middleware layers.
pub fn build_router(config: &AdapterConfig, app: Router) -> Router {
    let router = app
        .layer(middleware::from_fn(track_requests))
        .layer(cors_layer(&config.cors));

    let router = if config.compression.gzip {
        router.layer(CompressionLayer::new())
    } else {
        router
    };

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            )),
    )
}

/// Log a handler panic and answer with a bare 500.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allow_all_origins {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let headers: Vec<HeaderName> = [AUTHORIZATION, CONTENT_TYPE, ACCEPT, X_REQUEST_ID]
        .into_iter()
        .chain(
            config
                .allow_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok()),
        )
        .collect();

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(headers)
}

/// Running listener.
pub struct ServerHandle {
    handle: Handle,
    task: JoinHandle<std::io::Result<()>>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn connection_count(&self) -> usize {
        self.handle.connection_count()
    }
}

impl Drain for ServerHandle {
    async fn drain(self, deadline: Duration) {
        tracing::info!(
            connections = self.handle.connection_count(),
            deadline_ms = deadline.as_millis() as u64,
            "Draining HTTP listener"
        );
        self.handle.graceful_shutdown(Some(deadline));

        match self.task.await {
            Ok(Ok(())) => tracing::info!("HTTP server stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "HTTP server shutdown error"),
            Err(e) => tracing::error!(error = %e, "HTTP server task failed"),
        }
    }
}
