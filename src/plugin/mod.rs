//! Plugin set.
//!
//! # Data Flow
//! ```text
//! startup:   register(plugin)* → init(router) → start (registration order)
//! shutdown:  stop (all plugins concurrently, failures logged)
//! ```
//!
//! # Design Decisions
//! - Plugin names are unique; a second registration under a name fails
//! - The set is itself a `Component`, so shutdown treats it as one
//!   collaborator regardless of how many plugins it holds

use async_trait::async_trait;
use axum::Router;
use futures_util::future::join_all;
use std::sync::Arc;

use crate::lifecycle::{Component, ComponentError};

/// Registered protocol plugins. Each plugin is a `Component`.
#[derive(Default)]
pub struct PluginSet {
    plugins: Vec<Arc<dyn Component>>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn Component>) -> Result<(), ComponentError> {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(ComponentError::DuplicatePlugin(plugin.name().to_string()));
        }
        tracing::debug!(plugin = plugin.name(), "Plugin registered");
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }
}

#[async_trait]
impl Component for PluginSet {
    fn name(&self) -> &str {
        "plugins"
    }

    fn init(&self, router: Router) -> Router {
        self.plugins
            .iter()
            .fold(router, |router, plugin| plugin.init(router))
    }

    async fn start(&self) -> Result<(), ComponentError> {
        for plugin in &self.plugins {
            plugin.start().await?;
            tracing::info!(plugin = plugin.name(), "Plugin started");
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), ComponentError> {
        let results = join_all(self.plugins.iter().map(|plugin| async move {
            let result = plugin.stop().await;
            match &result {
                Ok(()) => tracing::info!(plugin = plugin.name(), "Plugin stopped"),
                Err(e) => tracing::warn!(plugin = plugin.name(), error = %e, "Plugin stop failed"),
            }
            result
        }))
        .await;

        let failed: Vec<_> = results
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ComponentError::Stop {
                component: "plugins".to_string(),
                reason: failed.join("; "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counting {
        name: &'static str,
        stops: Arc<AtomicUsize>,
        fail_stop: bool,
    }

    #[async_trait]
    impl Component for Counting {
        fn name(&self) -> &str {
            self.name
        }

        fn init(&self, router: Router) -> Router {
            router.route(&format!("/{}", self.name), get(|| async { "ok" }))
        }

        async fn stop(&self) -> Result<(), ComponentError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.fail_stop {
                return Err(ComponentError::Stop {
                    component: self.name.into(),
                    reason: "socket busy".into(),
                });
            }
            Ok(())
        }
    }

    fn plugin(name: &'static str, stops: &Arc<AtomicUsize>, fail_stop: bool) -> Arc<dyn Component> {
        Arc::new(Counting {
            name,
            stops: stops.clone(),
            fail_stop,
        })
    }

    #[test]
    fn rejects_duplicate_names() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut set = PluginSet::new();
        set.register(plugin("influxdb", &stops, false)).unwrap();
        assert_eq!(
            set.register(plugin("influxdb", &stops, false)),
            Err(ComponentError::DuplicatePlugin("influxdb".into()))
        );
        assert_eq!(set.names().count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_plugins_concurrently() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut set = PluginSet::new();
        set.register(plugin("influxdb", &stops, false)).unwrap();
        set.register(plugin("opentsdb", &stops, false)).unwrap();

        let start = tokio::time::Instant::now();
        set.stop().await.unwrap();

        assert_eq!(stops.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn stop_reports_failures_after_stopping_everything() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut set = PluginSet::new();
        set.register(plugin("influxdb", &stops, true)).unwrap();
        set.register(plugin("opentsdb", &stops, false)).unwrap();

        let err = set.stop().await.unwrap_err();
        assert_eq!(stops.load(Ordering::SeqCst), 2);
        assert!(err.to_string().contains("socket busy"));
    }

    #[tokio::test]
    async fn init_mounts_every_plugin() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let stops = Arc::new(AtomicUsize::new(0));
        let mut set = PluginSet::new();
        set.register(plugin("influxdb", &stops, false)).unwrap();
        set.register(plugin("opentsdb", &stops, false)).unwrap();
        let router = set.init(Router::new());

        for path in ["/influxdb", "/opentsdb"] {
            let response = router
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), 200, "{path}");
        }
    }

    #[test]
    fn names_in_registration_order() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut set = PluginSet::new();
        set.register(plugin("opentsdb", &stops, false)).unwrap();
        set.register(plugin("influxdb", &stops, false)).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["opentsdb", "influxdb"]);
    }
}
