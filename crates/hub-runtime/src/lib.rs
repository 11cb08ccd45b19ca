//! # WebSub Hub Runtime
//!
//! Wires the hub library to the outside world: the axum subscription
//! endpoint, the reqwest subscriber client, and the two timers.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Register the configured topics
//! 3. Start the notification dispatcher and the expiration sweeper
//! 4. Bind the listener and serve
//!
//! ## Shutdown Sequence
//!
//! 1. Stop accepting HTTP requests
//! 2. Stop both timers, letting a running tick finish
//! 3. Wait for in-flight verifications

pub mod config;
pub mod router;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use websub_hub::{
    ExpirationSweeper, HubService, InMemoryTopicRegistry, NotificationDispatcher,
    ReqwestSubscriberClient, SubscriberClient, SubscriptionStore, TaskHandle, TopicRegistry,
};

pub use config::{load_config, RuntimeConfig};
use router::{build_router, AppState};

/// The hub process: shared state, timers, and the HTTP server.
pub struct HubRuntime {
    config: RuntimeConfig,
    store: Arc<SubscriptionStore>,
    topics: Arc<InMemoryTopicRegistry>,
    service: Arc<HubService>,
    dispatcher: Arc<NotificationDispatcher>,
    sweeper: Arc<ExpirationSweeper>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    timers: Mutex<Vec<TaskHandle>>,
    server: Mutex<Option<JoinHandle<std::io::Result<()>>>>,
}

impl HubRuntime {
    /// Build a runtime that talks to subscribers over reqwest.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let client = ReqwestSubscriberClient::new(config.hub.http_timeout())
            .context("Failed to build subscriber HTTP client")?;
        Self::with_parts(config, SubscriptionStore::new_shared(), Arc::new(client))
    }

    /// Build a runtime from an explicit store and subscriber client.
    pub fn with_parts(
        config: RuntimeConfig,
        store: Arc<SubscriptionStore>,
        client: Arc<dyn SubscriberClient>,
    ) -> Result<Self> {
        config.hub.validate().context("Invalid hub configuration")?;

        let topics = Arc::new(InMemoryTopicRegistry::with_topics(config.topics.iter().cloned()));
        let service = Arc::new(HubService::new(
            Arc::clone(&store),
            topics.clone(),
            Arc::clone(&client),
            &config.hub,
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&store),
            topics.clone(),
            client,
        ));
        let sweeper = Arc::new(ExpirationSweeper::new(Arc::clone(&store)));
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            store,
            topics,
            service,
            dispatcher,
            sweeper,
            shutdown_tx,
            timers: Mutex::new(Vec::new()),
            server: Mutex::new(None),
        })
    }

    /// Start the timers and the HTTP server. Returns the bound address.
    pub async fn start(&self) -> Result<SocketAddr> {
        info!("===========================================");
        info!("  WebSub Hub v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let listener = TcpListener::bind(self.config.bind_addr())
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr()))?;
        let addr = listener.local_addr()?;

        {
            let mut timers = self.timers.lock();
            timers.push(Arc::clone(&self.dispatcher).spawn(self.config.hub.notify_interval()));
            timers.push(Arc::clone(&self.sweeper).spawn(self.config.hub.sweep_interval()));
        }

        let router = build_router(AppState {
            api: self.service.clone(),
            topics: Arc::clone(&self.topics),
        });
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
        });
        *self.server.lock() = Some(server);

        info!(%addr, topics = ?self.topics.topics(), "Hub is listening");
        Ok(addr)
    }

    /// Shut the hub down gracefully.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        // No receiver exists if the server never started.
        self.shutdown_tx.send_replace(true);
        let server = self.server.lock().take();
        if let Some(server) = server {
            match server.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "HTTP server error"),
                Err(e) => error!(error = %e, "HTTP server task failed"),
            }
        }

        let timers = std::mem::take(&mut *self.timers.lock());
        for timer in timers {
            timer.stop().await;
        }

        self.service.drain().await;
        info!(subscriptions = self.store.len(), "Shutdown complete");
    }

    pub fn store(&self) -> Arc<SubscriptionStore> {
        Arc::clone(&self.store)
    }

    pub fn topics(&self) -> Arc<InMemoryTopicRegistry> {
        Arc::clone(&self.topics)
    }

    pub fn service(&self) -> Arc<HubService> {
        Arc::clone(&self.service)
    }
}
