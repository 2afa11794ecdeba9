//! Proxy orchestrator - wires buffer, relay, mirror and HTTP listener.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::ProxyConfig;
use dispatcher::{spawn_relay, HttpMirror, RelayHandle};
use ingestion::{build_router, ForwardingBuffer, IngestState};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time;
use tracing::{info, warn};

use super::ProxyStats;

/// Bound proxy, ready to serve
pub struct ProxyServer {
    config: ProxyConfig,
    listener: TcpListener,
    relay: RelayHandle,
    state: IngestState,
    started: Instant,
}

impl ProxyServer {
    /// Build every component and bind the listener
    ///
    /// Nothing is served until [`ProxyServer::run`] is awaited.
    pub async fn bind(config: ProxyConfig) -> Result<Self> {
        let started = Instant::now();
        let (producer, consumer) = ForwardingBuffer::bounded(config.buffer_size);

        let relay = spawn_relay(config.transmitter, config.transmitter_addr, consumer)
            .await
            .context("Failed to start transmitter")?;

        let mut state = IngestState::new(config.serialization, producer);
        if let Some(destination) = config.mirror_destination() {
            let mirror = HttpMirror::new(destination, config.mirror_timeout())
                .context("Failed to create mirror")?;
            info!(destination, "Mirroring enabled");
            state = state.with_mirror(Arc::new(mirror));
        }

        let listener = TcpListener::bind(config.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

        Ok(Self {
            config,
            listener,
            relay,
            state,
            started,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then drain the buffer
    ///
    /// In-flight requests finish, every producer is dropped with the router,
    /// and the relay empties the buffer. `shutdown_drain_secs` bounds the
    /// whole sequence, counted from the shutdown signal.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<ProxyStats> {
        let Self {
            config,
            listener,
            relay,
            state,
            started,
        } = self;

        let addr = listener.local_addr()?;
        let router = build_router(state, config.max_body_bytes);
        info!(
            addr = %addr,
            mode = %config.serialization,
            "Listening for metrics"
        );

        let outcome = serve_until(listener, router, shutdown, config.shutdown_drain()).await?;

        info!(graceful = outcome.graceful, "Listener stopped, draining forwarding buffer");

        let RelayHandle {
            sink_name,
            metrics,
            task,
        } = relay;

        let drained = match time::timeout_at(outcome.deadline, task).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Relay task failed");
                false
            }
            Err(_) => {
                warn!(
                    drain_secs = config.shutdown_drain_secs,
                    "Relay did not drain before the bound elapsed"
                );
                false
            }
        };

        let snapshot = metrics.snapshot();
        Ok(ProxyStats {
            relayed: snapshot.relayed_count,
            failed: snapshot.failure_count,
            drained,
            transmitter: sink_name,
            uptime: started.elapsed(),
        })
    }
}

/// How the listener phase ended
#[derive(Debug)]
struct ServeOutcome {
    /// Every in-flight request finished before the deadline
    graceful: bool,
    /// End of the shutdown budget
    deadline: time::Instant,
}

/// Serve `router` until `shutdown` resolves, then give in-flight requests
/// until `drain` after the signal
///
/// Requests still running at the deadline are abandoned (their connection
/// tasks end with the runtime).
async fn serve_until(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
    drain: Duration,
) -> Result<ServeOutcome> {
    let (fired_tx, fired_rx) = oneshot::channel();
    let signal = async move {
        shutdown.await;
        let _ = fired_tx.send(time::Instant::now() + drain);
    };

    let serve = axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .into_future();
    tokio::pin!(serve);

    let deadline = tokio::select! {
        result = &mut serve => {
            result.context("HTTP server failed")?;
            return Ok(ServeOutcome {
                graceful: true,
                deadline: time::Instant::now() + drain,
            });
        }
        fired = fired_rx => fired.unwrap_or_else(|_| time::Instant::now() + drain),
    };

    match time::timeout_at(deadline, &mut serve).await {
        Ok(result) => {
            result.context("HTTP server failed")?;
            Ok(ServeOutcome {
                graceful: true,
                deadline,
            })
        }
        Err(_) => {
            warn!(
                drain_secs = drain.as_secs_f64(),
                "In-flight requests still running at the shutdown bound, abandoning them"
            );
            Ok(ServeOutcome {
                graceful: false,
                deadline,
            })
        }
    }
}
