use axum::{Router, extract::State, http::StatusCode, routing::any};
use checker::Checker;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// HTTP front for a [`Checker`]: 200 when the node is healthy, 502 otherwise.
pub struct HealthServer {
    checker: Arc<Checker>,
}

impl HealthServer {
    pub fn new(checker: Checker) -> Self {
        Self {
            checker: Arc::new(checker),
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/", any(health_handler))
            .with_state(self.checker)
            .layer(TraceLayer::new_for_http())
    }

    pub async fn serve(self, addr: SocketAddr) -> eyre::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Healthcheck server listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn health_handler(State(checker): State<Arc<Checker>>) -> StatusCode {
    tracing::info!("checking node");

    match checker.check().await {
        Ok(report) if report.healthy => StatusCode::OK,
        Ok(report) => {
            tracing::warn!(
                rule = ?report.rule,
                node_block = report.node_block.number,
                external_block = ?report.external_block.map(|b| b.number),
                "node is unhealthy"
            );
            StatusCode::BAD_GATEWAY
        }
        Err(err) => {
            tracing::error!("could not verify node: {}", err);
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("could not listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down healthcheck server");
}
