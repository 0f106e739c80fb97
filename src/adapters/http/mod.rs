//! Minimal HTTP/1.1 front end for the portfolio.
//!
//! One request per connection. The accept loop spawns a task per client;
//! all tasks share one [`App`] behind an `Arc`.

pub mod message;
pub mod page;
pub mod routes;

use crate::core::intake::LeadIntake;
use crate::core::LeadStore;
use crate::utils::error::Result;
use message::{read_request, MAX_REQUEST_SIZE};
use routes::{error_response, App};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

pub struct LeadServer<S: LeadStore + 'static> {
    listener: TcpListener,
    app: Arc<App<S>>,
}

impl<S: LeadStore + 'static> LeadServer<S> {
    pub async fn bind(addr: &str, intake: LeadIntake<S>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            app: Arc::new(App::new(intake)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until the process is stopped.
    pub async fn run(self) -> Result<()> {
        self.serve_until(std::future::pending::<()>()).await
    }

    /// Serves until `shutdown` resolves. In-flight connections finish on
    /// their own tasks.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("🚀 Listening on http://{}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("🛑 Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let app = Arc::clone(&self.app);
                        tokio::spawn(async move {
                            handle_connection(app, stream, peer).await;
                        });
                    }
                    Err(e) => tracing::warn!("Failed to accept connection: {}", e),
                }
            }
        }
    }
}

async fn handle_connection<S: LeadStore>(app: Arc<App<S>>, mut stream: TcpStream, peer: SocketAddr) {
    let response = match read_request(&mut stream, MAX_REQUEST_SIZE).await {
        Ok(request) => {
            tracing::debug!("{} {} from {}", request.method, request.path, peer);
            app.dispatch(&request, Some(peer)).await
        }
        Err(e) => {
            tracing::debug!("Bad request from {}: {}", peer, e);
            error_response(&e)
        }
    };

    if let Err(e) = stream.write_all(&response.build()).await {
        tracing::debug!("Failed to write response to {}: {}", peer, e);
        return;
    }
    let _ = stream.shutdown().await;
}
