use std::net::SocketAddr;

use thiserror::Error;

/// Errors that stop the HTTP server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServerError {
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}
