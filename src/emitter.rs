//! Sends gauge samples to a statsd collector over UDP.

use crate::config::StatsdConfig;
use crate::core::{GaugeSink, MetricSample};
use async_trait::async_trait;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info, trace};

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("could not resolve statsd address {0}")]
    Resolve(String),

    #[error("failed to open UDP socket: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to send to {addr}: {source}")]
    Send {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Fire-and-forget statsd gauge emitter.
///
/// Owns the one UDP socket used for the lifetime of the process. The socket
/// is closed when the emitter is dropped.
#[derive(Debug)]
pub struct StatsdEmitter {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl StatsdEmitter {
    /// Binds a local socket and connects it to `destination`. With no bind
    /// address, an ephemeral port on the destination's address family is used.
    pub async fn bind(destination: SocketAddr, bind_address: Option<SocketAddr>) -> Result<Self, EmitError> {
        let local = bind_address.unwrap_or_else(|| match destination {
            SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
            SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
        });
        let socket = UdpSocket::bind(local).await.map_err(EmitError::Bind)?;
        socket.connect(destination).await.map_err(EmitError::Bind)?;
        info!(local = ?socket.local_addr().ok(), %destination, "Statsd emitter ready");
        Ok(Self {
            socket,
            destination,
        })
    }

    /// Resolves the configured host and port, then binds.
    pub async fn from_config(config: &StatsdConfig) -> Result<Self, EmitError> {
        let target = format!("{}:{}", config.host, config.port);
        let destination = tokio::net::lookup_host(&target)
            .await
            .map_err(|_| EmitError::Resolve(target.clone()))?
            .next()
            .ok_or_else(|| EmitError::Resolve(target.clone()))?;
        Self::bind(destination, config.bind_address).await
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl GaugeSink for StatsdEmitter {
    async fn emit(&self, sample: &MetricSample) -> Result<(), EmitError> {
        let line = sample.to_wire();
        trace!(line = line.trim_end(), "Sending gauge");
        self.socket
            .send(line.as_bytes())
            .await
            .map(|_| ())
            .map_err(|source| {
                debug!(addr = %self.destination, error = %source, "Dropped gauge");
                EmitError::Send {
                    addr: self.destination,
                    source,
                }
            })
    }
}
