//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). The socket is connected to the
//! resolver so the kernel drops datagrams from any other source.

use digtrace_domain::DigError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpConnection {
    socket: UdpSocket,
    server_addr: SocketAddr,
}

impl UdpConnection {
    /// Binds to `local` (or the wildcard address of the server's family) on an
    /// ephemeral port and connects to `server_addr`.
    pub async fn dial(
        local: Option<IpAddr>,
        server_addr: SocketAddr,
        timeout: Duration,
    ) -> Result<Self, DigError> {
        let bind_addr = SocketAddr::new(local.unwrap_or_else(|| wildcard_for(&server_addr)), 0);

        let connect = async {
            let socket = UdpSocket::bind(bind_addr).await?;
            socket.connect(server_addr).await?;
            Ok::<_, std::io::Error>(socket)
        };

        let socket = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| DigError::DialTimeout {
                server: server_addr.to_string(),
            })?
            .map_err(|e| DigError::Dial {
                server: server_addr.to_string(),
                reason: format!("UDP bind {} / connect: {}", bind_addr, e),
            })?;

        debug!(server = %server_addr, local = %bind_addr, "UDP socket connected");

        Ok(Self {
            socket,
            server_addr,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub async fn send(&self, message_bytes: &[u8]) -> Result<(), DigError> {
        let bytes_sent = self
            .socket
            .send(message_bytes)
            .await
            .map_err(|e| DigError::Io {
                server: self.server_addr.to_string(),
                reason: format!("Failed to send UDP query: {}", e),
            })?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");
        Ok(())
    }

    pub async fn recv(&self) -> Result<Vec<u8>, DigError> {
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        let bytes_received = self
            .socket
            .recv(&mut recv_buf)
            .await
            .map_err(|e| DigError::Io {
                server: self.server_addr.to_string(),
                reason: format!("Failed to receive UDP response: {}", e),
            })?;

        recv_buf.truncate(bytes_received);

        debug!(server = %self.server_addr, bytes_received, "UDP response received");
        Ok(recv_buf)
    }
}

pub(crate) fn wildcard_for(server_addr: &SocketAddr) -> IpAddr {
    if server_addr.is_ipv4() {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V6(Ipv6Addr::UNSPECIFIED)
    }
}
