//! TCP transport for DNS queries (RFC 1035 §4.2.2)
//!
//! Every message is prefixed with its length as a big-endian u16.

use digtrace_domain::DigError;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream};
use tracing::debug;

/// A DNS message is never shorter than its fixed header.
const DNS_HEADER_LEN: usize = 12;

pub struct TcpConnection {
    stream: TcpStream,
    server_addr: SocketAddr,
}

impl TcpConnection {
    pub async fn dial(
        local: Option<IpAddr>,
        server_addr: SocketAddr,
        timeout: Duration,
    ) -> Result<Self, DigError> {
        let dial_err = |reason: String| DigError::Dial {
            server: server_addr.to_string(),
            reason,
        };

        let socket = if server_addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|e| dial_err(format!("Failed to create TCP socket: {}", e)))?;

        if let Some(ip) = local {
            let bind_addr = SocketAddr::new(ip, 0);
            socket
                .bind(bind_addr)
                .map_err(|e| dial_err(format!("Failed to bind {}: {}", bind_addr, e)))?;
        }

        let stream = tokio::time::timeout(timeout, socket.connect(server_addr))
            .await
            .map_err(|_| DigError::DialTimeout {
                server: server_addr.to_string(),
            })?
            .map_err(|e| dial_err(format!("Connection refused: {}", e)))?;

        stream
            .set_nodelay(true)
            .map_err(|e| dial_err(format!("Failed to set TCP_NODELAY: {}", e)))?;

        debug!(server = %server_addr, "TCP connection established");

        Ok(Self {
            stream,
            server_addr,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub async fn send(&mut self, message_bytes: &[u8]) -> Result<(), DigError> {
        send_with_length_prefix(&mut self.stream, message_bytes)
            .await
            .map_err(|reason| DigError::Io {
                server: self.server_addr.to_string(),
                reason,
            })?;

        debug!(server = %self.server_addr, message_len = message_bytes.len(), "TCP query sent");
        Ok(())
    }

    pub async fn recv(&mut self) -> Result<Vec<u8>, DigError> {
        let response = read_with_length_prefix(&mut self.stream)
            .await
            .map_err(|reason| DigError::Io {
                server: self.server_addr.to_string(),
                reason,
            })?;

        debug!(server = %self.server_addr, response_len = response.len(), "TCP response received");
        Ok(response)
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), String>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len())
        .map_err(|_| format!("Message too large: {} bytes", message_bytes.len()))?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| format!("Failed to write length prefix: {}", e))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| format!("Failed to write DNS message: {}", e))?;
    stream
        .flush()
        .await
        .map_err(|e| format!("Failed to flush stream: {}", e))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, String>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| format!("Failed to read response length: {}", e))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    if response_len < DNS_HEADER_LEN {
        return Err(format!(
            "Response too short: {} bytes (min {})",
            response_len, DNS_HEADER_LEN
        ));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| format!("Failed to read response body: {}", e))?;

    Ok(response)
}
