pub mod resolver;
pub mod tcp;
pub mod udp;

use digtrace_domain::{DigError, Protocol};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub use resolver::{HostResolver, SystemHostResolver};

/// An established connection to one resolver, closed when dropped.
pub enum Connection {
    Udp(udp::UdpConnection),
    Tcp(tcp::TcpConnection),
}

impl Connection {
    pub async fn send(&mut self, message_bytes: &[u8]) -> Result<(), DigError> {
        match self {
            Self::Udp(c) => c.send(message_bytes).await,
            Self::Tcp(c) => c.send(message_bytes).await,
        }
    }

    pub async fn recv(&mut self) -> Result<Vec<u8>, DigError> {
        match self {
            Self::Udp(c) => c.recv().await,
            Self::Tcp(c) => c.recv().await,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        match self {
            Self::Udp(c) => c.server_addr(),
            Self::Tcp(c) => c.server_addr(),
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

/// Opens a connection to `remote`, optionally from `local` on an ephemeral
/// port. No retry happens here.
pub async fn dial(
    protocol: Protocol,
    local: Option<IpAddr>,
    remote: SocketAddr,
    timeout: Duration,
) -> Result<Connection, DigError> {
    match protocol {
        Protocol::Udp => Ok(Connection::Udp(
            udp::UdpConnection::dial(local, remote, timeout).await?,
        )),
        Protocol::Tcp => Ok(Connection::Tcp(
            tcp::TcpConnection::dial(local, remote, timeout).await?,
        )),
    }
}
