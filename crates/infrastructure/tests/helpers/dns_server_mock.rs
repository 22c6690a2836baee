#![allow(dead_code)]
use super::builders::MessageFixtures;
use hickory_proto::op::Message;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_ANSWER: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Authoritative answer with `MOCK_ANSWER`
    Answer,
    /// Valid response carrying a different transaction id
    WrongId,
    /// Never replies
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<Vec<u8>>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start_udp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let seen = Arc::clone(&queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            if let Some(response) = Self::respond(&buf[..len], behavior, &seen) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub async fn start_tcp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let queries = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let seen = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let seen = Arc::clone(&seen);
                        tokio::spawn(async move {
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_err() {
                                return;
                            }
                            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                            if stream.read_exact(&mut query).await.is_err() {
                                return;
                            }
                            match Self::respond(&query, behavior, &seen) {
                                Some(response) => {
                                    let len = (response.len() as u16).to_be_bytes();
                                    let _ = stream.write_all(&len).await;
                                    let _ = stream.write_all(&response).await;
                                }
                                None => {
                                    // hold the connection open without replying
                                    let mut sink = [0u8; 1];
                                    let _ = stream.read(&mut sink).await;
                                }
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queries received so far, as raw wire bytes.
    pub fn raw_queries(&self) -> Vec<Vec<u8>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<Message> {
        self.raw_queries()
            .iter()
            .filter_map(|bytes| Message::from_vec(bytes).ok())
            .collect()
    }

    fn respond(
        query_bytes: &[u8],
        behavior: MockBehavior,
        seen: &Mutex<Vec<Vec<u8>>>,
    ) -> Option<Vec<u8>> {
        seen.lock().unwrap().push(query_bytes.to_vec());
        let query = Message::from_vec(query_bytes).ok()?;

        let mut response = match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::Answer | MockBehavior::WrongId => {
                MessageFixtures::authoritative(&query, MOCK_ANSWER)
            }
        };
        if behavior == MockBehavior::WrongId {
            let mut header = *response.header();
            header.set_id(query.id().wrapping_add(1));
            response.set_header(header);
        }
        response.to_vec().ok()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
