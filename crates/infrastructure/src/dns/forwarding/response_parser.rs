use digtrace_domain::DigError;
use hickory_proto::op::Message;
use hickory_proto::rr::RData;
use std::net::SocketAddr;
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8], server: SocketAddr) -> Result<Message, DigError> {
        let message =
            Message::from_vec(response_bytes).map_err(|e| DigError::InvalidDnsResponse {
                server: server.to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            server = %server,
            id = message.id(),
            rcode = ?message.response_code(),
            authoritative = message.authoritative(),
            answers = message.answers().len(),
            authority = message.name_servers().len(),
            "DNS response parsed"
        );

        Ok(message)
    }

    /// Name server names listed in the authority section, in order.
    pub fn referral_servers(message: &Message) -> Vec<String> {
        message
            .name_servers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::NS(ns) => Some(ns.0.to_ascii()),
                _ => None,
            })
            .collect()
    }
}
