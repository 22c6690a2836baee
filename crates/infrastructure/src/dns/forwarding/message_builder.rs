//! DNS Message Builder
//!
//! Constructs DNS query messages using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use digtrace_domain::{DigError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use std::str::FromStr;

/// Builds DNS query messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a standard recursive query:
    /// - Random ID for request/response matching
    /// - RD (Recursion Desired) flag set
    /// - Single question for the fully-qualified `domain`, class IN
    pub fn new_query(record_type: &RecordType, domain: &str) -> Result<Message, DigError> {
        let name = Self::fqdn(domain)?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        Ok(message)
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DigError> {
        message
            .to_vec()
            .map_err(|e| DigError::Encode(e.to_string()))
    }

    fn fqdn(domain: &str) -> Result<Name, DigError> {
        let mut name = Name::from_str(domain).map_err(|e| {
            DigError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;
        name.set_fqdn(true);
        Ok(name)
    }
}
