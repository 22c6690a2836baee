use digtrace_domain::RecordType;
use digtrace_infrastructure::dns::forwarding::{MessageBuilder, RecordTypeMapper, ResponseParser};
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::NS;
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use std::str::FromStr;

#[test]
fn test_build_a_query() {
    let query = MessageBuilder::new_query(&RecordType::A, "google.com").unwrap();
    let bytes = MessageBuilder::serialize(&query).unwrap();

    assert!(
        bytes.len() >= 12,
        "DNS message too short: {} bytes",
        bytes.len()
    );
    assert_eq!(bytes[2] & 0x01, 0x01, "RD flag should be set");
    assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), query.id());
}

#[test]
fn test_query_name_is_fully_qualified() {
    let query = MessageBuilder::new_query(&RecordType::MX, "example.com").unwrap();
    let q = &query.queries()[0];

    assert!(q.name().is_fqdn());
    assert_eq!(q.name().to_ascii(), "example.com.");
    assert_eq!(q.query_class(), DNSClass::IN);
    assert_eq!(q.query_type(), RecordTypeMapper::to_hickory(&RecordType::MX));
}

#[test]
fn test_spf_query_uses_type_99() {
    let query = MessageBuilder::new_query(&RecordType::SPF, "example.com").unwrap();
    let bytes = MessageBuilder::serialize(&query).unwrap();

    // QTYPE and QCLASS close the question section
    assert_eq!(&bytes[bytes.len() - 4..], &[0, 99, 0, 1]);
}

#[test]
fn test_invalid_domain_rejected() {
    let label = "a".repeat(64);
    let err = MessageBuilder::new_query(&RecordType::A, &format!("{label}.com")).unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_parse_garbage_fails() {
    let err = ResponseParser::parse(&[0x12, 0x34, 0x00], "127.0.0.1:53".parse().unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("127.0.0.1:53"));
}

#[test]
fn test_referral_servers_in_order() {
    let mut message = Message::new(7, MessageType::Response, OpCode::Query);
    for ns in ["a.gtld-servers.net.", "b.gtld-servers.net."] {
        message.add_name_server(Record::from_rdata(
            Name::from_str("com.").unwrap(),
            172800,
            RData::NS(NS(Name::from_str(ns).unwrap())),
        ));
    }

    let bytes = message.to_vec().unwrap();
    let parsed = ResponseParser::parse(&bytes, "127.0.0.1:53".parse().unwrap()).unwrap();
    let servers: Vec<String> = ResponseParser::referral_servers(&parsed)
        .into_iter()
        .map(|s| s.trim_end_matches('.').to_string())
        .collect();

    assert_eq!(servers, vec!["a.gtld-servers.net", "b.gtld-servers.net"]);
}
