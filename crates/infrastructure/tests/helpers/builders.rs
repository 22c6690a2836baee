#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::{A, NS};
use hickory_proto::rr::{Name, RData, Record};
use std::net::Ipv4Addr;
use std::str::FromStr;

pub struct MessageFixtures;

impl MessageFixtures {
    fn reply_to(query: &Message, authoritative: bool) -> Message {
        let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
        response.set_recursion_desired(query.recursion_desired());
        response.set_authoritative(authoritative);
        for q in query.queries() {
            response.add_query(q.clone());
        }
        response
    }

    fn question_name(query: &Message) -> Name {
        query
            .queries()
            .first()
            .map(|q| q.name().clone())
            .unwrap_or_else(Name::root)
    }

    /// Authoritative answer with one A record for the question name.
    pub fn authoritative(query: &Message, ip: Ipv4Addr) -> Message {
        let mut response = Self::reply_to(query, true);
        response.add_answer(Record::from_rdata(
            Self::question_name(query),
            300,
            RData::A(A(ip)),
        ));
        response
    }

    /// Non-authoritative referral listing `servers` in the authority section.
    pub fn referral(query: &Message, zone: &str, servers: &[&str]) -> Message {
        let mut response = Self::reply_to(query, false);
        let zone = Name::from_str(zone).unwrap();
        for server in servers {
            response.add_name_server(Record::from_rdata(
                zone.clone(),
                172800,
                RData::NS(NS(Name::from_str(server).unwrap())),
            ));
        }
        response
    }

    /// Non-authoritative with an empty authority section.
    pub fn dead_end(query: &Message) -> Message {
        Self::reply_to(query, false)
    }
}
