//! EDNS client-subnet injection (RFC 7871)

use digtrace_domain::ClientSubnet;
use hickory_proto::op::{Edns, Message};
use hickory_proto::rr::rdata::opt::{ClientSubnet as SubnetOption, EdnsOption};
use std::net::IpAddr;

/// Attaches a client-subnet option for `subnet` to the message's OPT record,
/// creating the OPT record if needed. `None` leaves the message untouched.
///
/// Callers apply it to a fresh copy of the query for every attempt.
pub fn apply_client_subnet(message: &mut Message, subnet: Option<&ClientSubnet>) {
    let Some(subnet) = subnet else {
        return;
    };

    let option = SubnetOption::new(IpAddr::V4(subnet.addr()), subnet.source_netmask(), 0);

    message
        .extensions_mut()
        .get_or_insert_with(Edns::new)
        .options_mut()
        .insert(EdnsOption::Subnet(option));
}
