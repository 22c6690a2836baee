use digtrace_infrastructure::dns::PollutionReport;
use digtrace_infrastructure::TraceResponse;
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use std::fmt::Write;

fn section(out: &mut String, title: &str, records: &[Record]) {
    if records.is_empty() {
        return;
    }
    let _ = writeln!(out, ";; {} SECTION:", title);
    for record in records {
        let _ = writeln!(out, "{}", record);
    }
    out.push('\n');
}

/// dig-style rendering of a full response.
pub fn render_message(message: &Message) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        ";; ->>HEADER<<- opcode: {:?}, status: {:?}, id: {}",
        message.op_code(),
        message.response_code(),
        message.id()
    );
    let _ = writeln!(
        out,
        ";; flags:{}{}{}; ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        if message.authoritative() { " aa" } else { "" },
        if message.recursion_desired() { " rd" } else { "" },
        if message.recursion_available() { " ra" } else { "" },
        message.answers().len(),
        message.name_servers().len(),
        message.additionals().len()
    );
    out.push('\n');

    section(&mut out, "ANSWER", message.answers());
    section(&mut out, "AUTHORITY", message.name_servers());
    section(&mut out, "ADDITIONAL", message.additionals());
    out
}

pub fn render_hop(index: usize, hop: &TraceResponse) -> String {
    let mut out = String::new();
    for record in hop.message.answers().iter().chain(hop.message.name_servers()) {
        let _ = writeln!(out, "{}", record);
    }
    let _ = writeln!(
        out,
        ";; hop {}: received from {} ({}), answer {}, authority {}{}",
        index + 1,
        hop.server,
        hop.server_addr,
        hop.message.answers().len(),
        hop.message.name_servers().len(),
        if hop.authoritative() { ", authoritative" } else { "" }
    );
    out
}

pub fn render_trace(hops: &[TraceResponse]) -> String {
    hops.iter()
        .enumerate()
        .map(|(i, hop)| render_hop(i, hop))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_pollution(report: &PollutionReport) -> String {
    let verdict = if report.polluted { "POLLUTED" } else { "clean" };
    match report.hops.last() {
        Some(last) => format!(
            "{}: {} after {} hops, last answer from {} ({})",
            report.domain,
            verdict,
            report.hops.len(),
            last.server,
            last.server_addr
        ),
        None => format!("{}: {}", report.domain, verdict),
    }
}
