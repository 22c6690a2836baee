use clap::{Args, Parser, Subcommand};
use digtrace_domain::{CliOverrides, Protocol, RecordType};
use digtrace_infrastructure::Dig;
use tracing::{debug, info};

mod bootstrap;
mod output;

#[derive(Parser)]
#[command(name = "digtrace")]
#[command(version = "0.1.0")]
#[command(about = "digtrace - DNS lookups, +trace walks and pollution checks")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Resolver to query (host, host:port, [v6]:port)
    #[arg(short = 's', long, global = true)]
    server: Option<String>,

    /// Backup resolver raced against the primary
    #[arg(short = 'b', long, global = true)]
    backup: Option<String>,

    /// EDNS client subnet address (IPv4)
    #[arg(long, global = true)]
    subnet: Option<String>,

    /// Local address to send from
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Use TCP instead of UDP
    #[arg(long, global = true)]
    tcp: bool,

    /// Attempts per query
    #[arg(long, global = true)]
    retry: Option<usize>,

    /// Dial, read and write timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Referral hops allowed during a trace
    #[arg(long, global = true)]
    max_hops: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Query the configured resolver
    Query {
        domain: String,
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: RecordType,
    },
    /// Walk the delegation chain from a root server
    Trace {
        domain: String,
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: RecordType,
    },
    /// Report whether the last trace hop answered authoritatively
    Polluted { domain: String },
}

impl GlobalArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            server: self.server.clone(),
            backup_server: self.backup.clone(),
            local_addr: self.bind.clone(),
            client_subnet: self.subnet.clone(),
            protocol: self.tcp.then_some(Protocol::Tcp),
            timeout_ms: self.timeout_ms,
            retry: self.retry,
            max_hops: self.max_hops,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.global.config.as_deref(), cli.global.overrides())?;
    bootstrap::init_logging(&config);

    info!("Starting digtrace v{}", env!("CARGO_PKG_VERSION"));

    let dig = Dig::from_config(&config.dig, &config.trace).await?;
    debug!(
        server = ?dig.remote_addr(),
        backup = ?dig.backup_remote_addr(),
        protocol = %config.dig.protocol,
        "Client configured"
    );

    match cli.command {
        Command::Query {
            domain,
            record_type,
        } => {
            let response = dig.get_msg(record_type, &domain).await?;
            print!("{}", output::render_message(&response));
        }
        Command::Trace {
            domain,
            record_type,
        } => match dig.trace_for_record(&domain, record_type).await {
            Ok(hops) => println!("{}", output::render_trace(&hops)),
            Err(failure) => {
                if !failure.hops.is_empty() {
                    println!("{}", output::render_trace(&failure.hops));
                }
                return Err(failure.into());
            }
        },
        Command::Polluted { domain } => {
            let report = dig.check_pollution(&domain).await?;
            println!("{}", output::render_pollution(&report));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_a_record() {
        let cli = Cli::try_parse_from(["digtrace", "query", "example.com"]).unwrap();
        match cli.command {
            Command::Query {
                domain,
                record_type,
            } => {
                assert_eq!(domain, "example.com");
                assert_eq!(record_type, RecordType::A);
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn test_type_flag_accepts_raw_codes() {
        for (flag, expected) in [
            ("DS", RecordType::Other(43)),
            ("TYPE4242", RecordType::Other(4242)),
            ("TYPE28", RecordType::AAAA),
        ] {
            let cli =
                Cli::try_parse_from(["digtrace", "query", "example.com", "-t", flag]).unwrap();
            match cli.command {
                Command::Query { record_type, .. } => assert_eq!(record_type, expected),
                _ => panic!("expected query"),
            }
        }

        assert!(Cli::try_parse_from(["digtrace", "query", "example.com", "-t", "BOGUS"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "digtrace",
            "trace",
            "example.com",
            "-t",
            "aaaa",
            "--server",
            "8.8.8.8",
            "--tcp",
            "--timeout-ms",
            "500",
        ])
        .unwrap();

        let overrides = cli.global.overrides();
        assert_eq!(overrides.server.as_deref(), Some("8.8.8.8"));
        assert_eq!(overrides.protocol, Some(Protocol::Tcp));
        assert_eq!(overrides.timeout_ms, Some(500));
        assert!(matches!(
            cli.command,
            Command::Trace {
                record_type: RecordType::AAAA,
                ..
            }
        ));
    }

    #[test]
    fn test_udp_is_not_forced_without_flag() {
        let cli = Cli::try_parse_from(["digtrace", "polluted", "example.com"]).unwrap();
        assert_eq!(cli.global.overrides().protocol, None);
    }

    #[test]
    fn test_unknown_record_type_rejected() {
        assert!(Cli::try_parse_from(["digtrace", "query", "example.com", "-t", "BOGUS"]).is_err());
    }
}
