use crate::errors::DigError;
use std::fmt;
use std::str::FromStr;

/// Query type. The common types have their own variant; every other code is
/// carried as `Other`, so any 16-bit type can be queried or traced.
///
/// Build values from codes with [`RecordType::from_u16`] so a code with a
/// named variant never ends up in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    SRV,
    SPF,
    CAA,
    ANY,
    Other(u16),
}

/// Mnemonics for codes without a named variant.
const OTHER_MNEMONICS: &[(&str, u16)] = &[
    ("HINFO", 13),
    ("RP", 17),
    ("AFSDB", 18),
    ("LOC", 29),
    ("NAPTR", 35),
    ("KX", 36),
    ("CERT", 37),
    ("DNAME", 39),
    ("DS", 43),
    ("SSHFP", 44),
    ("IPSECKEY", 45),
    ("RRSIG", 46),
    ("NSEC", 47),
    ("DNSKEY", 48),
    ("DHCID", 49),
    ("NSEC3", 50),
    ("NSEC3PARAM", 51),
    ("TLSA", 52),
    ("SMIMEA", 53),
    ("HIP", 55),
    ("CDS", 59),
    ("CDNSKEY", 60),
    ("OPENPGPKEY", 61),
    ("CSYNC", 62),
    ("ZONEMD", 63),
    ("SVCB", 64),
    ("HTTPS", 65),
    ("EUI48", 108),
    ("EUI64", 109),
    ("TKEY", 249),
    ("TSIG", 250),
    ("IXFR", 251),
    ("AXFR", 252),
    ("URI", 256),
];

impl RecordType {
    /// Standard mnemonic, `None` for codes without one.
    pub fn mnemonic(&self) -> Option<&'static str> {
        let name = match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::SRV => "SRV",
            RecordType::SPF => "SPF",
            RecordType::CAA => "CAA",
            RecordType::ANY => "ANY",
            RecordType::Other(code) => {
                return OTHER_MNEMONICS
                    .iter()
                    .find(|(_, c)| c == code)
                    .map(|(name, _)| *name)
            }
        };
        Some(name)
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::SPF => 99,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
            RecordType::Other(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            12 => RecordType::PTR,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            28 => RecordType::AAAA,
            33 => RecordType::SRV,
            99 => RecordType::SPF,
            255 => RecordType::ANY,
            257 => RecordType::CAA,
            other => RecordType::Other(other),
        }
    }
}

impl FromStr for RecordType {
    type Err = DigError;

    /// Accepts mnemonics (case-insensitive), `*` for ANY and the generic
    /// `TYPEnnn` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let parsed = match upper.as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::AAAA,
            "NS" => RecordType::NS,
            "CNAME" => RecordType::CNAME,
            "SOA" => RecordType::SOA,
            "PTR" => RecordType::PTR,
            "MX" => RecordType::MX,
            "TXT" => RecordType::TXT,
            "SRV" => RecordType::SRV,
            "SPF" => RecordType::SPF,
            "CAA" => RecordType::CAA,
            "ANY" | "*" => RecordType::ANY,
            other => {
                if let Some((_, code)) = OTHER_MNEMONICS.iter().find(|(name, _)| *name == other) {
                    RecordType::Other(*code)
                } else if let Some(code) = other
                    .strip_prefix("TYPE")
                    .and_then(|digits| digits.parse::<u16>().ok())
                {
                    RecordType::from_u16(code)
                } else {
                    return Err(DigError::ConfigError(format!(
                        "Unsupported record type: {}",
                        s
                    )));
                }
            }
        };
        Ok(parsed)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.to_u16()),
        }
    }
}
