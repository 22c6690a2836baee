use crate::errors::DigError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Source prefix sent in the client-subnet option: the exact address.
pub const CLIENT_SUBNET_SOURCE_NETMASK: u8 = 32;

/// EDNS client-subnet address. Only IPv4 is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientSubnet {
    addr: Ipv4Addr,
}

impl ClientSubnet {
    pub fn new(addr: Ipv4Addr) -> Self {
        Self { addr }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn source_netmask(&self) -> u8 {
        CLIENT_SUBNET_SOURCE_NETMASK
    }
}

impl FromStr for ClientSubnet {
    type Err = DigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => Ok(Self::new(addr)),
            Ok(IpAddr::V6(_)) | Err(_) => Err(DigError::InvalidClientSubnet(s.to_string())),
        }
    }
}

impl TryFrom<IpAddr> for ClientSubnet {
    type Error = DigError;

    fn try_from(ip: IpAddr) -> Result<Self, Self::Error> {
        match ip {
            IpAddr::V4(addr) => Ok(Self::new(addr)),
            IpAddr::V6(_) => Err(DigError::InvalidClientSubnet(ip.to_string())),
        }
    }
}

impl fmt::Display for ClientSubnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, CLIENT_SUBNET_SOURCE_NETMASK)
    }
}
