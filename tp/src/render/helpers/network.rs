//! CIDR arithmetic helpers
//!
//! Addresses are handled as `u128` bit patterns so IPv4 and IPv6 blocks share
//! the same arithmetic; only the width differs.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde_json::Value;

use super::{HelperError, HelperRegistry, exact, int, text};

pub(super) fn register(registry: &mut HelperRegistry) {
    registry
        .register("cidrhost", cidrhost)
        .register("cidrnetmask", cidrnetmask)
        .register("cidrsubnet", cidrsubnet);
}

/// A parsed address block with the host bits cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cidr {
    network: u128,
    prefix: u32,
    v4: bool,
}

impl Cidr {
    fn parse(s: &str) -> Result<Self, HelperError> {
        let invalid = || HelperError::Invalid(format!("invalid CIDR address {s:?}"));
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
        let prefix: u32 = prefix.parse().map_err(|_| invalid())?;

        let (bits, v4) = match addr {
            IpAddr::V4(a) => (u128::from(u32::from(a)), true),
            IpAddr::V6(a) => (u128::from(a), false),
        };
        let width = if v4 { 32 } else { 128 };
        if prefix > width {
            return Err(invalid());
        }

        let mut cidr = Self {
            network: 0,
            prefix,
            v4,
        };
        cidr.network = bits & cidr.mask();
        Ok(cidr)
    }

    fn width(&self) -> u32 {
        if self.v4 { 32 } else { 128 }
    }

    fn host_bits(&self) -> u32 {
        self.width() - self.prefix
    }

    fn mask(&self) -> u128 {
        let full = if self.v4 { u128::from(u32::MAX) } else { u128::MAX };
        match u128::MAX.checked_shl(self.host_bits()) {
            Some(mask) => mask & full,
            None => 0,
        }
    }

    /// Number of addresses in the block, `None` when it is all of IPv6
    fn size(&self) -> Option<u128> {
        1u128.checked_shl(self.host_bits())
    }

    /// Address of host `n`; negative `n` counts back from the last address
    fn host(&self, n: i64) -> Result<u128, HelperError> {
        let out_of_range = || HelperError::Invalid(format!("prefix {self} does not accommodate host number {n}"));
        let offset = if n >= 0 {
            let forward = u128::from(n.unsigned_abs());
            if self.size().is_some_and(|size| forward >= size) {
                return Err(out_of_range());
            }
            forward
        } else {
            let back = u128::from(n.unsigned_abs());
            match self.size() {
                Some(size) if back > size => return Err(out_of_range()),
                Some(size) => size - back,
                None => 0u128.wrapping_sub(back),
            }
        };
        Ok(self.network | offset)
    }

    fn to_ip(&self, bits: u128) -> IpAddr {
        if self.v4 {
            IpAddr::V4(Ipv4Addr::from(bits as u32))
        } else {
            IpAddr::V6(Ipv6Addr::from(bits))
        }
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.to_ip(self.network), self.prefix)
    }
}

/// `cidrhost prefix n`
fn cidrhost(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 2)?;
    let cidr = Cidr::parse(&text(args, 0)?)?;
    let host = cidr.host(int(args, 1)?)?;
    Ok(Value::String(cidr.to_ip(host).to_string()))
}

/// `cidrnetmask prefix`, dotted-quad mask of an IPv4 block
fn cidrnetmask(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 1)?;
    let cidr = Cidr::parse(&text(args, 0)?)?;
    if !cidr.v4 {
        return Err(HelperError::Invalid(format!("cidrnetmask only supports IPv4, got {cidr}")));
    }
    Ok(Value::String(cidr.to_ip(cidr.mask()).to_string()))
}

/// `cidrsubnet prefix newbits netnum`
fn cidrsubnet(args: &[Value]) -> Result<Value, HelperError> {
    exact(args, 3)?;
    let cidr = Cidr::parse(&text(args, 0)?)?;
    let newbits = int(args, 1)?;
    let netnum = int(args, 2)?;

    let new_prefix = u32::try_from(newbits)
        .ok()
        .and_then(|bits| cidr.prefix.checked_add(bits))
        .filter(|prefix| *prefix <= cidr.width())
        .ok_or_else(|| HelperError::Invalid(format!("cannot extend prefix {cidr} by {newbits} bits")))?;
    let newbits = new_prefix - cidr.prefix;

    let netnum = u128::try_from(netnum)
        .ok()
        .filter(|num| 1u128.checked_shl(newbits).is_none_or(|limit| *num < limit))
        .ok_or_else(|| HelperError::Invalid(format!("prefix extension of {newbits} bits does not accommodate subnet {netnum}")))?;

    let subnet = Cidr {
        network: cidr.network | netnum.checked_shl(cidr.width() - new_prefix).unwrap_or(0),
        prefix: new_prefix,
        v4: cidr.v4,
    };
    Ok(Value::String(subnet.to_string()))
}
