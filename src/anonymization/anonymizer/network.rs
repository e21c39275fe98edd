//! Network identifier redaction
//!
//! Public addresses lose their host part: IPv4 keeps its `/24` and IPv6 its
//! `/48`, and the redacted address is always the first host of that network.
//! Reserved ranges and allow-listed resolvers identify nobody and pass
//! through unchanged.

use once_cell::sync::Lazy;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Prefix length kept when redacting an IPv4 address
pub const IPV4_KEPT_PREFIX: u8 = 24;

/// Prefix length kept when redacting an IPv6 address
pub const IPV6_KEPT_PREFIX: u8 = 48;

/// Well-known public DNS resolvers
pub const DEFAULT_IPV4_ALLOW_LIST: [Ipv4Addr; 4] = [
    Ipv4Addr::new(8, 8, 8, 8),
    Ipv4Addr::new(8, 8, 4, 4),
    Ipv4Addr::new(1, 1, 1, 1),
    Ipv4Addr::new(9, 9, 9, 9),
];

/// Google, Cloudflare and Quad9 anycast resolvers
pub const DEFAULT_IPV6_ALLOW_LIST: [Ipv6Addr; 6] = [
    Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888),
    Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8844),
    Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1111),
    Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1001),
    Ipv6Addr::new(0x2620, 0x00fe, 0, 0, 0, 0, 0, 0x00fe),
    Ipv6Addr::new(0x2620, 0x00fe, 0, 0, 0, 0, 0, 0x0009),
];

/// Special-purpose IPv4 blocks (RFC 6890)
const RESERVED_IPV4: &[(Ipv4Addr, u8)] = &[
    (Ipv4Addr::new(0, 0, 0, 0), 8),
    (Ipv4Addr::new(10, 0, 0, 0), 8),
    (Ipv4Addr::new(100, 64, 0, 0), 10),
    (Ipv4Addr::new(127, 0, 0, 0), 8),
    (Ipv4Addr::new(169, 254, 0, 0), 16),
    (Ipv4Addr::new(172, 16, 0, 0), 12),
    (Ipv4Addr::new(192, 0, 0, 0), 24),
    (Ipv4Addr::new(192, 0, 2, 0), 24),
    (Ipv4Addr::new(192, 168, 0, 0), 16),
    (Ipv4Addr::new(198, 18, 0, 0), 15),
    (Ipv4Addr::new(198, 51, 100, 0), 24),
    (Ipv4Addr::new(203, 0, 113, 0), 24),
    (Ipv4Addr::new(224, 0, 0, 0), 4),
    (Ipv4Addr::new(240, 0, 0, 0), 4),
];

const RESERVED_IPV6: &[(Ipv6Addr, u8)] = &[
    (Ipv6Addr::UNSPECIFIED, 128),
    (Ipv6Addr::LOCALHOST, 128),
    (Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0, 0), 96),
    (Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7),
    (Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), 10),
    (Ipv6Addr::new(0xff00, 0, 0, 0, 0, 0, 0, 0), 8),
    (Ipv6Addr::new(0x2001, 0x0db8, 0, 0, 0, 0, 0, 0), 32),
];

static DEFAULT_POLICY: Lazy<NetworkPolicy> = Lazy::new(NetworkPolicy::default);

fn ipv4_mask(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

fn ipv6_mask(prefix: u8) -> u128 {
    u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0)
}

/// Returns true if the address belongs to a private, loopback, link-local,
/// documentation, shared, benchmarking, multicast or reserved block
pub fn is_reserved_ipv4(addr: Ipv4Addr) -> bool {
    let bits = u32::from(addr);
    RESERVED_IPV4.iter().any(|(network, prefix)| {
        let mask = ipv4_mask(*prefix);
        bits & mask == u32::from(*network) & mask
    })
}

pub fn is_reserved_ipv6(addr: Ipv6Addr) -> bool {
    let bits = u128::from(addr);
    RESERVED_IPV6.iter().any(|(network, prefix)| {
        let mask = ipv6_mask(*prefix);
        bits & mask == u128::from(*network) & mask
    })
}

/// Allow-lists applied on top of the reserved ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPolicy {
    ipv4_allow_list: Vec<Ipv4Addr>,
    ipv6_allow_list: Vec<Ipv6Addr>,
}

impl NetworkPolicy {
    /// Build a policy allowing the well-known resolvers plus `ipv4` and `ipv6`
    pub fn with_allowed(
        ipv4: impl IntoIterator<Item = Ipv4Addr>,
        ipv6: impl IntoIterator<Item = Ipv6Addr>,
    ) -> Self {
        let mut policy = Self::default();
        for addr in ipv4 {
            policy.allow_ipv4(addr);
        }
        for addr in ipv6 {
            policy.allow_ipv6(addr);
        }
        policy
    }

    pub fn allow_ipv4(&mut self, addr: Ipv4Addr) {
        if !self.ipv4_allow_list.contains(&addr) {
            self.ipv4_allow_list.push(addr);
        }
    }

    pub fn allow_ipv6(&mut self, addr: Ipv6Addr) {
        if !self.ipv6_allow_list.contains(&addr) {
            self.ipv6_allow_list.push(addr);
        }
    }

    pub fn ipv4_allow_list(&self) -> &[Ipv4Addr] {
        &self.ipv4_allow_list
    }

    pub fn ipv6_allow_list(&self) -> &[Ipv6Addr] {
        &self.ipv6_allow_list
    }

    /// Redact an IPv4 address to the first host of its `/24`
    pub fn redact_ipv4(&self, addr: Ipv4Addr) -> Ipv4Addr {
        if is_reserved_ipv4(addr) || self.ipv4_allow_list.contains(&addr) {
            return addr;
        }
        Ipv4Addr::from((u32::from(addr) & ipv4_mask(IPV4_KEPT_PREFIX)) | 1)
    }

    /// Redact an IPv6 address to the first host of its `/48`
    pub fn redact_ipv6(&self, addr: Ipv6Addr) -> Ipv6Addr {
        if is_reserved_ipv6(addr) || self.ipv6_allow_list.contains(&addr) {
            return addr;
        }
        Ipv6Addr::from((u128::from(addr) & ipv6_mask(IPV6_KEPT_PREFIX)) | 1)
    }

    /// Redact a textual address
    ///
    /// Values that do not parse as an address, and addresses left untouched
    /// by the policy, are returned exactly as written.
    pub fn redact_ip(&self, value: &str) -> String {
        let redacted = match value.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => {
                let redacted = self.redact_ipv4(addr);
                (redacted != addr).then(|| redacted.to_string())
            }
            Ok(IpAddr::V6(addr)) => {
                let redacted = self.redact_ipv6(addr);
                (redacted != addr).then(|| redacted.to_string())
            }
            Err(_) => None,
        };
        redacted.unwrap_or_else(|| value.to_string())
    }
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self {
            ipv4_allow_list: DEFAULT_IPV4_ALLOW_LIST.to_vec(),
            ipv6_allow_list: DEFAULT_IPV6_ALLOW_LIST.to_vec(),
        }
    }
}

/// [`NetworkPolicy::redact_ipv4`] with the default allow-list
///
/// ```
/// use std::net::Ipv4Addr;
/// use task_anonymizer::redact_ipv4;
///
/// assert_eq!(redact_ipv4(Ipv4Addr::new(81, 2, 69, 142)), Ipv4Addr::new(81, 2, 69, 1));
/// assert_eq!(redact_ipv4(Ipv4Addr::new(8, 8, 8, 8)), Ipv4Addr::new(8, 8, 8, 8));
/// ```
pub fn redact_ipv4(addr: Ipv4Addr) -> Ipv4Addr {
    DEFAULT_POLICY.redact_ipv4(addr)
}

/// [`NetworkPolicy::redact_ipv6`] with the default allow-list
pub fn redact_ipv6(addr: Ipv6Addr) -> Ipv6Addr {
    DEFAULT_POLICY.redact_ipv6(addr)
}

/// [`NetworkPolicy::redact_ip`] with the default allow-list
pub fn redact_ip(value: &str) -> String {
    DEFAULT_POLICY.redact_ip(value)
}
