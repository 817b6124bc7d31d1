//! Address validation for trusted proxy entries.
//!
//! An entry is either a single host address (IPv4 or IPv6) or a network in
//! CIDR notation. Networks must be canonical: `10.0.0.0/8` is accepted,
//! `10.0.0.1/8` (host bits set) is not.
//!
//! Callers are expected to trim input; surrounding whitespace is invalid.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::IpAddr;

/// Parse an address or CIDR network into an `IpNet`.
///
/// Bare host addresses become a /32 (IPv4) or /128 (IPv6) network. For
/// network literals the family is chosen by the presence of a colon.
///
/// # Examples
/// ```
/// use apache_cf_iplist::validation::parse_address;
/// assert_eq!(parse_address("1.1.1.1").unwrap().to_string(), "1.1.1.1/32");
/// assert_eq!(parse_address("2606:4700::/32").unwrap().prefix_len(), 32);
/// assert!(parse_address("not-an-ip").is_none());
/// ```
pub fn parse_address(candidate: &str) -> Option<IpNet> {
    if let Ok(ip) = candidate.parse::<IpAddr>() {
        return Some(IpNet::from(ip));
    }

    let net = if candidate.contains(':') {
        candidate.parse::<Ipv6Net>().ok().map(IpNet::V6)?
    } else {
        candidate.parse::<Ipv4Net>().ok().map(IpNet::V4)?
    };

    // Reject host bits set
    if net.trunc() != net {
        return None;
    }
    Some(net)
}

/// Check whether `candidate` is a valid host address or CIDR network.
///
/// # Examples
/// ```
/// use apache_cf_iplist::validation::is_valid;
/// assert!(is_valid("173.245.48.0/20"));
/// assert!(is_valid("::1"));
/// assert!(!is_valid(""));
/// assert!(!is_valid(" 1.1.1.1"));
/// ```
pub fn is_valid(candidate: &str) -> bool {
    parse_address(candidate).is_some()
}
