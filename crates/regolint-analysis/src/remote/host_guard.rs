//! Request-forgery guard for remote hosts.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const METADATA_ENDPOINT: Ipv4Addr = Ipv4Addr::new(169, 254, 169, 254);

/// `localhost`, in any letter case.
pub fn is_blocked_hostname(hostname: &str) -> bool {
    hostname.eq_ignore_ascii_case("localhost")
}

/// Loopback, private, link-local unicast or multicast, unspecified, or the
/// cloud metadata endpoint. IPv4-mapped IPv6 is judged as IPv4.
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_blocked_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_blocked_v4(v4),
            None => is_blocked_v6(v6),
        },
    }
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip == METADATA_ENDPOINT
        // 224.0.0.0/24 link-local multicast
        || (a == 224 && b == 0 && c == 0)
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link-local unicast
        || (first & 0xffc0) == 0xfe80
        // ffX2::/16 link-local multicast, any flags nibble
        || (first & 0xff0f) == 0xff02
}

/// Judge a URL host, optionally carrying a port (`host:port`, `[v6]:port`).
/// Names that are neither `localhost` nor an IP literal pass; their
/// resolved addresses are checked separately.
pub fn is_blocked_host(host: &str) -> bool {
    let hostname = strip_port(host);
    if is_blocked_hostname(hostname) {
        return true;
    }
    hostname.parse::<IpAddr>().is_ok_and(is_blocked_ip)
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(host, |(inner, _)| inner);
    }
    // A single colon separates a port; more than one means bare IPv6.
    match host.rsplit_once(':') {
        Some((name, _)) if !name.contains(':') => name,
        _ => host,
    }
}
