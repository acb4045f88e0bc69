//! Remote fetch guards: host blocking, naming, integrity, transport.

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use std::sync::Mutex;
use std::time::Duration;

use proptest::prelude::*;
use regolint_analysis::remote::{
    is_blocked_host, policy_name_from_url, sha256_hex, verify_checksum, HostResolver,
    SecureFetcher, SecureFetcherConfig,
};
use regolint_core::errors::{FetchError, RegolintErrorCode};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

const PROXY_VARS: [&str; 4] = ["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"];

/// Resolves every name to a fixed set of addresses.
struct FixedResolver(Vec<IpAddr>);

impl HostResolver for FixedResolver {
    fn resolve(&self, _host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>> {
        Ok(self.0.iter().map(|ip| SocketAddr::new(*ip, port)).collect())
    }
}

/// Fetcher whose names resolve to unroutable documentation addresses.
fn unroutable_fetcher(last_octets: &[u8]) -> SecureFetcher {
    let addrs = last_octets.iter().map(|&d| IpAddr::V4(Ipv4Addr::new(192, 0, 2, d))).collect();
    SecureFetcher::with_resolver(
        SecureFetcherConfig {
            timeout: Duration::from_secs(2),
            ..Default::default()
        },
        Box::new(FixedResolver(addrs)),
    )
}

proptest! {
    #[test]
    fn private_and_loopback_ipv4_are_blocked(b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
        prop_assert!(is_blocked_host(&Ipv4Addr::new(10, b, c, d).to_string()));
        prop_assert!(is_blocked_host(&Ipv4Addr::new(127, b, c, d).to_string()));
        prop_assert!(is_blocked_host(&Ipv4Addr::new(192, 168, c, d).to_string()));
        prop_assert!(is_blocked_host(&Ipv4Addr::new(169, 254, c, d).to_string()));
        let with_port = format!("{}:443", Ipv4Addr::new(10, b, c, d));
        prop_assert!(is_blocked_host(&with_port));
    }

    #[test]
    fn public_ipv4_is_allowed(a in 11u8..100, b in any::<u8>(), c in any::<u8>(), d in 1u8..255) {
        prop_assert!(!is_blocked_host(&Ipv4Addr::new(a, b, c, d).to_string()));
    }

    #[test]
    fn rego_segment_names_the_policy(segment in "[a-z][a-z0-9_]{0,15}", dir in "[a-z]{1,8}") {
        let url = format!("https://policies.example.com/{dir}/{segment}.rego");
        prop_assert_eq!(policy_name_from_url(&url), format!("{segment}.rego"));
    }

    #[test]
    fn other_segments_fall_back_to_host(segment in "[a-z]{1,12}", host in "[a-z]{1,10}") {
        let url = format!("https://{host}.example.org/{segment}");
        prop_assert_eq!(policy_name_from_url(&url), format!("{host}.example.org.rego"));
    }
}

#[test]
fn localhost_and_metadata_hosts_are_blocked() {
    for host in ["localhost", "LOCALHOST", "127.0.0.1", "::1", "[::1]:8080", "0.0.0.0", "169.254.169.254", "fd00::1", "fe80::1"] {
        assert!(is_blocked_host(host), "{host}");
    }
    for host in ["example.com", "8.8.8.8", "2606:4700:4700::1111"] {
        assert!(!is_blocked_host(host), "{host}");
    }
}

#[test]
fn plaintext_fetch_never_opens_a_socket() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();

    let err = SecureFetcher::default()
        .fetch(&format!("http://127.0.0.1:{port}/policy.rego"), None)
        .unwrap_err();
    assert!(matches!(err, FetchError::InsecureScheme { .. }), "{err}");
    assert_eq!(err.error_code(), "TRANSPORT_REJECTED");

    match listener.accept() {
        Err(e) => assert_eq!(e.kind(), ErrorKind::WouldBlock),
        Ok((_, peer)) => panic!("unexpected connection from {peer}"),
    }
}

#[test]
fn mismatched_checksum_discards_the_payload() {
    let body = b"package regolint.rules.x.y\n";
    let good = sha256_hex(body);

    assert!(verify_checksum(body, &good, "https://h/p.rego").is_ok());
    assert!(verify_checksum(body, &format!("sha256:{}", good.to_uppercase()), "https://h/p.rego").is_ok());

    let err = verify_checksum(body, &"0".repeat(64), "https://h/p.rego").unwrap_err();
    match &err {
        FetchError::Integrity { expected, actual, .. } => {
            assert_eq!(expected, &"0".repeat(64));
            assert_eq!(actual, &good);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.error_code(), "INTEGRITY_ERROR");
}

#[test]
fn proxy_environment_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let proxy = format!("http://{}", listener.local_addr().unwrap());

    for var in PROXY_VARS {
        std::env::set_var(var, &proxy);
    }
    let result = unroutable_fetcher(&[10]).fetch("https://policies.example.com/p.rego", None);
    for var in PROXY_VARS {
        std::env::remove_var(var);
    }

    assert!(result.is_err());
    match listener.accept() {
        Err(e) => assert_eq!(e.kind(), ErrorKind::WouldBlock),
        Ok((_, peer)) => panic!("request went through proxy from {peer}"),
    }
}

#[test]
fn unreachable_vetted_addresses_are_a_transport_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let err = unroutable_fetcher(&[1, 2])
        .fetch("https://policies.example.com/p.rego", None)
        .unwrap_err();
    match &err {
        FetchError::Transport { url, .. } => assert_eq!(url, "https://policies.example.com/p.rego"),
        other => panic!("unexpected error: {other}"),
    }
}
