//! HTTPS policy fetcher with request-forgery, size and integrity guards.
//!
//! Order of checks: URL shape and scheme, host literal, DNS resolution with
//! every address vetted, then a client pinned to the vetted addresses.
//! Proxy settings from the environment are ignored, redirects are never
//! followed and nothing is retried.

use std::collections::BTreeMap;
use std::io::Read;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use regolint_core::config::RemotePolicy;
use regolint_core::constants::{DEFAULT_FETCH_TIMEOUT_SECS, MAX_POLICY_SIZE};
use regolint_core::errors::FetchError;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Url};

use super::checksum::verify_checksum;
use super::host_guard::{is_blocked_host, is_blocked_ip};
use super::naming::policy_name_from_url;

/// Resolves a host name to socket addresses.
pub trait HostResolver: Send + Sync {
    fn resolve(&self, host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>>;
}

/// Resolver backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>> {
        Ok((host, port).to_socket_addrs()?.collect())
    }
}

#[derive(Debug, Clone)]
pub struct SecureFetcherConfig {
    pub timeout: Duration,
    pub max_size: u64,
}

impl Default for SecureFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_size: MAX_POLICY_SIZE,
        }
    }
}

/// One fetched policy. `warnings` is non-empty when integrity could not be
/// verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPolicy {
    pub name: String,
    pub url: String,
    pub content: String,
    pub checksum_verified: bool,
    pub warnings: Vec<String>,
}

pub struct SecureFetcher {
    config: SecureFetcherConfig,
    resolver: Box<dyn HostResolver>,
}

impl Default for SecureFetcher {
    fn default() -> Self {
        Self::new(SecureFetcherConfig::default())
    }
}

impl SecureFetcher {
    pub fn new(config: SecureFetcherConfig) -> Self {
        Self::with_resolver(config, Box::new(SystemResolver))
    }

    pub fn with_resolver(config: SecureFetcherConfig, resolver: Box<dyn HostResolver>) -> Self {
        Self { config, resolver }
    }

    /// Fetch one policy. A supplied checksum must match; without one the
    /// text is returned with a warning.
    pub fn fetch(&self, url: &str, checksum: Option<&str>) -> Result<FetchedPolicy, FetchError> {
        let target = self.vet(url)?;

        let client = self.client_for(&target, url)?;
        let response = client
            .get(target.url.clone())
            .send()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = read_limited(response, self.config.max_size, url)?;

        let mut warnings = Vec::new();
        let checksum_verified = match checksum.map(str::trim).filter(|c| !c.is_empty()) {
            Some(expected) => {
                verify_checksum(&body, expected, url)?;
                true
            }
            None => {
                tracing::warn!(url, "remote policy has no checksum, integrity not verified");
                warnings.push(format!("remote policy {url} has no checksum, integrity not verified"));
                false
            }
        };

        let content = String::from_utf8(body).map_err(|e| FetchError::Read {
            url: url.to_string(),
            message: format!("policy is not valid UTF-8: {e}"),
        })?;

        tracing::debug!(url, bytes = content.len(), checksum_verified, "fetched remote policy");
        Ok(FetchedPolicy {
            name: policy_name_from_url(url),
            url: url.to_string(),
            content,
            checksum_verified,
            warnings,
        })
    }

    /// Fetch every remote in order; the first failure aborts the whole set.
    /// Later entries with the same name replace earlier ones.
    pub fn fetch_all(&self, remotes: &[RemotePolicy]) -> Result<BTreeMap<String, FetchedPolicy>, FetchError> {
        let mut fetched = BTreeMap::new();
        for remote in remotes {
            let policy = self.fetch(&remote.url, remote.checksum.as_deref())?;
            fetched.insert(policy.name.clone(), policy);
        }
        Ok(fetched)
    }

    /// Every check that happens before a socket is opened.
    fn vet(&self, raw: &str) -> Result<VettedTarget, FetchError> {
        let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.to_string(),
            message: e.to_string(),
        })?;

        if url.scheme() != "https" {
            return Err(FetchError::InsecureScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| FetchError::InvalidUrl {
                url: raw.to_string(),
                message: "missing host".to_string(),
            })?
            .to_string();

        if is_blocked_host(&host) {
            return Err(FetchError::BlockedHost {
                host,
                reason: "internal/private addresses not allowed".to_string(),
            });
        }

        let port = url.port_or_known_default().unwrap_or(443);
        let literal = host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>().ok();

        let addrs = match literal {
            Some(ip) => vec![SocketAddr::new(ip, port)],
            None => self.resolver.resolve(&host, port).map_err(|e| FetchError::Resolve {
                host: host.clone(),
                message: e.to_string(),
            })?,
        };

        if addrs.is_empty() {
            return Err(FetchError::Resolve {
                host,
                message: "no addresses found".to_string(),
            });
        }
        ensure_allowed(&host, &addrs)?;

        Ok(VettedTarget {
            url,
            domain: literal.is_none().then_some(host),
            addrs,
        })
    }

    /// Client that can only reach the vetted addresses.
    fn client_for(&self, target: &VettedTarget, url: &str) -> Result<Client, FetchError> {
        let mut builder = Client::builder()
            .timeout(self.config.timeout)
            .redirect(Policy::none())
            .https_only(true)
            .no_proxy();

        if let Some(domain) = &target.domain {
            ensure_allowed(domain, &target.addrs)?;
            builder = builder.resolve_to_addrs(domain, &target.addrs);
        }

        builder.build().map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for SecureFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureFetcher").field("config", &self.config).finish()
    }
}

struct VettedTarget {
    url: Url,
    /// Set when the host is a name rather than an IP literal.
    domain: Option<String>,
    addrs: Vec<SocketAddr>,
}

fn ensure_allowed(host: &str, addrs: &[SocketAddr]) -> Result<(), FetchError> {
    match addrs.iter().find(|a| is_blocked_ip(a.ip())) {
        Some(blocked) => Err(FetchError::BlockedHost {
            host: host.to_string(),
            reason: format!("resolves to blocked address {}", blocked.ip()),
        }),
        None => Ok(()),
    }
}

/// Read at most `max + 1` bytes; a present extra byte fails the read.
pub fn read_limited<R: Read>(reader: R, max: u64, url: &str) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    reader
        .take(max.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| FetchError::Read {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if body.len() as u64 > max {
        return Err(FetchError::SizeLimit {
            url: url.to_string(),
            max,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::net::Ipv4Addr;

    struct FixedResolver(Vec<IpAddr>);

    impl HostResolver for FixedResolver {
        fn resolve(&self, _host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>> {
            Ok(self.0.iter().map(|ip| SocketAddr::new(*ip, port)).collect())
        }
    }

    fn fetcher_resolving_to(ips: Vec<IpAddr>) -> SecureFetcher {
        SecureFetcher::with_resolver(SecureFetcherConfig::default(), Box::new(FixedResolver(ips)))
    }

    #[test]
    fn rejects_plaintext_and_other_schemes() {
        let fetcher = SecureFetcher::default();
        for url in ["http://example.com/p.rego", "ftp://example.com/p.rego", "file:///etc/passwd"] {
            let err = fetcher.fetch(url, None).unwrap_err();
            assert!(matches!(err, FetchError::InsecureScheme { .. }), "{url}: {err}");
            assert!(err.is_transport_rejection());
        }
    }

    #[test]
    fn rejects_malformed_urls() {
        let err = SecureFetcher::default().fetch("::not a url::", None).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_blocked_literals_before_resolving() {
        let fetcher = fetcher_resolving_to(vec![]);
        for url in [
            "https://localhost/p.rego",
            "https://127.0.0.1/p.rego",
            "https://[::1]:8443/p.rego",
            "https://169.254.169.254/latest/meta-data",
            "https://10.1.2.3/p.rego",
        ] {
            let err = fetcher.fetch(url, None).unwrap_err();
            assert!(matches!(err, FetchError::BlockedHost { .. }), "{url}: {err}");
        }
    }

    #[test]
    fn rejects_names_resolving_to_private_addresses() {
        let fetcher = fetcher_resolving_to(vec![
            IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)),
            IpAddr::V4(Ipv4Addr::new(192, 168, 0, 10)),
        ]);
        let err = fetcher.fetch("https://policies.example.com/p.rego", None).unwrap_err();
        match err {
            FetchError::BlockedHost { host, reason } => {
                assert_eq!(host, "policies.example.com");
                assert!(reason.contains("192.168.0.10"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_resolution_is_an_error() {
        let err = fetcher_resolving_to(vec![])
            .fetch("https://policies.example.com/p.rego", None)
            .unwrap_err();
        assert!(matches!(err, FetchError::Resolve { .. }));
    }

    #[test]
    fn read_limited_enforces_cap() {
        let exact = read_limited(Cursor::new(vec![b'a'; 16]), 16, "u").unwrap();
        assert_eq!(exact.len(), 16);

        let err = read_limited(Cursor::new(vec![b'a'; 17]), 16, "u").unwrap_err();
        assert!(matches!(err, FetchError::SizeLimit { max: 16, .. }));
    }

    #[test]
    fn fetch_all_fails_fast() {
        let fetcher = SecureFetcher::default();
        let remotes = vec![
            RemotePolicy {
                url: "http://example.com/a.rego".to_string(),
                checksum: None,
            },
            RemotePolicy {
                url: "https://localhost/b.rego".to_string(),
                checksum: None,
            },
        ];
        let err = fetcher.fetch_all(&remotes).unwrap_err();
        assert!(matches!(err, FetchError::InsecureScheme { .. }));
    }
}
