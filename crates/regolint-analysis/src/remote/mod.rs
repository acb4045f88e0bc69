//! Secure retrieval of remote policy text.

pub mod checksum;
pub mod fetcher;
pub mod host_guard;
pub mod naming;

pub use checksum::{sha256_hex, verify_checksum};
pub use fetcher::{FetchedPolicy, HostResolver, SecureFetcher, SecureFetcherConfig, SystemResolver};
pub use host_guard::{is_blocked_host, is_blocked_hostname, is_blocked_ip};
pub use naming::policy_name_from_url;
