//! Local-origin classification.

use url::Url;

const LOCAL_HOSTNAMES: [&str; 3] = ["localhost", "127.0.0.1", "0.0.0.0"];
const LAN_PREFIX: &str = "192.168.";

/// Returns true if `origin` names a loopback or private LAN host.
///
/// Empty or unparsable origins are never local.
pub fn is_local_origin(origin: &str) -> bool {
    if origin.is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(origin) else {
        return false;
    };

    match url.host_str() {
        Some(host) => LOCAL_HOSTNAMES.contains(&host) || host.starts_with(LAN_PREFIX),
        None => false,
    }
}
