use std::net::IpAddr;

use sha2::{Digest, Sha256};

use crate::store::UserKey;

pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Key for an authenticated account.
pub fn account_key(username: &str) -> UserKey {
    UserKey::new(format!("user:{username}"))
}

/// Key for an unauthenticated caller. A client-supplied device id wins over
/// the IP + user-agent pair.
pub fn anonymous_key(device_id: Option<&str>, ip: Option<IpAddr>, user_agent: Option<&str>) -> UserKey {
    let material = match device_id.map(str::trim).filter(|d| !d.is_empty()) {
        Some(device) => format!("device:{device}"),
        None => format!(
            "{}|{}",
            ip.map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".into()),
            user_agent.unwrap_or("")
        ),
    };

    let digest = Sha256::digest(material.as_bytes());
    UserKey::new(format!("anon:{}", &hex::encode(digest)[..16]))
}
