//! Pseudonymous client identity
//!
//! A best-effort fingerprint of the caller built from the forwarded address
//! and the user agent. It is stable for identical headers and not reversible,
//! but it is not an identity system: collisions are accepted.

const UNKNOWN: &str = "unknown";

/// Only this many UTF-16 units of the user agent take part in the hash
const USER_AGENT_PREFIX_LEN: usize = 50;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Request metadata the identity is derived from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientHeaders {
    /// Forwarded or real client address
    pub forwarded_for: Option<String>,
    /// Raw `User-Agent` header
    pub user_agent: Option<String>,
}

impl ClientHeaders {
    pub fn new(forwarded_for: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            forwarded_for,
            user_agent,
        }
    }

    /// Headers standing in for an already derived id
    pub fn synthetic(user_id: &str) -> Self {
        Self {
            forwarded_for: Some(user_id.to_string()),
            user_agent: None,
        }
    }
}

/// Derive the `user_<base36>` identifier for a request
pub fn derive_client_id(headers: &ClientHeaders) -> String {
    let address = headers.forwarded_for.as_deref().unwrap_or(UNKNOWN);
    let user_agent = headers.user_agent.as_deref().unwrap_or(UNKNOWN);

    let units = address
        .encode_utf16()
        .chain("-".encode_utf16())
        .chain(user_agent.encode_utf16().take(USER_AGENT_PREFIX_LEN));

    format!("user_{}", to_base36(rolling_hash(units).unsigned_abs()))
}

/// `h = (h << 5) - h + unit` with 32-bit wraparound
fn rolling_hash(units: impl Iterator<Item = u16>) -> i32 {
    units.fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32)
    })
}

fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(7);
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
