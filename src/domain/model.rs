use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

/// 無法取得來源位址時使用的標記
pub const UNKNOWN_CLIENT: &str = "unknown";

/// IPv4 後兩段的固定遮罩
pub const IPV4_MASK: &str = "xxx.xxx";

const IPV6_MASK: &str = "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx";

/// Contact form payload as submitted by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub services: Vec<String>,
    /// Honeypot input, hidden from humans. Bots tend to fill it.
    #[serde(default)]
    pub contact_me_by_fax: String,
}

impl LeadSubmission {
    pub fn is_honeypot_filled(&self) -> bool {
        !self.contact_me_by_fax.is_empty()
    }
}

/// A stored lead. Created once per accepted submission and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub submission: LeadSubmission,
    pub id: Uuid,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "maskedIp")]
    pub masked_ip: String,
}

impl Lead {
    pub fn new(submission: LeadSubmission, source_ip: &str) -> Self {
        Self {
            submission,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            masked_ip: mask_ip(source_ip),
        }
    }
}

fn serialize_millis<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Masks a client address before it is written to disk.
///
/// - IPv4 `a.b.c.d` keeps `a.b` and replaces the rest with `xxx.xxx`.
/// - IPv4-mapped IPv6 (`::ffff:a.b.c.d`) is masked as the embedded IPv4.
/// - Other IPv6 addresses keep the first two hextets.
/// - Anything else collapses to [`UNKNOWN_CLIENT`].
///
/// A trailing port (`1.2.3.4:5678`, `[::1]:80`) is ignored.
pub fn mask_ip(source: &str) -> String {
    let source = source.trim();
    let ip = source
        .parse::<IpAddr>()
        .or_else(|_| source.parse::<SocketAddr>().map(|addr| addr.ip()));

    match ip {
        Ok(IpAddr::V4(v4)) => mask_v4(v4),
        Ok(IpAddr::V6(v6)) => match v6.to_ipv4_mapped() {
            Some(v4) => mask_v4(v4),
            None => {
                let segments = v6.segments();
                format!("{:x}:{:x}:{}", segments[0], segments[1], IPV6_MASK)
            }
        },
        Err(_) => UNKNOWN_CLIENT.to_string(),
    }
}

fn mask_v4(addr: Ipv4Addr) -> String {
    let [first, second, _, _] = addr.octets();
    format!("{}.{}.{}", first, second, IPV4_MASK)
}
