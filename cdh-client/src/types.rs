//! Wire types exchanged with the driver service

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Service identity, `CDH-Driver` for the real driver
    pub service: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A printer known to the driver (`GET /printers`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterInfo {
    pub name: String,

    #[serde(default)]
    pub driver: String,

    #[serde(default)]
    pub port: String,

    #[serde(default)]
    pub status_text: String,

    /// USB vendor id
    #[serde(default, deserialize_with = "de_usb_id", skip_serializing_if = "Option::is_none")]
    pub vid: Option<u16>,

    /// USB product id
    #[serde(default, deserialize_with = "de_usb_id", skip_serializing_if = "Option::is_none")]
    pub pid: Option<u16>,
}

impl PrinterInfo {
    /// Whether this printer has vendor id `vid` and, if given, product id `pid`
    pub fn matches_usb_id(&self, vid: u16, pid: Option<u16>) -> bool {
        self.vid == Some(vid) && pid.is_none_or(|pid| self.pid == Some(pid))
    }
}

/// Printers matching a USB vendor id and optional product id
pub fn filter_by_usb_id(printers: &[PrinterInfo], vid: u16, pid: Option<u16>) -> Vec<&PrinterInfo> {
    printers
        .iter()
        .filter(|p| p.matches_usb_id(vid, pid))
        .collect()
}

/// USB ids arrive as numbers or hex strings ("0x0416", "0416")
fn de_usb_id<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u16),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(n)) => Ok(Some(n)),
        Some(RawId::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            let hex = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s);
            u16::from_str_radix(hex, 16)
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid USB id: {}", s)))
        }
    }
}
