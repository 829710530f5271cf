// ── Device identity types ──
//
// MacAddress is the identity key of everything the backend knows about:
// scan results, the blocking target. DeviceInfo is one scan result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to uppercase colon-separated format
/// (`AA:BB:CC:DD:EE:FF`), matching what the backend stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalize without validating. Used for values the backend reported.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_uppercase().replace('-', ":");
        Self(normalized)
    }

    /// Normalize and require six hex octets. Used for user input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let mac = Self::new(raw);
        if mac.is_well_formed() {
            Ok(mac)
        } else {
            Err(CoreError::Validation {
                message: format!("'{}' is not a MAC address (expected AA:BB:CC:DD:EE:FF)", mac.0),
            })
        }
    }

    pub fn is_well_formed(&self) -> bool {
        let octets: Vec<&str> = self.0.split(':').collect();
        octets.len() == 6
            && octets
                .iter()
                .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── DeviceInfo ──────────────────────────────────────────────────────

/// A device discovered by a backend ARP scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub mac: MacAddress,
    pub ip: String,
    pub name: Option<String>,
}

impl DeviceInfo {
    /// The name if the backend resolved one, otherwise the IP.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.ip)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_normalizes_dashes_and_case() {
        let mac = MacAddress::new("aa-bb-cc-dd-ee-ff");
        assert_eq!(mac.as_str(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn mac_address_parse_rejects_garbage() {
        assert!(MacAddress::parse("AA:BB:CC").is_err());
        assert!(MacAddress::parse("GG:BB:CC:DD:EE:FF").is_err());
        assert!(MacAddress::parse("").is_err());
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = " 11:22:33:aa:bb:cc ".parse().unwrap();
        assert_eq!(mac.to_string(), "11:22:33:AA:BB:CC");
    }

    #[test]
    fn display_name_falls_back_to_ip() {
        let mut device = DeviceInfo {
            mac: MacAddress::new("AA:BB:CC:DD:EE:01"),
            ip: "192.168.1.10".into(),
            name: None,
        };
        assert_eq!(device.display_name(), "192.168.1.10");

        device.name = Some("Kid's Tablet".into());
        assert_eq!(device.display_name(), "Kid's Tablet");
    }
}
