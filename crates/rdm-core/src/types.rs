use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PortId
// ---------------------------------------------------------------------------

/// Port identifier as reported by the device.
///
/// Firmware builds disagree on whether `port` is a JSON number or a string,
/// so both are accepted. Numbers keep their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PortId(String);

impl PortId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u32> for PortId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for PortId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => PortId(s),
            Raw::Number(n) => PortId(number_text(&n)),
        })
    }
}

/// `1.0` is port `1`; only non-integral floats keep their fraction.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One entry of `rdm/portstatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortStatus {
    pub port: PortId,
    pub direction: String,
    pub status: String,
}

/// Body of `rdm/tod?<port>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodResponse {
    pub tod: Vec<String>,
}

/// Body of `rdm/queue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueState {
    pub uid: Vec<String>,
}

impl QueueState {
    pub fn is_empty(&self) -> bool {
        self.uid.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScheduleEntry
// ---------------------------------------------------------------------------

/// A port's time-of-day list, joined to its [`PortStatus`] by port id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub port: PortId,
    pub tod: Vec<String>,
}

impl ScheduleEntry {
    pub fn new(port: PortId, response: TodResponse) -> Self {
        Self {
            port,
            tod: response.tod,
        }
    }
}

/// Reorder `entries` to follow the order of `ports`.
///
/// Entries whose port is not in `ports` sort last, keeping their relative
/// order.
pub fn order_by_ports(entries: &mut [ScheduleEntry], ports: &[PortStatus]) {
    entries.sort_by_key(|e| {
        ports
            .iter()
            .position(|p| p.port == e.port)
            .unwrap_or(usize::MAX)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_id_accepts_number_and_string() {
        let json = r#"[
            {"port": 1, "direction": "output", "status": "idle"},
            {"port": "2", "direction": "input", "status": "busy"}
        ]"#;
        let ports: Vec<PortStatus> = serde_json::from_str(json).unwrap();
        assert_eq!(ports[0].port, PortId::from(1));
        assert_eq!(ports[1].port, PortId::from("2"));
        assert_eq!(ports[0].port.to_string(), "1");
    }

    #[test]
    fn integral_float_port_renders_as_integer() {
        let json = r#"[
            {"port": 1.0, "direction": "output", "status": "idle"},
            {"port": 2.5, "direction": "input", "status": "idle"}
        ]"#;
        let ports: Vec<PortStatus> = serde_json::from_str(json).unwrap();
        assert_eq!(ports[0].port.as_str(), "1");
        assert_eq!(ports[1].port.as_str(), "2.5");
    }

    #[test]
    fn port_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PortId::from(7)).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn tod_without_field_is_rejected() {
        let result = serde_json::from_str::<TodResponse>(r#"{"times": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn queue_without_uid_is_rejected() {
        let result = serde_json::from_str::<QueueState>(r#"{}"#);
        assert!(result.is_err());
    }

    fn port(id: &str) -> PortStatus {
        PortStatus {
            port: PortId::from(id),
            direction: "output".into(),
            status: "idle".into(),
        }
    }

    fn entry(id: &str) -> ScheduleEntry {
        ScheduleEntry {
            port: PortId::from(id),
            tod: vec![],
        }
    }

    #[test]
    fn order_by_ports_follows_port_list() {
        let ports = vec![port("3"), port("1"), port("2")];
        let mut entries = vec![entry("1"), entry("2"), entry("3")];
        order_by_ports(&mut entries, &ports);
        let order: Vec<&str> = entries.iter().map(|e| e.port.as_str()).collect();
        assert_eq!(order, vec!["3", "1", "2"]);
    }

    #[test]
    fn order_by_ports_puts_unknown_ports_last() {
        let ports = vec![port("2"), port("1")];
        let mut entries = vec![entry("9"), entry("1"), entry("2")];
        order_by_ports(&mut entries, &ports);
        let order: Vec<&str> = entries.iter().map(|e| e.port.as_str()).collect();
        assert_eq!(order, vec!["2", "1", "9"]);
    }
}
